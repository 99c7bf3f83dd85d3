//! The two HTML pages served to browsers.

use crate::model::KnownCategory;

const LOGIN_TEMPLATE: &str = include_str!("html/login.html");
const HOME_TEMPLATE: &str = include_str!("html/home.html");

/// Shown on the login page after a failed attempt.
pub(crate) const INVALID_CREDENTIALS: &str = "Invalid credentials. Try again.";

/// Renders the login page. After a failed attempt the page says so above the form.
pub(crate) fn login(failed: bool) -> String {
    let error = if failed {
        format!("<p class=\"error\">{INVALID_CREDENTIALS}</p>")
    } else {
        String::new()
    };
    LOGIN_TEMPLATE.replace("{{error}}", &error)
}

/// Renders the dashboard. The page fetches its data from the JSON API, so it is the same for
/// every request.
pub(crate) fn home() -> String {
    let options = KnownCategory::ALL
        .iter()
        .map(|category| format!("                <option>{category}</option>"))
        .collect::<Vec<_>>()
        .join("\n");
    HOME_TEMPLATE.replace("{{category_options}}", &options)
}
