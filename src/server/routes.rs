//! The route table and the handlers behind each route.
//!
//! | Path            | Methods     | Handler          |
//! |-----------------|-------------|------------------|
//! | `/`             | GET, POST   | login            |
//! | `/home`         | GET         | dashboard        |
//! | `/api/expenses` | GET         | list expenses    |
//! | `/api/add`      | POST        | add an expense   |
//! | `/api/delete`   | any         | delete by id     |
//! | `/api/analysis` | GET         | category totals  |
//!
//! `GET` routes also answer `HEAD`. A known path with the wrong method gets `405`, and an unknown
//! path gets a `404` JSON error.

use crate::error::{ErrorType, IntoResult};
use crate::model::{CategoryTotal, Expense};
use crate::server::form::{AddExpenseForm, DeleteQuery, LoginForm, MAX_FORM_BYTES};
use crate::server::response::{self, HandlerResult, Status};
use crate::server::{pages, AppState};
use anyhow::Context;
use axum::body::Body;
use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::extract::{ConnectInfo, DefaultBodyLimit, Query, State};
use axum::http::{Request, StatusCode, Uri};
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{any, get, post};
use axum::{Form, Json, Router};
use std::net::SocketAddr;
use tracing::{debug, debug_span, info, Instrument};
use uuid::Uuid;

/// The format of the timestamp stored with each expense, e.g. `Mon Oct 19 14:03:11 +00:00 2026`.
const DATE_FORMAT: &str = "%a %b %d %H:%M:%S %Z %Y";

/// Builds the application's router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(login_page).post(login))
        .route("/home", get(home))
        .route("/api/expenses", get(list_expenses))
        .route("/api/add", post(add_expense))
        .route("/api/delete", any(delete_expense))
        .route("/api/analysis", get(analysis))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_FORM_BYTES))
        .layer(middleware::from_fn(request_span))
        .with_state(state)
}

/// Runs each request inside a span carrying a fresh request id.
async fn request_span(req: Request<Body>, next: Next) -> Response {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let span = debug_span!(
        "request",
        request_id = %Uuid::new_v4(),
        peer = ?peer,
        %method,
        %path,
    );
    async move {
        let response = next.run(req).await;
        debug!("{method} {path} -> {}", response.status());
        response
    }
    .instrument(span)
    .await
}

async fn login_page() -> Html<String> {
    Html(pages::login(false))
}

/// Checks the credentials and sends the browser on to the dashboard when they match. No session
/// is created.
async fn login(
    State(state): State<AppState>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> HandlerResult<Response> {
    let Form(form) = form
        .context("Unable to read the login form")
        .pub_result(ErrorType::Request)?;
    if state.credentials().matches(&form.username, &form.password) {
        info!("User '{}' logged in", form.username);
        Ok(response::found("/home"))
    } else {
        info!("Failed login attempt for user '{}'", form.username);
        Ok(Html(pages::login(true)).into_response())
    }
}

async fn home() -> Html<String> {
    Html(pages::home())
}

async fn list_expenses(State(state): State<AppState>) -> Json<Vec<Expense>> {
    Json(state.ledger().list())
}

/// The date is assigned here. An `amount` that is missing, unparseable or out of range is
/// rejected and the ledger is left untouched.
async fn add_expense(
    State(state): State<AppState>,
    form: Result<Form<AddExpenseForm>, FormRejection>,
) -> HandlerResult<Json<Status<'static>>> {
    let Form(form) = form
        .context("Unable to read the expense form")
        .pub_result(ErrorType::Request)?;
    let expense = form.into_new_expense(timestamp())?;
    let amount = expense.amount;
    let id = state.ledger().add(expense);
    info!("Added expense {id} of {amount}");
    Ok(Json(Status::ok("ok")))
}

/// Deleting an id that does not exist still reports success.
async fn delete_expense(
    State(state): State<AppState>,
    query: Result<Query<DeleteQuery>, QueryRejection>,
) -> HandlerResult<Json<Status<'static>>> {
    let Query(query) = query
        .context("Unable to read the query string")
        .pub_result(ErrorType::Request)?;
    let id = query.id()?;
    if state.ledger().delete(id) {
        info!("Deleted expense {id}");
    } else {
        debug!("Expense {id} was already gone");
    }
    Ok(Json(Status::ok("deleted")))
}

async fn analysis(State(state): State<AppState>) -> Json<Vec<CategoryTotal>> {
    Json(state.ledger().analyze())
}

async fn not_found(uri: Uri) -> Response {
    response::error_status(
        StatusCode::NOT_FOUND,
        &format!("No route for '{}'", uri.path()),
    )
}

fn timestamp() -> String {
    chrono::Local::now().format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credentials;
    use crate::ledger::Ledger;
    use axum::body::to_bytes;
    use axum::http::header::{CONTENT_TYPE, LOCATION};
    use axum::http::Method;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state() -> AppState {
        AppState::new(Arc::new(Ledger::new()), Credentials::default())
    }

    async fn send(state: &AppState, request: Request<Body>) -> Response {
        router(state.clone()).oneshot(request).await.unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, form: &str) -> Request<Body> {
        Request::post(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        serde_json::from_str(&body_text(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_add_list_and_analyze() {
        let state = state();
        let add = |form: &'static str| post_form("/api/add", form);

        let response = send(&state, add("category=Food&storeName=A&storeID=S1&amount=10")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!({"status": "ok"}));
        send(&state, add("category=Travel&storeName=B&storeID=S2&amount=30.00")).await;

        let response = send(&state, get("/api/expenses")).await;
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        let text = body_text(response).await;
        assert!(text.contains(r#""id":1,"category":"Food","storeName":"A","storeID":"S1","amount":10.00"#));
        assert!(text.contains(r#""id":2,"category":"Travel""#));

        let response = send(&state, get("/api/analysis")).await;
        assert_eq!(
            body_text(response).await,
            r#"[{"category":"Food","total":10.00,"percentage":25.00},{"category":"Travel","total":30.00,"percentage":75.00}]"#
        );
    }

    #[tokio::test]
    async fn test_add_with_bad_amount_is_rejected() {
        let state = state();
        let response = send(
            &state,
            post_form("/api/add", "category=Food&storeName=A&storeID=S1&amount=ten"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["status"], "error");
        assert!(json["message"].as_str().unwrap().contains("amount"));
        assert!(state.ledger().is_empty());

        let response = send(&state, post_form("/api/add", "category=Food")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(state.ledger().is_empty());
    }

    #[tokio::test]
    async fn test_add_out_of_range_amount_is_rejected() {
        let state = state();
        for amount in ["1e30", "50000000000000000000000000000", "-2e15"] {
            let form = format!("category=Food&amount={amount}");
            let response = send(&state, post_form("/api/add", &form)).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{amount}");
        }
        assert!(state.ledger().is_empty());
    }

    #[tokio::test]
    async fn test_largest_amounts_still_analyze() {
        let state = state();
        for category in ["Food", "Food", "Travel", "Bills"] {
            let form = format!("category={category}&amount=1e15");
            let response = send(&state, post_form("/api/add", &form)).await;
            assert_eq!(response.status(), StatusCode::OK);
        }
        assert_eq!(state.ledger().total_spending().to_wire(), "4000000000000000.00");

        let response = send(&state, get("/api/analysis")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json[0]["category"], "Food");
        assert_eq!(json[0]["percentage"].as_f64(), Some(50.0));
        assert_eq!(json[1]["percentage"].as_f64(), Some(25.0));
    }

    #[tokio::test]
    async fn test_add_missing_text_fields_are_empty() {
        let state = state();
        let response = send(&state, post_form("/api/add", "amount=%245.50")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let list = state.ledger().list();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].category(), "");
        assert_eq!(list[0].store_name(), "");
        assert_eq!(list[0].amount().to_wire(), "5.50");
        assert!(!list[0].date().is_empty());
    }

    #[tokio::test]
    async fn test_add_requires_post() {
        let state = state();
        let response = send(&state, get("/api/add?amount=1")).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(state.ledger().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_form_is_rejected() {
        let state = state();
        let form = format!("category={}&amount=1", "x".repeat(MAX_FORM_BYTES));
        let response = send(&state, post_form("/api/add", &form)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(state.ledger().is_empty());
    }

    #[tokio::test]
    async fn test_delete() {
        let state = state();
        send(&state, post_form("/api/add", "category=Food&amount=1")).await;
        send(&state, post_form("/api/add", "category=Food&amount=2")).await;

        let request = Request::delete("/api/delete?id=1")
            .body(Body::empty())
            .unwrap();
        let response = send(&state, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!({"status": "deleted"}));
        let ids: Vec<u64> = state.ledger().list().iter().map(|e| e.id().get()).collect();
        assert_eq!(ids, [2]);

        // unknown ids are not an error
        let response = send(&state, get("/api/delete?id=99")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(state.ledger().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_bad_id_is_rejected() {
        let state = state();
        for uri in ["/api/delete", "/api/delete?id=abc", "/api/delete?id=-3"] {
            let response = send(&state, get(uri)).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_analysis_empty() {
        let state = state();
        let response = send(&state, get("/api/analysis")).await;
        assert_eq!(body_text(response).await, "[]");
    }

    #[tokio::test]
    async fn test_login() {
        let state = state();

        let response = send(&state, get("/")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("<form method=\"POST\""));

        let response = send(&state, post_form("/", "username=user1&password=demo1")).await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[LOCATION], "/home");

        let response = send(&state, post_form("/", "username=user1&password=nope")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response)
            .await
            .contains(pages::INVALID_CREDENTIALS));
    }

    #[tokio::test]
    async fn test_home_and_unknown_routes() {
        let state = state();
        let response = send(&state, get("/home")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Money Management Dashboard"));

        let request = Request::builder()
            .method(Method::HEAD)
            .uri("/api/expenses")
            .body(Body::empty())
            .unwrap();
        assert_eq!(send(&state, request).await.status(), StatusCode::OK);

        let response = send(&state, get("/nope")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["status"], "error");

        let response = send(&state, post_form("/api/expenses", "")).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
