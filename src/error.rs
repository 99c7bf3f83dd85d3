use serde::{Deserialize, Serialize};

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies an error so that outer layers, such as the HTTP server, can decide how to report it.
/// It is attached to an `anyhow::Error` as context and recovered with `downcast_ref`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The configuration or home directory could not be loaded or written.
    Config,
    /// The caller sent something we could not use, e.g. an amount that does not parse.
    Request,
    /// The server itself failed, e.g. it could not bind its listening socket.
    Service,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

impl ErrorType {
    /// Finds the `ErrorType` attached to `e`, if any.
    pub fn of(e: &Error) -> Option<ErrorType> {
        e.downcast_ref::<ErrorType>().copied()
    }
}

/// Attaches an `ErrorType` to the error side of a `Result`.
pub trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| e.into().context(error_type))
    }
}
