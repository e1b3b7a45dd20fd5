use reqwest::StatusCode;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Server returned {status}: {message}")]
    Api { status: StatusCode, message: String },
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status == StatusCode::NOT_FOUND)
    }

    /// Text fit to show a voter. Input problems are explained; anything
    /// else suggests trying again.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { status, message } if status.is_client_error() => message.clone(),
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }
}
