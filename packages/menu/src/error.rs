use thiserror::Error;

#[derive(Error, Debug)]
pub enum MenuError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{method} {url} failed with status {status}: {body}")]
    Status {
        method: String,
        url: String,
        status: u16,
        body: String,
    },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Server did not return an id for new item '{0}'")]
    MissingId(String),
}

pub type MenuResult<T> = Result<T, MenuError>;
