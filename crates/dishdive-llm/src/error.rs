//! Model client errors. These never leave the extraction stage.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("No model provider configured")]
    NotConfigured,

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("Could not decode model response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        LlmError::Transport(e.to_string())
    }
}
