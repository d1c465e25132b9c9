#[derive(thiserror::Error, Debug, serde::Serialize)]
pub enum Error {
    #[error("Failed to retrieve JSON. Status code: {0}")]
    Status(u16),

    #[error("Unable to connect to the API. Please check your internet connection.")]
    Connect,

    #[error("Unable to resolve the API hostname. Please check your internet connection.")]
    Dns,

    #[error("Request timed out. Please try again.")]
    Timeout,

    #[error("Failed to parse API response: {0}")]
    Decode(String),

    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
