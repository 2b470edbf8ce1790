/// Query subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("invalid timeline window: {0}")]
    InvalidWindow(String),

    #[error("search failed: {0}")]
    SearchFailed(String),
}
