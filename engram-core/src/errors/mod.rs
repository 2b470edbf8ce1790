mod engram_error;
mod query_error;
mod storage_error;

pub use engram_error::{EngramError, EngramResult};
pub use query_error::QueryError;
pub use storage_error::StorageError;
