mod memory_source;
mod query_engine;

pub use memory_source::IMemorySource;
pub use query_engine::IQueryEngine;
