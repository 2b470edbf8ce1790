mod edge;
mod memory_query;
mod node;
mod stats;
mod timeline;
mod window;

pub use edge::{EdgeAttributes, GraphEdge};
pub use memory_query::{MemoryQuery, RecallQuery, SearchFilter};
pub use node::{is_wildcard, GraphNode, Scope, EDGES_ATTRIBUTE_KEY, METRIC_SERIES_TYPE};
pub use stats::GraphStats;
pub use timeline::{BucketSize, TimelineRequest, TimelineResponse};
pub use window::{SampleOrder, WindowQuery};
