//! Storage backends for the feature collection.

mod memory;
mod mongo;
mod traits;

pub use memory::InMemoryStore;
pub use mongo::MongoStore;
pub use traits::{FeatureStore, StoreFuture};
