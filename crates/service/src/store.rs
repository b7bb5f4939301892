use async_trait::async_trait;
use common::types::Counter;

use crate::errors::ServiceError;

/// Trait abstraction for vote tally storage.
/// Implementations can be file-backed or in-memory (test doubles).
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Read the current tally. Never fails: a missing or corrupt backing
    /// store reads as the zeroed counter.
    async fn load(&self) -> Counter;

    /// Persist the given tally, replacing whatever was stored before.
    async fn save(&self, counter: Counter) -> Result<(), ServiceError>;

    /// Apply a mutation under the store's single-writer serialization point
    /// and persist the result. Returns the post-mutation counter.
    async fn update(
        &self,
        mutate: Box<dyn for<'a> FnOnce(&'a mut Counter) + Send>,
    ) -> Result<Counter, ServiceError>;
}
