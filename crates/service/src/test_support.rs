#![cfg(test)]
use std::sync::Arc;

use async_trait::async_trait;
use common::types::Counter;
use tokio::sync::RwLock;

use crate::errors::ServiceError;
use crate::store::CounterStore;

/// In-memory tally store double for exercising the services without disk.
pub struct MemoryCounterStore {
    inner: RwLock<Counter>,
}

impl MemoryCounterStore {
    pub fn new(initial: Counter) -> Arc<Self> {
        Arc::new(Self { inner: RwLock::new(initial) })
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn load(&self) -> Counter {
        *self.inner.read().await
    }

    async fn save(&self, counter: Counter) -> Result<(), ServiceError> {
        *self.inner.write().await = counter;
        Ok(())
    }

    async fn update(
        &self,
        mutate: Box<dyn for<'a> FnOnce(&'a mut Counter) + Send>,
    ) -> Result<Counter, ServiceError> {
        let mut guard = self.inner.write().await;
        mutate(&mut guard);
        Ok(*guard)
    }
}
