use std::sync::Arc;

use common::types::Counter;

use crate::store::CounterStore;

/// Read-only view over the tally store. No side effects; never fails,
/// since reads normalize rather than error.
pub struct ResultService {
    store: Arc<dyn CounterStore>,
}

impl ResultService {
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        Self { store }
    }

    pub async fn results(&self) -> Counter {
        self.store.load().await
    }
}
