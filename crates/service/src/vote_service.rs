use std::str::FromStr;
use std::sync::Arc;

use common::types::Counter;
use tracing::info;

use crate::errors::ServiceError;
use crate::store::CounterStore;

/// One of the two enumerated ballot options. Parsing is strict: exactly
/// `"jajang"` or `"jjamppong"`, case-sensitive, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Jajang,
    Jjamppong,
}

impl FromStr for Choice {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jajang" => Ok(Choice::Jajang),
            "jjamppong" => Ok(Choice::Jjamppong),
            other => Err(ServiceError::InvalidChoice(other.to_string())),
        }
    }
}

/// Validates an incoming ballot and applies the load-increment-save cycle
/// against the injected store.
pub struct VoteService {
    store: Arc<dyn CounterStore>,
}

impl VoteService {
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        Self { store }
    }

    /// Cast one vote. Invalid input is rejected before any store access, so
    /// persisted state never changes on error. On success exactly one field
    /// of the persisted tally grows by 1; the new tally is returned.
    pub async fn cast_vote(&self, raw: &str) -> Result<Counter, ServiceError> {
        let choice: Choice = raw.parse()?;
        let counter = self
            .store
            .update(Box::new(move |c| match choice {
                Choice::Jajang => c.jajang = c.jajang.saturating_add(1),
                Choice::Jjamppong => c.jjamppong = c.jjamppong.saturating_add(1),
            }))
            .await?;
        info!(choice = ?choice, jajang = counter.jajang, jjamppong = counter.jjamppong, "vote recorded");
        Ok(counter)
    }
}
