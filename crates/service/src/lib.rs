//! Service layer for the voting app.
//! - `store` defines the counter persistence seam.
//! - `storage` holds the JSON-file-backed implementation.
//! - `vote_service` / `result_service` are the two operations the HTTP
//!   boundary consumes.

pub mod errors;
pub mod result_service;
pub mod runtime;
pub mod storage;
pub mod store;
#[cfg(test)]
pub mod test_support;
pub mod vote_service;
