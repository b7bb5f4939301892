use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// The persisted vote tally pair. This is both the on-disk JSON layout and
/// the wire shape returned by the results endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counter {
    pub jajang: u64,
    pub jjamppong: u64,
}
