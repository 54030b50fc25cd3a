use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Road-network vertex handle. Opaque to the engine; only equality and
/// hashing are needed, the road network provider owns the meaning.
pub type NodeId = u64;

/// All times and durations are seconds on the batch-relative clock.
pub type Seconds = f64;

pub type PassengerCount = u8;

pub type Cost = f64;

pub const COST_ZERO: Cost = 0.0;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    pub fn from(id: &str) -> RequestId {
        RequestId(id.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(String);

impl VehicleId {
    pub fn from(id: &str) -> VehicleId {
        VehicleId(id.to_string())
    }
}
