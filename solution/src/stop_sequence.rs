use std::fmt;

use model::base_types::{NodeId, PassengerCount, RequestId};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StopKind {
    Pickup,
    Dropoff,
}

impl fmt::Display for StopKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StopKind::Pickup => write!(f, "pickup"),
            StopKind::Dropoff => write!(f, "dropoff"),
        }
    }
}

/// One visit of a stop sequence: pick up or drop off a single request at
/// its origin or destination node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Stop {
    kind: StopKind,
    request: RequestId,
    node: NodeId,
}

impl Stop {
    pub fn pickup(request: RequestId, node: NodeId) -> Stop {
        Stop {
            kind: StopKind::Pickup,
            request,
            node,
        }
    }

    pub fn dropoff(request: RequestId, node: NodeId) -> Stop {
        Stop {
            kind: StopKind::Dropoff,
            request,
            node,
        }
    }

    pub fn kind(&self) -> StopKind {
        self.kind
    }

    pub fn request(&self) -> &RequestId {
        &self.request
    }

    pub fn node(&self) -> NodeId {
        self.node
    }
}

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}@{}", self.kind, self.request, self.node)
    }
}

/////////////////////////////////////////////////////////////////////
/////////////////////////// StopSequence ////////////////////////////
/////////////////////////////////////////////////////////////////////

/// An ordered list of pickups and drop-offs realizing a trip: one drop-off
/// per committed passenger, a pickup and a drop-off per new request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StopSequence {
    stops: Vec<Stop>,
}

impl StopSequence {
    pub fn new(stops: Vec<Stop>) -> StopSequence {
        StopSequence { stops }
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// True iff every request picked up in this sequence is dropped off
    /// strictly later.
    pub fn pickup_precedes_dropoff(&self) -> bool {
        self.stops.iter().enumerate().all(|(i, stop)| {
            stop.kind() != StopKind::Pickup
                || self.stops[i + 1..]
                    .iter()
                    .any(|s| s.kind() == StopKind::Dropoff && s.request() == stop.request())
        })
    }

    /// The largest instantaneous load over all prefixes, starting from the
    /// given number of passengers already onboard.
    pub fn max_load(&self, initial_onboard: PassengerCount) -> PassengerCount {
        let mut load = initial_onboard as i32;
        let mut max = load;
        for stop in &self.stops {
            match stop.kind() {
                StopKind::Pickup => load += 1,
                StopKind::Dropoff => load -= 1,
            }
            max = max.max(load);
        }
        max as PassengerCount
    }
}

impl fmt::Display for StopSequence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut stops = self.stops.iter();
        match stops.next() {
            Some(stop) => write!(f, "{}", stop)?,
            None => return write!(f, "empty"),
        }
        for stop in stops {
            write!(f, " - {}", stop)?;
        }
        Ok(())
    }
}
