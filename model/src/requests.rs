use std::collections::HashMap;
use std::fmt;

use crate::base_types::{NodeId, RequestId, Seconds, VehicleId};
use crate::road_network::RoadNetwork;
use crate::validation::InvalidInput;
use crate::vehicles::Vehicles;

/// A desired ride with origin, destination and time window.
///
/// Immutable for the batch. The two deadlines are absolute times on the
/// batch clock: the latest acceptable pickup and the drop-off time of the
/// direct, detour-free ride (drop-offs may run `max_delay` later).
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    id: RequestId,
    origin: NodeId,
    destination: NodeId,
    t_request: Seconds,
    t_pickup_latest: Seconds,
    t_dropoff_earliest: Seconds,
}

impl Request {
    /// Creates a request with explicitly supplied deadlines. Used for
    /// onboard passengers, whose pickup already happened.
    pub fn new(
        id: RequestId,
        origin: NodeId,
        destination: NodeId,
        t_request: Seconds,
        t_pickup_latest: Seconds,
        t_dropoff_earliest: Seconds,
    ) -> Request {
        Request {
            id,
            origin,
            destination,
            t_request,
            t_pickup_latest,
            t_dropoff_earliest,
        }
    }

    /// Derives the pickup deadline from omega and the earliest drop-off from
    /// the direct travel time. `None` if the destination cannot be reached
    /// from the origin at all.
    pub fn with_deadlines(
        id: RequestId,
        origin: NodeId,
        destination: NodeId,
        t_request: Seconds,
        omega: Seconds,
        network: &dyn RoadNetwork,
    ) -> Option<Request> {
        let direct = network.shortest_travel_time(origin, destination)?;
        Some(Request {
            id,
            origin,
            destination,
            t_request,
            t_pickup_latest: t_request + omega,
            t_dropoff_earliest: t_request + direct,
        })
    }

    pub fn id(&self) -> &RequestId {
        &self.id
    }

    pub fn origin(&self) -> NodeId {
        self.origin
    }

    pub fn destination(&self) -> NodeId {
        self.destination
    }

    pub fn t_request(&self) -> Seconds {
        self.t_request
    }

    pub fn t_pickup_latest(&self) -> Seconds {
        self.t_pickup_latest
    }

    pub fn t_dropoff_earliest(&self) -> Seconds {
        self.t_dropoff_earliest
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "request {} ({} -> {}; pickup until {}; dropoff from {})",
            self.id, self.origin, self.destination, self.t_pickup_latest, self.t_dropoff_earliest
        )
    }
}

/////////////////////////////////////////////////////////////////////
///////////////////////////// Requests //////////////////////////////
/////////////////////////////////////////////////////////////////////

/// The request batch, iterated in sorted id order for determinism.
pub struct Requests {
    requests: HashMap<RequestId, Request>,
    ids_sorted: Vec<RequestId>,
}

impl Requests {
    pub fn new(requests: Vec<Request>) -> Result<Requests, InvalidInput> {
        let mut map: HashMap<RequestId, Request> = HashMap::new();
        for request in requests {
            let id = request.id().clone();
            if map.insert(id.clone(), request).is_some() {
                return Err(InvalidInput::DuplicateRequest(id));
            }
        }
        let mut ids_sorted: Vec<RequestId> = map.keys().cloned().collect();
        ids_sorted.sort();
        Ok(Requests {
            requests: map,
            ids_sorted,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &RequestId> + '_ {
        self.ids_sorted.iter()
    }

    pub fn get(&self, id: &RequestId) -> &Request {
        self.requests.get(id).unwrap()
    }

    pub fn contains(&self, id: &RequestId) -> bool {
        self.requests.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Splits the batch into requests whose origin at least one vehicle can
    /// reach and the ids of those no vehicle can serve.
    pub fn partition_reachable(
        &self,
        vehicles: &Vehicles,
        network: &dyn RoadNetwork,
    ) -> (Requests, Vec<RequestId>) {
        let mut reachable: HashMap<RequestId, Request> = HashMap::new();
        let mut unreachable: Vec<RequestId> = Vec::new();
        for id in self.iter() {
            let request = self.get(id);
            let served = vehicles
                .iter()
                .any(|v: &VehicleId| network.has_path(vehicles.get(v).position(), request.origin()));
            if served {
                reachable.insert(id.clone(), request.clone());
            } else {
                unreachable.push(id.clone());
            }
        }
        let mut ids_sorted: Vec<RequestId> = reachable.keys().cloned().collect();
        ids_sorted.sort();
        (
            Requests {
                requests: reachable,
                ids_sorted,
            },
            unreachable,
        )
    }
}
