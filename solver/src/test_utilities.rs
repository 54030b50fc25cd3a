use model::base_types::{NodeId, PassengerCount, RequestId, Seconds, VehicleId};
use model::config::Config;
use model::requests::{Request, Requests};
use model::road_network::{RoadNetwork, TravelTimeMatrix};
use model::vehicles::{Vehicle, Vehicles};

pub(crate) const A: NodeId = 0;
pub(crate) const B: NodeId = 1;
pub(crate) const C: NodeId = 2;
pub(crate) const D: NodeId = 3;

/// Triangle used by most scenarios: A-B 60, B-C 60, A-C 90.
pub(crate) fn triangle() -> TravelTimeMatrix {
    TravelTimeMatrix::from_undirected_edges(&[(A, B, 60.0), (B, C, 60.0), (A, C, 90.0)])
}

/// Single A-B link of 60 seconds.
pub(crate) fn line() -> TravelTimeMatrix {
    TravelTimeMatrix::from_undirected_edges(&[(A, B, 60.0)])
}

pub(crate) fn request(
    id: &str,
    origin: NodeId,
    destination: NodeId,
    omega: Seconds,
    network: &dyn RoadNetwork,
) -> Request {
    Request::with_deadlines(RequestId::from(id), origin, destination, 0.0, omega, network).unwrap()
}

pub(crate) fn vehicle(id: &str, position: NodeId, capacity: PassengerCount) -> Vehicle {
    Vehicle::new(VehicleId::from(id), position, 0.0, capacity, vec![]).unwrap()
}

pub(crate) fn vehicle_with_onboard(
    id: &str,
    position: NodeId,
    capacity: PassengerCount,
    onboard: Vec<Request>,
) -> Vehicle {
    Vehicle::new(VehicleId::from(id), position, 0.0, capacity, onboard).unwrap()
}

pub(crate) fn requests(list: Vec<Request>) -> Requests {
    Requests::new(list).unwrap()
}

pub(crate) fn vehicles(list: Vec<Vehicle>) -> Vehicles {
    Vehicles::new(list).unwrap()
}

pub(crate) fn config_with_max_delay(max_delay: Seconds) -> Config {
    Config {
        max_delay,
        ..Config::default()
    }
}

pub(crate) fn rid(id: &str) -> RequestId {
    RequestId::from(id)
}

pub(crate) fn vid(id: &str) -> VehicleId {
    VehicleId::from(id)
}
