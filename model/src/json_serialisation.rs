
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::base_types::{Cost, NodeId, PassengerCount, RequestId, Seconds, VehicleId};
use crate::config::Config;
use crate::requests::{Request, Requests};
use crate::road_network::TravelTimeMatrix;
use crate::validation::{validate_instance, InvalidInput};
use crate::vehicles::{Vehicle, Vehicles};

type IdType = String;

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonInput {
    network: JsonNetwork,
    vehicles: Vec<JsonVehicle>,
    requests: Vec<JsonRequest>,
    parameters: Option<JsonParameters>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonNetwork {
    /// Undirected edges: from, to, travel time in seconds.
    edges: Vec<(NodeId, NodeId, Seconds)>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonVehicle {
    id: IdType,
    position: NodeId,
    time: Option<Seconds>,
    capacity: PassengerCount,
    onboard: Option<Vec<JsonOnboard>>,
}

/// A committed passenger. The pickup already happened, so the record carries
/// its drop-off deadline reference verbatim instead of deriving it.
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonOnboard {
    id: IdType,
    origin: NodeId,
    destination: NodeId,
    request_time: Seconds,
    dropoff_earliest: Seconds,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonRequest {
    id: IdType,
    origin: NodeId,
    destination: NodeId,
    request_time: Seconds,
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct JsonParameters {
    current_time: Option<Seconds>,
    omega: Option<Seconds>,
    max_delay: Option<Seconds>,
    prune_top_k: Option<usize>,
    vehicle_time_budget: Option<Seconds>,
    cost_penalty: Option<Cost>,
    time_limit: Option<Seconds>,
    gap: Option<f64>,
}

/// A fully loaded batch problem, shared read-only between solver workers.
pub struct Instance {
    pub network: Arc<TravelTimeMatrix>,
    pub vehicles: Arc<Vehicles>,
    pub requests: Arc<Requests>,
    pub config: Arc<Config>,
    pub current_time: Seconds,
}

pub fn load_instance_from_json(input: serde_json::Value) -> Result<Instance, InvalidInput> {
    let json: JsonInput =
        serde_json::from_value(input).map_err(|e| InvalidInput::Malformed(e.to_string()))?;

    let defaults = Config::default();
    let parameters = json.parameters.unwrap_or_default();
    let current_time = parameters.current_time.unwrap_or(0.0);
    let config = Config::new(
        parameters.omega.unwrap_or(defaults.omega),
        parameters.max_delay.unwrap_or(defaults.max_delay),
        parameters.prune_top_k.or(defaults.rv.prune_top_k),
        parameters
            .vehicle_time_budget
            .or(defaults.rtv.vehicle_time_budget),
        parameters.cost_penalty.unwrap_or(defaults.ilp.cost_penalty),
        parameters.time_limit.unwrap_or(defaults.ilp.time_limit),
        parameters.gap.unwrap_or(defaults.ilp.gap),
    );

    let network = TravelTimeMatrix::from_undirected_edges(&json.network.edges);

    let mut requests: Vec<Request> = Vec::with_capacity(json.requests.len());
    for record in json.requests {
        let id = RequestId::from(&record.id);
        let request = Request::with_deadlines(
            id.clone(),
            record.origin,
            record.destination,
            record.request_time,
            config.omega,
            &network,
        )
        .ok_or(InvalidInput::UnreachableDestination(id))?;
        requests.push(request);
    }

    let mut vehicles: Vec<Vehicle> = Vec::with_capacity(json.vehicles.len());
    for record in json.vehicles {
        let onboard = record
            .onboard
            .unwrap_or_default()
            .into_iter()
            .map(|passenger| {
                Request::new(
                    RequestId::from(&passenger.id),
                    passenger.origin,
                    passenger.destination,
                    passenger.request_time,
                    passenger.request_time,
                    passenger.dropoff_earliest,
                )
            })
            .collect();
        vehicles.push(Vehicle::new(
            VehicleId::from(&record.id),
            record.position,
            record.time.unwrap_or(current_time),
            record.capacity,
            onboard,
        )?);
    }

    let requests = Requests::new(requests)?;
    let vehicles = Vehicles::new(vehicles)?;
    validate_instance(&requests, &vehicles)?;

    Ok(Instance {
        network: Arc::new(network),
        vehicles: Arc::new(vehicles),
        requests: Arc::new(requests),
        config: Arc::new(config),
        current_time,
    })
}
