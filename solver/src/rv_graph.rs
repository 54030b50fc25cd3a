#[cfg(test)]
mod tests;

use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use rayon::prelude::*;

use model::base_types::{Cost, RequestId, Seconds, VehicleId};
use model::config::Config;
use model::requests::{Request, Requests};
use model::road_network::RoadNetwork;
use model::vehicles::Vehicles;
use solution::StopSequence;

use crate::travel::travel;

/// Vehicle-request edge: the vehicle can serve the request alone from its
/// current state, at the given minimum cost.
#[derive(Clone, Debug, PartialEq)]
pub struct VrEdge {
    pub request: RequestId,
    pub cost: Cost,
    pub stops: StopSequence,
}

/// Pairwise compatibility between vehicles and requests (VR edges) and
/// between requests (RR edges).
///
/// An RR edge is a necessary-condition filter only: it certifies that some
/// empty vehicle standing at one of the two origins could serve both
/// requests within their deadlines. Its weight is the travel time between
/// the two origins and is used solely to order edges for pruning.
pub struct RvGraph {
    vr: BTreeMap<VehicleId, Vec<VrEdge>>,
    rr: BTreeMap<RequestId, BTreeMap<RequestId, Seconds>>,
}

impl RvGraph {
    /// VR edges of a vehicle, sorted by request id.
    pub fn vr_edges(&self, vehicle: &VehicleId) -> &[VrEdge] {
        self.vr.get(vehicle).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn rr_connected(&self, a: &RequestId, b: &RequestId) -> bool {
        self.rr
            .get(a)
            .map_or(false, |neighbors| neighbors.contains_key(b))
    }

    pub fn vr_edge_count(&self) -> usize {
        self.vr.values().map(Vec::len).sum()
    }

    pub fn rr_edge_count(&self) -> usize {
        self.rr.values().map(BTreeMap::len).sum::<usize>() / 2
    }
}

pub fn build_rv_graph(
    vehicles: &Vehicles,
    requests: &Requests,
    network: &dyn RoadNetwork,
    config: &Config,
    current_time: Seconds,
) -> RvGraph {
    // VR edges, one independent row per vehicle. Vehicles already at
    // capacity get no edges; seats only free up once the oracle is allowed
    // to schedule the committed drop-offs, which a single-request probe is.
    let vehicle_ids: Vec<&VehicleId> = vehicles.iter().collect();
    let vr_rows: Vec<(VehicleId, Vec<VrEdge>)> = vehicle_ids
        .par_iter()
        .map(|&vehicle_id| {
            let vehicle = vehicles.get(vehicle_id);
            let mut edges = Vec::new();
            if vehicle.seats_free() > 0 {
                for request_id in requests.iter() {
                    let request = requests.get(request_id);
                    if let Some((stops, cost)) =
                        travel(vehicle, &[request], network, config.max_delay)
                    {
                        edges.push(VrEdge {
                            request: request_id.clone(),
                            cost,
                            stops,
                        });
                    }
                }
            }
            (vehicle_id.clone(), edges)
        })
        .collect();
    let mut vr: BTreeMap<VehicleId, Vec<VrEdge>> = vr_rows.into_iter().collect();

    // RR edges per unordered request pair
    let request_ids: Vec<&RequestId> = requests.iter().collect();
    let pairs: Vec<(&RequestId, &RequestId)> =
        request_ids.iter().copied().tuple_combinations().collect();
    let rr_edges: Vec<(RequestId, RequestId, Seconds)> = pairs
        .par_iter()
        .filter_map(|&(a, b)| {
            rr_edge_weight(
                requests.get(a),
                requests.get(b),
                network,
                config.max_delay,
                current_time,
            )
            .map(|weight| (a.clone(), b.clone(), weight))
        })
        .collect();
    let mut rr: BTreeMap<RequestId, BTreeMap<RequestId, Seconds>> = BTreeMap::new();
    for (a, b, weight) in rr_edges {
        rr.entry(a.clone()).or_default().insert(b.clone(), weight);
        rr.entry(b).or_default().insert(a, weight);
    }

    if let Some(top_k) = config.rv.prune_top_k {
        prune(&mut vr, &mut rr, top_k);
    }

    RvGraph { vr, rr }
}

/// Weight and existence of the RR edge between two requests.
///
/// The hypothetical vehicle may start at either origin; from there the three
/// pooled orderings are tried, every pickup against its own pickup deadline
/// and every drop-off against its own drop-off deadline.
fn rr_edge_weight(
    a: &Request,
    b: &Request,
    network: &dyn RoadNetwork,
    max_delay: Seconds,
    current_time: Seconds,
) -> Option<Seconds> {
    let weight = network.shortest_travel_time(a.origin(), b.origin())?;
    let feasible = serves_both_in_order(a, b, network, max_delay, current_time)
        || serves_both_in_order(b, a, network, max_delay, current_time);
    feasible.then_some(weight)
}

/// Simulates the three pooled orderings for an empty vehicle standing at
/// `first`'s origin: pick1-drop1-pick2-drop2, pick1-pick2-drop2-drop1 and
/// pick1-pick2-drop1-drop2.
fn serves_both_in_order(
    first: &Request,
    second: &Request,
    network: &dyn RoadNetwork,
    max_delay: Seconds,
    current_time: Seconds,
) -> bool {
    let pickup = |r: &Request| (r.origin(), r.t_pickup_latest());
    let dropoff = |r: &Request| (r.destination(), r.t_dropoff_earliest() + max_delay);
    let orderings = [
        [pickup(first), dropoff(first), pickup(second), dropoff(second)],
        [pickup(first), pickup(second), dropoff(second), dropoff(first)],
        [pickup(first), pickup(second), dropoff(first), dropoff(second)],
    ];

    orderings.iter().any(|stops| {
        let mut position = first.origin();
        let mut time = current_time;
        for &(node, deadline) in stops {
            match network.shortest_travel_time(position, node) {
                Some(travel_time) => time += travel_time,
                None => return false,
            }
            if time > deadline {
                return false;
            }
            position = node;
        }
        true
    })
}

/// Degree cap. Each vehicle keeps its `top_k` cheapest VR edges; an RR edge
/// survives only if it ranks within the `top_k` cheapest at both endpoints.
/// Weight ties break by neighbor id.
fn prune(
    vr: &mut BTreeMap<VehicleId, Vec<VrEdge>>,
    rr: &mut BTreeMap<RequestId, BTreeMap<RequestId, Seconds>>,
    top_k: usize,
) {
    for edges in vr.values_mut() {
        edges.sort_by(|a, b| {
            a.cost
                .total_cmp(&b.cost)
                .then_with(|| a.request.cmp(&b.request))
        });
        edges.truncate(top_k);
        edges.sort_by(|a, b| a.request.cmp(&b.request));
    }

    let kept: BTreeMap<RequestId, BTreeSet<RequestId>> = rr
        .iter()
        .map(|(request, neighbors)| {
            let mut ranked: Vec<(Seconds, RequestId)> = neighbors
                .iter()
                .map(|(neighbor, weight)| (*weight, neighbor.clone()))
                .collect();
            ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
            (
                request.clone(),
                ranked
                    .into_iter()
                    .take(top_k)
                    .map(|(_, neighbor)| neighbor)
                    .collect(),
            )
        })
        .collect();
    for (request, neighbors) in rr.iter_mut() {
        neighbors
            .retain(|neighbor, _| kept[request].contains(neighbor) && kept[neighbor].contains(request));
    }
    rr.retain(|_, neighbors| !neighbors.is_empty());
}
