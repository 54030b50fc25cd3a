
use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};

use itertools::Itertools;
use rayon::prelude::*;

use model::base_types::{Cost, RequestId, VehicleId};
use model::config::Config;
use model::requests::{Request, Requests};
use model::road_network::RoadNetwork;
use model::vehicles::{Vehicle, Vehicles};
use solution::{StopSequence, Trip};

use crate::rv_graph::RvGraph;
use crate::travel::travel;

/// Trip-vehicle edge: the optimal cost of this vehicle serving exactly this
/// trip, with the stop ordering attaining it.
#[derive(Clone, Debug, PartialEq)]
pub struct TvEdge {
    pub trip: Trip,
    pub cost: Cost,
    pub stops: StopSequence,
}

/// The request-trip-vehicle structure: per vehicle every feasible trip with
/// its optimal cost, plus the membership edges from requests to trips.
///
/// Feasibility is downward closed by construction: a trip only enters the
/// graph for a vehicle once all of its one-smaller sub-trips already have.
pub struct RtvGraph {
    edges: BTreeMap<VehicleId, Vec<TvEdge>>,
    trips_of_request: BTreeMap<RequestId, BTreeSet<Trip>>,
}

impl RtvGraph {
    /// Vehicles with at least one feasible trip, in id order.
    pub fn vehicles(&self) -> impl Iterator<Item = &VehicleId> + '_ {
        self.edges.keys()
    }

    /// Trip-vehicle edges of one vehicle, sorted by trip.
    pub fn edges_of(&self, vehicle: &VehicleId) -> &[TvEdge] {
        self.edges.get(vehicle).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edge(&self, vehicle: &VehicleId, trip: &Trip) -> Option<&TvEdge> {
        self.edges_of(vehicle).iter().find(|e| &e.trip == trip)
    }

    pub fn trips_containing(&self, request: &RequestId) -> impl Iterator<Item = &Trip> + '_ {
        self.trips_of_request.get(request).into_iter().flatten()
    }

    pub fn trip_count(&self) -> usize {
        self.trips_of_request
            .values()
            .flatten()
            .collect::<BTreeSet<_>>()
            .len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }
}

pub fn build_rtv_graph(
    vehicles: &Vehicles,
    requests: &Requests,
    network: &dyn RoadNetwork,
    rv: &RvGraph,
    config: &Config,
) -> RtvGraph {
    let vehicle_ids: Vec<&VehicleId> = vehicles.iter().collect();
    let rows: Vec<(VehicleId, Vec<TvEdge>)> = vehicle_ids
        .par_iter()
        .map(|&vehicle_id| {
            let row =
                enumerate_vehicle_trips(vehicles.get(vehicle_id), requests, network, rv, config);
            (vehicle_id.clone(), row)
        })
        .collect();

    let mut edges: BTreeMap<VehicleId, Vec<TvEdge>> = BTreeMap::new();
    let mut trips_of_request: BTreeMap<RequestId, BTreeSet<Trip>> = BTreeMap::new();
    for (vehicle_id, row) in rows {
        if row.is_empty() {
            continue;
        }
        for edge in &row {
            for request in edge.trip.requests() {
                trips_of_request
                    .entry(request.clone())
                    .or_default()
                    .insert(edge.trip.clone());
            }
        }
        edges.insert(vehicle_id, row);
    }
    RtvGraph {
        edges,
        trips_of_request,
    }
}

/// Feasible trips of sizes 1..=free seats, built level by level: size 1
/// straight from the VR edges, size 2 filtered through the RR edges, larger
/// sizes by unioning two feasible trips one size down and requiring every
/// one-smaller subset to be feasible before the oracle runs.
///
/// Stops when a level stays empty, the size limit is reached, or the
/// optional wall-clock budget runs out; a budget cut keeps only trips the
/// oracle fully verified.
fn enumerate_vehicle_trips(
    vehicle: &Vehicle,
    requests: &Requests,
    network: &dyn RoadNetwork,
    rv: &RvGraph,
    config: &Config,
) -> Vec<TvEdge> {
    let max_size = vehicle.seats_free() as usize;
    if max_size == 0 {
        return Vec::new();
    }
    let deadline = config
        .rtv
        .vehicle_time_budget
        .map(|budget| Instant::now() + Duration::from_secs_f64(budget));

    let mut feasible: BTreeMap<Trip, (Cost, StopSequence)> = BTreeMap::new();
    let mut current_level: Vec<Trip> = Vec::new();
    for edge in rv.vr_edges(vehicle.id()) {
        let trip = Trip::single(edge.request.clone());
        feasible.insert(trip.clone(), (edge.cost, edge.stops.clone()));
        current_level.push(trip);
    }

    'levels: for size in 2..=max_size {
        if current_level.len() < 2 {
            break;
        }
        let mut candidates: BTreeSet<Trip> = BTreeSet::new();
        for (left, right) in current_level.iter().tuple_combinations() {
            let candidate = left.union(right);
            if candidate.len() != size {
                continue;
            }
            if size == 2 {
                let mut members = candidate.requests();
                let (a, b) = (members.next().unwrap(), members.next().unwrap());
                if !rv.rr_connected(a, b) {
                    continue;
                }
            } else if !candidate
                .subsets_dropping_one()
                .all(|subset| feasible.contains_key(&subset))
            {
                continue;
            }
            candidates.insert(candidate);
        }

        let mut next_level: Vec<Trip> = Vec::new();
        for candidate in candidates {
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    break 'levels;
                }
            }
            let members: Vec<&Request> = candidate.requests().map(|id| requests.get(id)).collect();
            if let Some((stops, cost)) = travel(vehicle, &members, network, config.max_delay) {
                feasible.insert(candidate.clone(), (cost, stops));
                next_level.push(candidate);
            }
        }
        if next_level.is_empty() {
            break;
        }
        current_level = next_level;
    }

    feasible
        .into_iter()
        .map(|(trip, (cost, stops))| TvEdge { trip, cost, stops })
        .collect()
}
