use std::collections::{BTreeMap, BTreeSet};

use model::base_types::{Cost, RequestId, VehicleId};
use solution::Trip;

use crate::rtv_graph::{RtvGraph, TvEdge};

/// Warm-start seed for the exact matching: repeatedly commits the
/// (vehicle, trip) pair minimizing cost per served request among vehicles
/// still free and trips whose requests are all unserved.
///
/// Dividing by trip size biases toward high-occupancy trips, which tends to
/// give the ILP a stronger incumbent than plain cost would. Ties resolve to
/// the first candidate in vehicle-id, then trip order.
pub fn greedy_assignment(rtv: &RtvGraph) -> BTreeMap<VehicleId, Trip> {
    let mut seed: BTreeMap<VehicleId, Trip> = BTreeMap::new();
    let mut served: BTreeSet<&RequestId> = BTreeSet::new();
    let mut free: Vec<&VehicleId> = rtv.vehicles().collect();

    loop {
        let mut best: Option<(usize, &TvEdge, Cost)> = None;
        for (index, vehicle) in free.iter().enumerate() {
            for edge in rtv.edges_of(vehicle) {
                if edge.trip.requests().any(|request| served.contains(request)) {
                    continue;
                }
                let relative = edge.cost / edge.trip.len() as Cost;
                let improves = match &best {
                    None => true,
                    Some((_, _, incumbent)) => relative < *incumbent,
                };
                if improves {
                    best = Some((index, edge, relative));
                }
            }
        }

        match best {
            Some((index, edge, _)) => {
                let vehicle = free.remove(index);
                served.extend(edge.trip.requests());
                seed.insert(vehicle.clone(), edge.trip.clone());
            }
            None => break,
        }
    }
    seed
}
