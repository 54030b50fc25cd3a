use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use model::base_types::{Cost, RequestId, VehicleId, COST_ZERO};

use crate::stop_sequence::StopSequence;
use crate::trip::Trip;

/// A trip committed to a vehicle: the request set, the stop ordering that
/// realizes it and the travel-time cost of that ordering.
#[derive(Clone, Debug, PartialEq)]
pub struct AssignedTrip {
    pub trip: Trip,
    pub stops: StopSequence,
    pub cost: Cost,
}

/// The result of a batch solve: a partial vehicle -> trip mapping with
/// request-disjoint trips, plus the requests nobody serves.
///
/// Frozen once returned; maps are ordered so iteration is deterministic.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Assignment {
    assigned: BTreeMap<VehicleId, AssignedTrip>,
    unserved: BTreeSet<RequestId>,
}

impl Assignment {
    pub fn empty() -> Assignment {
        Assignment::default()
    }

    pub fn assign(&mut self, vehicle: VehicleId, trip: AssignedTrip) {
        self.assigned.insert(vehicle, trip);
    }

    pub fn mark_unserved(&mut self, request: RequestId) {
        self.unserved.insert(request);
    }

    pub fn get(&self, vehicle: &VehicleId) -> Option<&AssignedTrip> {
        self.assigned.get(vehicle)
    }

    pub fn assigned_iter(&self) -> impl Iterator<Item = (&VehicleId, &AssignedTrip)> + '_ {
        self.assigned.iter()
    }

    pub fn unserved_iter(&self) -> impl Iterator<Item = &RequestId> + '_ {
        self.unserved.iter()
    }

    pub fn is_unserved(&self, request: &RequestId) -> bool {
        self.unserved.contains(request)
    }

    pub fn number_of_assigned_vehicles(&self) -> usize {
        self.assigned.len()
    }

    pub fn number_of_unserved(&self) -> usize {
        self.unserved.len()
    }

    /// True iff no request appears in two assigned trips.
    pub fn trips_are_request_disjoint(&self) -> bool {
        let mut seen: BTreeSet<&RequestId> = BTreeSet::new();
        self.assigned
            .values()
            .flat_map(|assigned| assigned.trip.requests())
            .all(|request| seen.insert(request))
    }

    /// Total travel cost plus the linear penalty for every unserved request.
    pub fn objective_value(&self, cost_penalty: Cost) -> Cost {
        let travel: Cost = self
            .assigned
            .values()
            .fold(COST_ZERO, |sum, assigned| sum + assigned.cost);
        travel + cost_penalty * self.unserved.len() as Cost
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (vehicle, assigned) in &self.assigned {
            writeln!(
                f,
                "{} -> {} (cost {:.1}): {}",
                vehicle, assigned.trip, assigned.cost, assigned.stops
            )?;
        }
        write!(f, "unserved: {}", self.unserved.len())
    }
}
