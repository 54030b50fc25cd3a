use std::collections::HashSet;

use thiserror::Error;

use crate::base_types::{PassengerCount, RequestId, VehicleId};
use crate::requests::Requests;
use crate::vehicles::Vehicles;

/// Input defects that abort the solve before anything is built.
///
/// Routine infeasibility (an unreachable pair, a deadline nobody can meet)
/// is never an error; it only means an edge or trip is absent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("duplicate request id {0}")]
    DuplicateRequest(RequestId),
    #[error("duplicate vehicle id {0}")]
    DuplicateVehicle(VehicleId),
    #[error("vehicle {id} has capacity 0")]
    ZeroCapacity { id: VehicleId },
    #[error("vehicle {id} carries {onboard} passengers but has capacity {capacity}")]
    OnboardExceedsCapacity {
        id: VehicleId,
        onboard: usize,
        capacity: PassengerCount,
    },
    #[error("request {0} has identical origin and destination")]
    DegenerateRequest(RequestId),
    #[error("request {request} is already onboard vehicle {vehicle}")]
    OnboardResubmitted {
        request: RequestId,
        vehicle: VehicleId,
    },
    #[error("request {0}: destination is not reachable from origin")]
    UnreachableDestination(RequestId),
    #[error("malformed instance: {0}")]
    Malformed(String),
}

/// Checks the batch invariants that individual constructors cannot see:
/// degenerate requests, onboard ids colliding with the new batch or with
/// other vehicles.
pub fn validate_instance(requests: &Requests, vehicles: &Vehicles) -> Result<(), InvalidInput> {
    for id in requests.iter() {
        let request = requests.get(id);
        if request.origin() == request.destination() {
            return Err(InvalidInput::DegenerateRequest(id.clone()));
        }
    }

    let mut onboard_seen: HashSet<&RequestId> = HashSet::new();
    for vehicle_id in vehicles.iter() {
        for onboard in vehicles.get(vehicle_id).onboard() {
            if requests.contains(onboard.id()) {
                return Err(InvalidInput::OnboardResubmitted {
                    request: onboard.id().clone(),
                    vehicle: vehicle_id.clone(),
                });
            }
            if !onboard_seen.insert(onboard.id()) {
                return Err(InvalidInput::DuplicateRequest(onboard.id().clone()));
            }
        }
    }
    Ok(())
}
