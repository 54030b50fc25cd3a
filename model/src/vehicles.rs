use std::collections::HashMap;
use std::fmt;

use crate::base_types::{NodeId, PassengerCount, Seconds, VehicleId};
use crate::requests::Request;
use crate::validation::InvalidInput;

/// A fleet unit: current position and clock, seat capacity and the
/// passengers already picked up but not yet dropped off.
///
/// Mutable across batches, frozen within one solve.
#[derive(Clone, Debug)]
pub struct Vehicle {
    id: VehicleId,
    position: NodeId,
    t_vehicle: Seconds,
    capacity: PassengerCount,
    onboard: Vec<Request>,
}

impl Vehicle {
    pub fn new(
        id: VehicleId,
        position: NodeId,
        t_vehicle: Seconds,
        capacity: PassengerCount,
        onboard: Vec<Request>,
    ) -> Result<Vehicle, InvalidInput> {
        if capacity == 0 {
            return Err(InvalidInput::ZeroCapacity { id });
        }
        if onboard.len() > capacity as usize {
            return Err(InvalidInput::OnboardExceedsCapacity {
                onboard: onboard.len(),
                capacity,
                id,
            });
        }
        Ok(Vehicle {
            id,
            position,
            t_vehicle,
            capacity,
            onboard,
        })
    }

    pub fn id(&self) -> &VehicleId {
        &self.id
    }

    pub fn position(&self) -> NodeId {
        self.position
    }

    pub fn t_vehicle(&self) -> Seconds {
        self.t_vehicle
    }

    pub fn capacity(&self) -> PassengerCount {
        self.capacity
    }

    /// Committed passengers in pickup order.
    pub fn onboard(&self) -> &[Request] {
        &self.onboard
    }

    pub fn onboard_count(&self) -> usize {
        self.onboard.len()
    }

    pub fn seats_free(&self) -> PassengerCount {
        self.capacity - self.onboard.len() as PassengerCount
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "vehicle {} (at {}; {}/{} seats taken)",
            self.id,
            self.position,
            self.onboard.len(),
            self.capacity
        )
    }
}

/////////////////////////////////////////////////////////////////////
///////////////////////////// Vehicles //////////////////////////////
/////////////////////////////////////////////////////////////////////

/// The fleet, iterated in sorted id order for determinism.
pub struct Vehicles {
    vehicles: HashMap<VehicleId, Vehicle>,
    ids_sorted: Vec<VehicleId>,
}

impl Vehicles {
    pub fn new(vehicles: Vec<Vehicle>) -> Result<Vehicles, InvalidInput> {
        let mut map: HashMap<VehicleId, Vehicle> = HashMap::new();
        for vehicle in vehicles {
            let id = vehicle.id().clone();
            if map.insert(id.clone(), vehicle).is_some() {
                return Err(InvalidInput::DuplicateVehicle(id));
            }
        }
        let mut ids_sorted: Vec<VehicleId> = map.keys().cloned().collect();
        ids_sorted.sort();
        Ok(Vehicles {
            vehicles: map,
            ids_sorted,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &VehicleId> + '_ {
        self.ids_sorted.iter()
    }

    pub fn get(&self, id: &VehicleId) -> &Vehicle {
        self.vehicles.get(id).unwrap()
    }

    pub fn contains(&self, id: &VehicleId) -> bool {
        self.vehicles.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }
}
