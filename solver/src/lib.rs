pub mod greedy;
pub mod ilp;
pub mod rtv_graph;
pub mod rv_graph;
pub mod travel;

#[cfg(test)]
mod test_utilities;
#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::time::Instant;

use log::{info, warn};
use thiserror::Error;

use model::base_types::Seconds;
use model::config::Config;
use model::requests::Requests;
use model::road_network::RoadNetwork;
use model::validation::{validate_instance, InvalidInput};
use model::vehicles::Vehicles;
use solution::{AssignedTrip, Assignment};

use crate::greedy::greedy_assignment;
use crate::ilp::{assignment_ilp, HighsBackend};
use crate::rtv_graph::build_rtv_graph;
use crate::rv_graph::build_rv_graph;

#[derive(Debug, Error)]
pub enum SolveError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
    #[error("solver resolution failed: {0}")]
    Resolution(String),
}

/// One batch solve over frozen inputs: compatibility graph, feasible-trip
/// enumeration, greedy seed, exact matching.
///
/// The intermediate graphs live only inside `solve`; the returned
/// [`Assignment`] is self-contained.
pub struct BatchSolver {
    vehicles: Arc<Vehicles>,
    requests: Arc<Requests>,
    network: Arc<dyn RoadNetwork>,
    config: Arc<Config>,
}

impl BatchSolver {
    pub fn initialize(
        vehicles: Arc<Vehicles>,
        requests: Arc<Requests>,
        network: Arc<dyn RoadNetwork>,
        config: Arc<Config>,
    ) -> BatchSolver {
        BatchSolver {
            vehicles,
            requests,
            network,
            config,
        }
    }

    pub fn solve(&self, current_time: Seconds) -> Result<Assignment, SolveError> {
        validate_instance(&self.requests, &self.vehicles)?;

        let mut assignment = Assignment::empty();
        if self.requests.is_empty() {
            return Ok(assignment);
        }

        let start = Instant::now();
        let rv = build_rv_graph(
            &self.vehicles,
            &self.requests,
            self.network.as_ref(),
            &self.config,
            current_time,
        );
        info!(
            "RV graph: {} vehicle-request edges, {} request pairs ({:.2}s)",
            rv.vr_edge_count(),
            rv.rr_edge_count(),
            start.elapsed().as_secs_f32()
        );

        let rtv = build_rtv_graph(
            &self.vehicles,
            &self.requests,
            self.network.as_ref(),
            &rv,
            &self.config,
        );
        info!(
            "RTV graph: {} trips, {} trip-vehicle edges ({:.2}s)",
            rtv.trip_count(),
            rtv.edge_count(),
            start.elapsed().as_secs_f32()
        );

        let seed = greedy_assignment(&rtv);
        info!("greedy seed assigns {} vehicles", seed.len());

        let mut backend = HighsBackend::default();
        let chosen = match assignment_ilp(&mut backend, &rtv, &self.requests, &seed, &self.config) {
            Ok(chosen) => chosen,
            Err(error) => {
                warn!("ILP failed ({}); falling back to the greedy seed", error);
                seed
            }
        };

        for (vehicle, trip) in &chosen {
            let edge = rtv
                .edge(vehicle, trip)
                .expect("chosen trips come from the RTV graph");
            assignment.assign(
                vehicle.clone(),
                AssignedTrip {
                    trip: trip.clone(),
                    stops: edge.stops.clone(),
                    cost: edge.cost,
                },
            );
        }
        for request in self.requests.iter() {
            if !chosen.values().any(|trip| trip.contains(request)) {
                assignment.mark_unserved(request.clone());
            }
        }

        info!(
            "assignment: {} vehicles used, {}/{} requests unserved, objective {:.1} ({:.2}s)",
            assignment.number_of_assigned_vehicles(),
            assignment.number_of_unserved(),
            self.requests.len(),
            assignment.objective_value(self.config.ilp.cost_penalty),
            start.elapsed().as_secs_f32()
        );
        Ok(assignment)
    }
}
