use std::time as stdtime;

use log::{info, warn};

use model::json_serialisation::load_instance_from_json;
use solution::json_serialisation::assignment_to_json;
use solver::BatchSolver;

/// Loads a batch instance, solves it and returns the assignment as JSON.
///
/// Requests no vehicle can reach are split off before the solve and reported
/// as unserved; input defects come back as an `"error"` object instead of a
/// partial result.
pub fn run(input: serde_json::Value) -> serde_json::Value {
    let start_time = stdtime::Instant::now();

    let instance = match load_instance_from_json(input) {
        Ok(instance) => instance,
        Err(error) => {
            warn!("rejecting instance: {}", error);
            return serde_json::json!({ "error": error.to_string() });
        }
    };

    let (reachable, unreachable) = instance
        .requests
        .partition_reachable(&instance.vehicles, instance.network.as_ref());
    info!(
        "instance loaded: {} vehicles, {} requests ({} unreachable) ({:.2}s)",
        instance.vehicles.len(),
        instance.requests.len(),
        unreachable.len(),
        start_time.elapsed().as_secs_f32()
    );

    let solver = BatchSolver::initialize(
        instance.vehicles.clone(),
        std::sync::Arc::new(reachable),
        instance.network.clone(),
        instance.config.clone(),
    );
    let mut assignment = match solver.solve(instance.current_time) {
        Ok(assignment) => assignment,
        Err(error) => {
            warn!("solve failed: {}", error);
            return serde_json::json!({ "error": error.to_string() });
        }
    };
    for request in unreachable {
        assignment.mark_unserved(request);
    }

    info!(
        "solved: {} vehicles assigned, {} requests unserved ({:.2}s)",
        assignment.number_of_assigned_vehicles(),
        assignment.number_of_unserved(),
        start_time.elapsed().as_secs_f32()
    );
    assignment_to_json(&assignment)
}
