use serde_json::json;

use crate::assignment::Assignment;

/// Serializes an assignment for the caller: one entry per assigned vehicle
/// with its trip, cost and stop sequence, plus the unserved request ids.
pub fn assignment_to_json(assignment: &Assignment) -> serde_json::Value {
    let assignments: Vec<serde_json::Value> = assignment
        .assigned_iter()
        .map(|(vehicle, assigned)| {
            json!({
                "vehicle": vehicle,
                "trip": assigned.trip.to_string(),
                "requests": assigned.trip.requests().collect::<Vec<_>>(),
                "cost": assigned.cost,
                "stops": assigned.stops.stops(),
            })
        })
        .collect();
    let unserved: Vec<_> = assignment.unserved_iter().collect();
    json!({
        "assignments": assignments,
        "unserved": unserved,
    })
}
