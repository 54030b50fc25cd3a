
use model::base_types::{Cost, NodeId, Seconds, COST_ZERO};
use model::requests::Request;
use model::road_network::RoadNetwork;
use model::vehicles::Vehicle;
use solution::{Stop, StopSequence};

/// Decides whether `vehicle` can serve all of `new_requests` on top of its
/// committed passengers, and if so returns the cheapest stop ordering
/// together with its cost (total travel time from the vehicle's current
/// position along the sequence).
///
/// The stop multiset is one drop-off per committed passenger plus a pickup
/// and a drop-off per new request. A sequence is valid when every pickup
/// precedes its drop-off, the instantaneous load never exceeds capacity,
/// enough committed drop-offs happen before the first pickup whenever the
/// incoming load would overflow, every arrival meets the stop's deadline and
/// every leg is reachable. Infeasibility is `None`, never an error.
///
/// With no new requests the committed drop-off plan is returned as-is at
/// cost 0; replanning committed passengers is not this function's job.
pub fn travel(
    vehicle: &Vehicle,
    new_requests: &[&Request],
    network: &dyn RoadNetwork,
    max_delay: Seconds,
) -> Option<(StopSequence, Cost)> {
    if new_requests.is_empty() {
        if vehicle.onboard().is_empty() {
            return None;
        }
        let stops = vehicle
            .onboard()
            .iter()
            .map(|r| Stop::dropoff(r.id().clone(), r.destination()))
            .collect();
        return Some((StopSequence::new(stops), COST_ZERO));
    }

    let mut onboard: Vec<&Request> = vehicle.onboard().iter().collect();
    onboard.sort_by(|a, b| a.id().cmp(b.id()));
    let mut new: Vec<&Request> = new_requests.to_vec();
    new.sort_by(|a, b| a.id().cmp(b.id()));

    let capacity = vehicle.capacity() as usize;
    // committed drop-offs required before any pickup; only binds when the
    // vehicle starts with passengers
    let min_drops_first = if onboard.is_empty() {
        0
    } else {
        (onboard.len() + new.len()).saturating_sub(capacity)
    };

    let initial_load = onboard.len();
    let total_stops = onboard.len() + 2 * new.len();
    let mut search = Search {
        network,
        max_delay,
        capacity,
        min_drops_first,
        onboard_dropped: vec![false; onboard.len()],
        new_state: vec![NewState::Waiting; new.len()],
        onboard,
        new,
        sequence: Vec::with_capacity(total_stops),
        total_stops,
        best: None,
    };
    search.extend(
        vehicle.position(),
        vehicle.t_vehicle(),
        COST_ZERO,
        initial_load,
        0,
    );
    search.best
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum NewState {
    Waiting,
    Onboard,
    Done,
}

struct Search<'a> {
    network: &'a dyn RoadNetwork,
    max_delay: Seconds,
    capacity: usize,
    min_drops_first: usize,
    onboard: Vec<&'a Request>,
    new: Vec<&'a Request>,
    onboard_dropped: Vec<bool>,
    new_state: Vec<NewState>,
    sequence: Vec<Stop>,
    total_stops: usize,
    best: Option<(StopSequence, Cost)>,
}

impl<'a> Search<'a> {
    /// Depth-first over the remaining stops. Candidates are expanded in a
    /// fixed order (committed drop-offs, new pickups, new drop-offs, each by
    /// request id) and only strict cost improvements replace the incumbent,
    /// so cost ties resolve the same way on every run.
    fn extend(
        &mut self,
        position: NodeId,
        time: Seconds,
        cost: Cost,
        load: usize,
        dropoffs_made: usize,
    ) {
        if self.sequence.len() == self.total_stops {
            let improves = match &self.best {
                None => true,
                Some((_, best_cost)) => cost < *best_cost,
            };
            if improves {
                self.best = Some((StopSequence::new(self.sequence.clone()), cost));
            }
            return;
        }

        for choice in 0..self.onboard.len() {
            if self.onboard_dropped[choice] {
                continue;
            }
            let request = self.onboard[choice];
            let deadline = request.t_dropoff_earliest() + self.max_delay;
            if let Some((arrival, next_cost)) =
                self.leg_to(position, request.destination(), time, cost, deadline)
            {
                self.onboard_dropped[choice] = true;
                self.sequence
                    .push(Stop::dropoff(request.id().clone(), request.destination()));
                self.extend(
                    request.destination(),
                    arrival,
                    next_cost,
                    load - 1,
                    dropoffs_made + 1,
                );
                self.sequence.pop();
                self.onboard_dropped[choice] = false;
            }
        }

        if load < self.capacity && dropoffs_made >= self.min_drops_first {
            for choice in 0..self.new.len() {
                if self.new_state[choice] != NewState::Waiting {
                    continue;
                }
                let request = self.new[choice];
                if let Some((arrival, next_cost)) = self.leg_to(
                    position,
                    request.origin(),
                    time,
                    cost,
                    request.t_pickup_latest(),
                ) {
                    self.new_state[choice] = NewState::Onboard;
                    self.sequence
                        .push(Stop::pickup(request.id().clone(), request.origin()));
                    self.extend(request.origin(), arrival, next_cost, load + 1, dropoffs_made);
                    self.sequence.pop();
                    self.new_state[choice] = NewState::Waiting;
                }
            }
        }

        for choice in 0..self.new.len() {
            if self.new_state[choice] != NewState::Onboard {
                continue;
            }
            let request = self.new[choice];
            let deadline = request.t_dropoff_earliest() + self.max_delay;
            if let Some((arrival, next_cost)) =
                self.leg_to(position, request.destination(), time, cost, deadline)
            {
                self.new_state[choice] = NewState::Done;
                self.sequence
                    .push(Stop::dropoff(request.id().clone(), request.destination()));
                self.extend(
                    request.destination(),
                    arrival,
                    next_cost,
                    load - 1,
                    dropoffs_made + 1,
                );
                self.sequence.pop();
                self.new_state[choice] = NewState::Onboard;
            }
        }
    }

    /// Simulates one leg: `None` if the stop is unreachable, past its
    /// deadline, or already at least as expensive as the incumbent.
    fn leg_to(
        &self,
        from: NodeId,
        to: NodeId,
        time: Seconds,
        cost: Cost,
        deadline: Seconds,
    ) -> Option<(Seconds, Cost)> {
        let travel_time = self.network.shortest_travel_time(from, to)?;
        let arrival = time + travel_time;
        if arrival > deadline {
            return None;
        }
        let next_cost = cost + travel_time;
        if let Some((_, best_cost)) = &self.best {
            if next_cost >= *best_cost {
                return None;
            }
        }
        Some((arrival, next_cost))
    }
}
