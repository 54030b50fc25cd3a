use std::sync::Arc;

use model::base_types::Cost;
use model::config::Config;
use model::road_network::{RoadNetwork, TravelTimeMatrix};
use model::validation::InvalidInput;
use solution::Trip;

use crate::greedy::greedy_assignment;
use crate::rtv_graph::build_rtv_graph;
use crate::rv_graph::build_rv_graph;
use crate::test_utilities::{
    line, request, requests, rid, triangle, vehicle, vehicle_with_onboard, vehicles, vid, A, B, C,
    D,
};
use crate::{BatchSolver, SolveError};

fn solver(
    fleet: model::vehicles::Vehicles,
    batch: model::requests::Requests,
    network: TravelTimeMatrix,
    config: Config,
) -> BatchSolver {
    BatchSolver::initialize(
        Arc::new(fleet),
        Arc::new(batch),
        Arc::new(network) as Arc<dyn RoadNetwork>,
        Arc::new(config),
    )
}

#[test]
fn s1_single_vehicle_single_request() {
    let network = line();
    let fleet = vehicles(vec![vehicle("v1", A, 2)]);
    let batch = requests(vec![request("r1", A, B, 120.0, &network)]);

    let assignment = solver(fleet, batch, network, Config::default())
        .solve(0.0)
        .unwrap();

    let assigned = assignment.get(&vid("v1")).unwrap();
    assert_eq!(assigned.trip, Trip::single(rid("r1")));
    assert_eq!(assigned.cost, 60.0);
    assert_eq!(assigned.stops.len(), 2);
    assert_eq!(assignment.number_of_unserved(), 0);
}

#[test]
fn s2_pools_both_requests_onto_one_vehicle() {
    let network = triangle();
    let fleet = vehicles(vec![vehicle("v1", A, 2)]);
    let batch = requests(vec![
        request("r1", A, B, 300.0, &network),
        request("r2", A, C, 300.0, &network),
    ]);
    let config = Config {
        max_delay: 300.0,
        ..Config::default()
    };

    let assignment = solver(fleet, batch, network, config).solve(0.0).unwrap();

    let assigned = assignment.get(&vid("v1")).unwrap();
    assert_eq!(assigned.trip, Trip::new(vec![rid("r1"), rid("r2")]));
    assert_eq!(assigned.cost, 120.0);
    assert_eq!(assignment.number_of_unserved(), 0);
}

#[test]
fn s3_tight_deadline_leaves_one_request_unserved() {
    let network = triangle();
    let fleet = vehicles(vec![vehicle("v1", A, 2)]);
    let batch = requests(vec![
        request("r1", A, B, 300.0, &network),
        request("r2", A, C, 300.0, &network),
    ]);
    let config = Config {
        max_delay: 10.0,
        ..Config::default()
    };

    let assignment = solver(fleet, batch, network, config).solve(0.0).unwrap();

    // both singletons fit, but there is one vehicle; pooling is infeasible,
    // so the cheaper ride wins and the other pays the penalty
    let assigned = assignment.get(&vid("v1")).unwrap();
    assert_eq!(assigned.trip, Trip::single(rid("r1")));
    assert!(assignment.is_unserved(&rid("r2")));
}

#[test]
fn s5_cheaper_vehicle_wins_the_request() {
    // v1 reaches B in 60, v2 needs 120; both could serve B -> D
    let network = TravelTimeMatrix::from_undirected_edges(&[
        (A, B, 60.0),
        (C, B, 120.0),
        (B, D, 60.0),
    ]);
    let fleet = vehicles(vec![vehicle("v1", A, 2), vehicle("v2", C, 2)]);
    let batch = requests(vec![request("r1", B, D, 600.0, &network)]);

    let assignment = solver(fleet, batch, network, Config::default())
        .solve(0.0)
        .unwrap();

    assert_eq!(
        assignment.get(&vid("v1")).map(|a| a.cost),
        Some(120.0)
    );
    assert!(assignment.get(&vid("v2")).is_none());
    assert_eq!(assignment.number_of_unserved(), 0);
}

#[test]
fn s6_penalty_beats_an_overly_expensive_trip() {
    let network = TravelTimeMatrix::from_undirected_edges(&[(A, B, 1500.0)]);
    let fleet = vehicles(vec![vehicle("v1", A, 2)]);
    let batch = requests(vec![request("r1", A, B, 3000.0, &network)]);

    let assignment = solver(fleet, batch, network, Config::default())
        .solve(0.0)
        .unwrap();

    assert_eq!(assignment.number_of_assigned_vehicles(), 0);
    assert!(assignment.is_unserved(&rid("r1")));
    assert_eq!(assignment.objective_value(1000.0), 1000.0);
}

#[test]
fn empty_request_batch_is_not_an_error() {
    let network = triangle();
    let fleet = vehicles(vec![vehicle("v1", A, 2)]);
    let batch = requests(vec![]);

    let assignment = solver(fleet, batch, network, Config::default())
        .solve(0.0)
        .unwrap();
    assert_eq!(assignment.number_of_assigned_vehicles(), 0);
    assert_eq!(assignment.number_of_unserved(), 0);
}

#[test]
fn full_fleet_serves_nothing() {
    let network = triangle();
    let r0 = model::requests::Request::new(rid("r0"), A, B, 0.0, 0.0, 60.0);
    let fleet = vehicles(vec![vehicle_with_onboard("v1", A, 1, vec![r0])]);
    let batch = requests(vec![request("r1", A, B, 600.0, &network)]);

    let assignment = solver(fleet, batch, network, Config::default())
        .solve(0.0)
        .unwrap();
    assert_eq!(assignment.number_of_assigned_vehicles(), 0);
    assert!(assignment.is_unserved(&rid("r1")));
}

#[test]
fn pruning_everything_away_serves_nothing() {
    let network = triangle();
    let fleet = vehicles(vec![vehicle("v1", A, 2)]);
    let batch = requests(vec![request("r1", A, B, 600.0, &network)]);
    let config = Config {
        rv: model::config::RvConfig {
            prune_top_k: Some(0),
        },
        ..Config::default()
    };

    let assignment = solver(fleet, batch, network, config).solve(0.0).unwrap();
    assert_eq!(assignment.number_of_assigned_vehicles(), 0);
    assert!(assignment.is_unserved(&rid("r1")));
}

#[test]
fn invalid_input_aborts_the_solve() {
    let network = triangle();
    let fleet = vehicles(vec![vehicle("v1", A, 2)]);
    let batch = requests(vec![model::requests::Request::new(
        rid("r1"),
        A,
        A,
        0.0,
        600.0,
        0.0,
    )]);

    let result = solver(fleet, batch, network, Config::default()).solve(0.0);
    assert!(matches!(
        result,
        Err(SolveError::InvalidInput(InvalidInput::DegenerateRequest(_)))
    ));
}

#[test]
fn ilp_objective_never_exceeds_the_greedy_objective() {
    // greedy grabs the expensive feasible trip; the ILP prefers the penalty
    let network = TravelTimeMatrix::from_undirected_edges(&[(A, B, 1500.0)]);
    let fleet = vehicles(vec![vehicle("v1", A, 2)]);
    let batch = requests(vec![request("r1", A, B, 3000.0, &network)]);
    let config = Config::default();

    let rv = build_rv_graph(&fleet, &batch, &network, &config, 0.0);
    let rtv = build_rtv_graph(&fleet, &batch, &network, &rv, &config);
    let seed = greedy_assignment(&rtv);

    let greedy_objective: Cost = seed
        .iter()
        .map(|(vehicle, trip)| rtv.edge(vehicle, trip).unwrap().cost)
        .sum::<Cost>()
        + config.ilp.cost_penalty
            * batch
                .iter()
                .filter(|r| !seed.values().any(|t| t.contains(r)))
                .count() as Cost;
    assert_eq!(greedy_objective, 1500.0);

    let assignment = solver(fleet, batch, network, config).solve(0.0).unwrap();
    let ilp_objective = assignment.objective_value(1000.0);
    assert!(ilp_objective <= greedy_objective);
    assert_eq!(ilp_objective, 1000.0);
}

#[test]
fn ilp_is_stable_under_its_own_warm_start() {
    let network = triangle();
    let fleet = vehicles(vec![vehicle("v1", A, 2), vehicle("v2", B, 2)]);
    let batch = requests(vec![
        request("r1", A, B, 600.0, &network),
        request("r2", A, C, 600.0, &network),
    ]);
    let config = Config::default();

    let rv = build_rv_graph(&fleet, &batch, &network, &config, 0.0);
    let rtv = build_rtv_graph(&fleet, &batch, &network, &rv, &config);
    let seed = greedy_assignment(&rtv);

    let mut backend = crate::ilp::HighsBackend::default();
    let first = crate::ilp::assignment_ilp(&mut backend, &rtv, &batch, &seed, &config).unwrap();

    // feeding the optimum back as warm start must reproduce it
    let mut backend = crate::ilp::HighsBackend::default();
    let second = crate::ilp::assignment_ilp(&mut backend, &rtv, &batch, &first, &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn identical_runs_return_identical_assignments() {
    let network = triangle();
    let build = || {
        let fleet = vehicles(vec![vehicle("v1", A, 2), vehicle("v2", B, 2)]);
        let batch = requests(vec![
            request("r1", A, B, 600.0, &network),
            request("r2", A, C, 600.0, &network),
            request("r3", B, C, 600.0, &network),
        ]);
        solver(fleet, batch, triangle(), Config::default())
            .solve(0.0)
            .unwrap()
    };

    let first = build();
    let second = build();
    assert_eq!(first, second);
    assert!(first.trips_are_request_disjoint());
}

#[test]
fn assigned_sequences_respect_the_invariants() {
    let network = triangle();
    let fleet = vehicles(vec![vehicle("v1", A, 2), vehicle("v2", C, 2)]);
    let batch = requests(vec![
        request("r1", A, B, 600.0, &network),
        request("r2", A, C, 600.0, &network),
        request("r3", C, B, 600.0, &network),
    ]);

    let assignment = solver(fleet, batch, network, Config::default())
        .solve(0.0)
        .unwrap();

    assert!(assignment.trips_are_request_disjoint());
    for (_, assigned) in assignment.assigned_iter() {
        assert!(assigned.stops.pickup_precedes_dropoff());
        assert!(assigned.stops.max_load(0) <= 2);
        assert!(assigned.cost >= 0.0);
    }
    // every request is either in a trip or unserved, never both
    for id in ["r1", "r2", "r3"] {
        let in_trip = assignment
            .assigned_iter()
            .any(|(_, a)| a.trip.contains(&rid(id)));
        assert_ne!(in_trip, assignment.is_unserved(&rid(id)));
    }
}
