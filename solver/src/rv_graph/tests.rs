use model::config::Config;

use crate::rv_graph::build_rv_graph;
use crate::test_utilities::{
    config_with_max_delay, request, requests, rid, triangle, vehicle, vehicle_with_onboard,
    vehicles, vid, A, B, C,
};

#[test]
fn vr_edges_carry_the_oracle_cost() {
    let network = triangle();
    let fleet = vehicles(vec![vehicle("v1", A, 2), vehicle("v2", C, 2)]);
    let batch = requests(vec![request("r1", A, B, 600.0, &network)]);

    let rv = build_rv_graph(&fleet, &batch, &network, &Config::default(), 0.0);

    let v1_edges = rv.vr_edges(&vid("v1"));
    assert_eq!(v1_edges.len(), 1);
    assert_eq!(v1_edges[0].request, rid("r1"));
    assert_eq!(v1_edges[0].cost, 60.0); // pickup on the spot, drop at B

    let v2_edges = rv.vr_edges(&vid("v2"));
    assert_eq!(v2_edges.len(), 1);
    assert_eq!(v2_edges[0].cost, 150.0); // C -> A, then A -> B
}

#[test]
fn full_vehicles_get_no_vr_edges() {
    let network = triangle();
    let r0 = model::requests::Request::new(rid("r0"), A, B, 0.0, 0.0, 60.0);
    let fleet = vehicles(vec![vehicle_with_onboard("v1", A, 1, vec![r0])]);
    let batch = requests(vec![request("r1", A, B, 600.0, &network)]);

    let rv = build_rv_graph(&fleet, &batch, &network, &Config::default(), 0.0);
    assert!(rv.vr_edges(&vid("v1")).is_empty());
    assert_eq!(rv.vr_edge_count(), 0);
}

#[test]
fn poolable_requests_are_rr_connected() {
    let network = triangle();
    let fleet = vehicles(vec![vehicle("v1", A, 2)]);
    let batch = requests(vec![
        request("r1", A, B, 300.0, &network),
        request("r2", A, C, 300.0, &network),
    ]);

    let rv = build_rv_graph(&fleet, &batch, &network, &Config::default(), 0.0);
    assert!(rv.rr_connected(&rid("r1"), &rid("r2")));
    assert!(rv.rr_connected(&rid("r2"), &rid("r1")));
    assert_eq!(rv.rr_edge_count(), 1);
}

#[test]
fn tight_deadlines_remove_the_rr_edge() {
    // with no detour slack neither request can wait for the other
    let network = triangle();
    let fleet = vehicles(vec![vehicle("v1", A, 2)]);
    let batch = requests(vec![
        request("r1", B, A, 10.0, &network),
        request("r2", C, B, 10.0, &network),
    ]);

    let rv = build_rv_graph(&fleet, &batch, &network, &config_with_max_delay(0.0), 0.0);
    assert!(!rv.rr_connected(&rid("r1"), &rid("r2")));
    assert_eq!(rv.rr_edge_count(), 0);
}

#[test]
fn top_k_keeps_only_the_cheapest_vr_edges() {
    let network = triangle();
    let fleet = vehicles(vec![vehicle("v1", A, 2)]);
    let batch = requests(vec![
        request("r1", A, B, 600.0, &network), // cost 60
        request("r2", A, C, 600.0, &network), // cost 90
        request("r3", B, C, 600.0, &network), // cost 120
    ]);
    let config = Config {
        rv: model::config::RvConfig {
            prune_top_k: Some(2),
        },
        ..Config::default()
    };

    let rv = build_rv_graph(&fleet, &batch, &network, &config, 0.0);
    let edges = rv.vr_edges(&vid("v1"));
    assert_eq!(edges.len(), 2);
    assert_eq!(edges[0].request, rid("r1"));
    assert_eq!(edges[1].request, rid("r2"));
}

#[test]
fn top_k_zero_empties_the_graph() {
    let network = triangle();
    let fleet = vehicles(vec![vehicle("v1", A, 2)]);
    let batch = requests(vec![
        request("r1", A, B, 600.0, &network),
        request("r2", A, C, 600.0, &network),
    ]);
    let config = Config {
        rv: model::config::RvConfig {
            prune_top_k: Some(0),
        },
        ..Config::default()
    };

    let rv = build_rv_graph(&fleet, &batch, &network, &config, 0.0);
    assert_eq!(rv.vr_edge_count(), 0);
    assert_eq!(rv.rr_edge_count(), 0);
}

#[test]
fn rebuilding_yields_the_same_graph() {
    let network = triangle();
    let fleet = vehicles(vec![vehicle("v1", A, 2), vehicle("v2", C, 2)]);
    let batch = requests(vec![
        request("r1", A, B, 600.0, &network),
        request("r2", A, C, 600.0, &network),
        request("r3", B, C, 600.0, &network),
    ]);
    let config = Config::default();

    let first = build_rv_graph(&fleet, &batch, &network, &config, 0.0);
    let second = build_rv_graph(&fleet, &batch, &network, &config, 0.0);

    for vehicle_id in fleet.iter() {
        assert_eq!(first.vr_edges(vehicle_id), second.vr_edges(vehicle_id));
    }
    assert_eq!(first.rr_edge_count(), second.rr_edge_count());
    for a in batch.iter() {
        for b in batch.iter() {
            assert_eq!(first.rr_connected(a, b), second.rr_connected(a, b));
        }
    }
}
