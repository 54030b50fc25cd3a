use std::collections::HashMap;
use std::sync::Mutex;

use crate::base_types::{NodeId, Seconds};

/// Shortest-travel-time oracle over the road network.
///
/// Times are seconds; `None` means the target cannot be reached at all.
/// A provider must answer `Some(0.0)` for a node paired with itself.
/// Providers are queried concurrently from solver workers and must stay
/// immutable for the whole batch.
pub trait RoadNetwork: Send + Sync {
    fn shortest_travel_time(&self, from: NodeId, to: NodeId) -> Option<Seconds>;

    fn has_path(&self, from: NodeId, to: NodeId) -> bool {
        self.shortest_travel_time(from, to).is_some()
    }
}

/// A type for storing the pair-wise shortest travel times between all nodes,
/// as nested maps keyed by node id.
///
/// Travel times should satisfy the triangle inequality. This is not asserted,
/// and the solver does not rely on it.
pub struct TravelTimeMatrix {
    travel_times: HashMap<NodeId, HashMap<NodeId, Seconds>>,
}

impl TravelTimeMatrix {
    pub fn new(travel_times: HashMap<NodeId, HashMap<NodeId, Seconds>>) -> TravelTimeMatrix {
        TravelTimeMatrix { travel_times }
    }

    /// Builds the matrix from an undirected edge list, closing it under
    /// shortest paths (Floyd-Warshall). Nodes are taken from the edges.
    pub fn from_undirected_edges(edges: &[(NodeId, NodeId, Seconds)]) -> TravelTimeMatrix {
        let mut nodes: Vec<NodeId> = edges.iter().flat_map(|&(u, v, _)| [u, v]).collect();
        nodes.sort_unstable();
        nodes.dedup();

        let mut travel_times: HashMap<NodeId, HashMap<NodeId, Seconds>> = HashMap::new();
        for &node in &nodes {
            travel_times.entry(node).or_default().insert(node, 0.0);
        }
        for &(u, v, time) in edges {
            let forward = travel_times.entry(u).or_default().entry(v).or_insert(time);
            *forward = forward.min(time);
            let backward = travel_times.entry(v).or_default().entry(u).or_insert(time);
            *backward = backward.min(time);
        }

        for &k in &nodes {
            for &i in &nodes {
                let via = match travel_times[&i].get(&k) {
                    Some(&t) => t,
                    None => continue,
                };
                for &j in &nodes {
                    let onward = match travel_times[&k].get(&j) {
                        Some(&t) => t,
                        None => continue,
                    };
                    let entry = travel_times
                        .get_mut(&i)
                        .unwrap()
                        .entry(j)
                        .or_insert(Seconds::INFINITY);
                    *entry = entry.min(via + onward);
                }
            }
        }

        TravelTimeMatrix { travel_times }
    }
}

impl RoadNetwork for TravelTimeMatrix {
    fn shortest_travel_time(&self, from: NodeId, to: NodeId) -> Option<Seconds> {
        self.travel_times
            .get(&from)?
            .get(&to)
            .copied()
            .filter(|t| t.is_finite())
    }
}

/// Memoizing wrapper for providers whose queries are expensive.
///
/// The feasibility oracle and the RR-edge builder re-query heavily
/// overlapping node pairs, so a cheap cache pays off for any provider that
/// actually searches the network.
pub struct CachedNetwork<N> {
    inner: N,
    cache: Mutex<HashMap<(NodeId, NodeId), Option<Seconds>>>,
}

impl<N: RoadNetwork> CachedNetwork<N> {
    pub fn new(inner: N) -> CachedNetwork<N> {
        CachedNetwork {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }
}

impl<N: RoadNetwork> RoadNetwork for CachedNetwork<N> {
    fn shortest_travel_time(&self, from: NodeId, to: NodeId) -> Option<Seconds> {
        if let Some(&cached) = self.cache.lock().unwrap().get(&(from, to)) {
            return cached;
        }
        let computed = self.inner.shortest_travel_time(from, to);
        self.cache.lock().unwrap().insert((from, to), computed);
        computed
    }
}
