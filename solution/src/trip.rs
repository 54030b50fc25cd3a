use std::fmt;

use model::base_types::RequestId;

/// A set of requests proposed to be served together by one vehicle.
///
/// Ids are kept sorted and unique, so equal sets compare equal, the order
/// over trips is total, and the display form doubles as a stable trip id.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Trip {
    requests: Vec<RequestId>,
}

impl Trip {
    /// Creates a trip from the given ids. Must not be empty.
    pub fn new(mut requests: Vec<RequestId>) -> Trip {
        assert!(!requests.is_empty(), "a trip serves at least one request");
        requests.sort();
        requests.dedup();
        Trip { requests }
    }

    pub fn single(request: RequestId) -> Trip {
        Trip {
            requests: vec![request],
        }
    }

    pub fn requests(&self) -> impl Iterator<Item = &RequestId> + '_ {
        self.requests.iter()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn contains(&self, request: &RequestId) -> bool {
        self.requests.binary_search(request).is_ok()
    }

    pub fn union(&self, other: &Trip) -> Trip {
        let mut requests = self.requests.clone();
        requests.extend(other.requests.iter().cloned());
        Trip::new(requests)
    }

    /// The sub-trips obtained by dropping exactly one request; for a trip of
    /// size k these are its k subsets of size k-1.
    pub fn subsets_dropping_one(&self) -> impl Iterator<Item = Trip> + '_ {
        (0..self.requests.len()).filter_map(move |skip| {
            let rest: Vec<RequestId> = self
                .requests
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != skip)
                .map(|(_, id)| id.clone())
                .collect();
            if rest.is_empty() {
                None
            } else {
                Some(Trip { requests: rest })
            }
        })
    }
}

impl fmt::Display for Trip {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut ids = self.requests.iter();
        write!(f, "{}", ids.next().unwrap())?;
        for id in ids {
            write!(f, "+{}", id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> RequestId {
        RequestId::from(s)
    }

    #[test]
    fn ids_are_sorted_and_deduplicated() {
        let trip = Trip::new(vec![id("r3"), id("r1"), id("r3")]);
        assert_eq!(trip.len(), 2);
        assert_eq!(trip, Trip::new(vec![id("r1"), id("r3")]));
        assert_eq!(trip.to_string(), "r1+r3");
    }

    #[test]
    fn union_merges_sets() {
        let left = Trip::new(vec![id("r1"), id("r2")]);
        let right = Trip::new(vec![id("r2"), id("r3")]);
        assert_eq!(
            left.union(&right),
            Trip::new(vec![id("r1"), id("r2"), id("r3")])
        );
    }

    #[test]
    fn subsets_drop_exactly_one_request() {
        let trip = Trip::new(vec![id("r1"), id("r2"), id("r3")]);
        let subsets: Vec<Trip> = trip.subsets_dropping_one().collect();
        assert_eq!(
            subsets,
            vec![
                Trip::new(vec![id("r2"), id("r3")]),
                Trip::new(vec![id("r1"), id("r3")]),
                Trip::new(vec![id("r1"), id("r2")]),
            ]
        );
    }

    #[test]
    fn singleton_has_no_proper_subsets() {
        assert_eq!(Trip::single(id("r1")).subsets_dropping_one().count(), 0);
    }

    #[test]
    fn contains_uses_the_sorted_order() {
        let trip = Trip::new(vec![id("r2"), id("r1")]);
        assert!(trip.contains(&id("r1")));
        assert!(!trip.contains(&id("r9")));
    }
}
