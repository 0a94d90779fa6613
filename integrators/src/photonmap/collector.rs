//! Bounded Neighbor Collector

use ordered_float::OrderedFloat;
use photon_core::pbrt::*;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A point found by a map lookup along with its squared distance to the
/// lookup position.
#[derive(Debug)]
pub struct ClosePoint<'a, T> {
    /// The point.
    pub item: &'a T,

    /// Position of the point in the map's storage. Breaks distance ties.
    pub index: usize,

    /// Squared distance to the lookup position.
    pub distance_squared: Float,
}

impl<'a, T> Clone for ClosePoint<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for ClosePoint<'a, T> {}

impl<'a, T> ClosePoint<'a, T> {
    fn key(&self) -> (OrderedFloat<Float>, usize) {
        (OrderedFloat(self.distance_squared), self.index)
    }
}

impl<'a, T> PartialEq for ClosePoint<'a, T> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<'a, T> Eq for ClosePoint<'a, T> {}

impl<'a, T> PartialOrd for ClosePoint<'a, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<'a, T> Ord for ClosePoint<'a, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Receives the candidates visited by a `PhotonMap` lookup. A candidate is
/// only offered when its squared distance is below `max_distance_squared`,
/// which the visitor may shrink to narrow the rest of the search.
pub trait LookupVisitor<'a, T> {
    /// Process one candidate.
    ///
    /// * `item`                 - The candidate.
    /// * `index`                - Position of the candidate in map storage.
    /// * `distance_squared`     - Squared distance to the lookup position.
    /// * `max_distance_squared` - Current squared search radius.
    fn visit(&mut self, item: &'a T, index: usize, distance_squared: Float, max_distance_squared: &mut Float);
}

/// Keeps the `k` closest accepted candidates of a lookup in a bounded
/// max-heap. Candidates are appended until `k` have been found; from then
/// on the farthest one is evicted for every closer candidate and the search
/// radius shrinks to the new farthest distance.
pub struct BoundedNeighborCollector<'a, T, F>
where
    F: Fn(&T) -> bool,
{
    /// Maximum number of neighbors kept.
    k: usize,

    /// Candidates for which this returns `false` are ignored.
    accept: F,

    /// The neighbors with the farthest at the top.
    heap: BinaryHeap<ClosePoint<'a, T>>,
}

impl<'a, T> BoundedNeighborCollector<'a, T, fn(&T) -> bool> {
    /// Create a collector that accepts every candidate.
    ///
    /// * `k` - Maximum number of neighbors kept.
    pub fn new(k: usize) -> Self {
        Self::with_predicate(k, |_| true)
    }
}

impl<'a, T, F> BoundedNeighborCollector<'a, T, F>
where
    F: Fn(&T) -> bool,
{
    /// Create a collector that only keeps candidates satisfying `accept`.
    ///
    /// * `k`      - Maximum number of neighbors kept.
    /// * `accept` - The acceptance predicate.
    pub fn with_predicate(k: usize, accept: F) -> Self {
        Self {
            k,
            accept,
            heap: BinaryHeap::with_capacity(k),
        }
    }

    /// Returns the number of neighbors found so far.
    pub fn found(&self) -> usize {
        self.heap.len()
    }

    /// Returns true if nothing was found.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Forget all neighbors so the collector can be reused for another
    /// lookup.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// Returns the neighbors in no particular order.
    pub fn neighbors(&self) -> impl Iterator<Item = &ClosePoint<'a, T>> {
        self.heap.iter()
    }

    /// Returns the closest neighbor.
    pub fn nearest(&self) -> Option<&'a T> {
        self.heap.iter().min().map(|c| c.item)
    }

    /// Consumes the collector and returns the neighbors sorted by increasing
    /// distance.
    pub fn into_sorted_vec(self) -> Vec<ClosePoint<'a, T>> {
        self.heap.into_sorted_vec()
    }
}

impl<'a, T, F> LookupVisitor<'a, T> for BoundedNeighborCollector<'a, T, F>
where
    F: Fn(&T) -> bool,
{
    fn visit(&mut self, item: &'a T, index: usize, distance_squared: Float, max_distance_squared: &mut Float) {
        if self.k == 0 || !(self.accept)(item) {
            return;
        }

        let candidate = ClosePoint {
            item,
            index,
            distance_squared,
        };

        if self.heap.len() < self.k {
            self.heap.push(candidate);
            if self.heap.len() < self.k {
                return;
            }
        } else if let Some(mut farthest) = self.heap.peek_mut() {
            if candidate >= *farthest {
                return;
            }
            *farthest = candidate;
        }

        if let Some(farthest) = self.heap.peek() {
            *max_distance_squared = farthest.distance_squared;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_closest_and_shrinks_radius() {
        let values = [5.0, 1.0, 4.0, 2.0, 3.0];
        let mut collector = BoundedNeighborCollector::new(2);
        let mut md2 = Float::INFINITY;
        for (i, v) in values.iter().enumerate() {
            if *v < md2 {
                collector.visit(v, i, *v, &mut md2);
            }
        }
        assert_eq!(md2, 2.0);
        let found: Vec<Float> = collector.into_sorted_vec().iter().map(|c| *c.item).collect();
        assert_eq!(found, vec![1.0, 2.0]);
    }

    #[test]
    fn radius_is_unchanged_until_full() {
        let mut collector = BoundedNeighborCollector::new(3);
        let mut md2 = 10.0;
        collector.visit(&1.0, 0, 1.0, &mut md2);
        collector.visit(&2.0, 1, 2.0, &mut md2);
        assert_eq!(md2, 10.0);
        assert_eq!(collector.found(), 2);
    }

    #[test]
    fn predicate_filters_candidates() {
        let values: [Float; 4] = [1.0, -2.0, 3.0, -4.0];
        let mut collector = BoundedNeighborCollector::with_predicate(1, |v: &Float| *v > 0.0);
        let mut md2 = Float::INFINITY;
        for (i, v) in values.iter().enumerate() {
            let d2 = v.abs();
            if d2 < md2 {
                collector.visit(v, i, d2, &mut md2);
            }
        }
        assert_eq!(collector.nearest(), Some(&1.0));
        assert_eq!(md2, 1.0);
    }

    #[test]
    fn ties_break_on_index() {
        let mut collector = BoundedNeighborCollector::new(1);
        let mut md2 = Float::INFINITY;
        collector.visit(&'b', 1, 1.0, &mut md2);
        collector.visit(&'a', 0, 1.0, &mut md2);
        assert_eq!(collector.nearest(), Some(&'a'));
    }
}
