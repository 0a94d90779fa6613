//! Photon Map

use super::collector::*;
use super::photon::*;
use order_stat::kth_by;
use ordered_float::OrderedFloat;
use photon_core::geometry::*;
use photon_core::pbrt::*;

/// A node of the balanced kd-tree. Nodes are stored in depth-first order so
/// the child below the split always follows its parent.
#[derive(Copy, Clone, Debug)]
enum KdNode {
    Interior {
        /// Position of the split plane.
        split_pos: Float,

        /// Split axis.
        split_axis: usize,

        /// Whether the node has a child below the split plane.
        has_left_child: bool,

        /// Index of the child above the split plane, if any.
        right_child: Option<usize>,
    },

    Leaf,
}

/// An immutable kd-tree over a set of points. The map owns the points it was
/// built from and is never modified after construction.
pub struct PhotonMap<T: MapPoint> {
    /// The tree nodes.
    nodes: Vec<KdNode>,

    /// The point stored at each node.
    data: Vec<T>,
}

impl<T: MapPoint> PhotonMap<T> {
    /// Build a balanced kd-tree from the points.
    ///
    /// * `points` - The points. The map takes ownership of them.
    pub fn new(points: Vec<T>) -> Self {
        let n = points.len();
        let mut nodes = Vec::with_capacity(n);
        let mut order = Vec::with_capacity(n);
        let mut build_indices: Vec<usize> = (0..n).collect();
        if n > 0 {
            build(&points, &mut build_indices, &mut nodes, &mut order);
        }

        // Move the points into node order.
        let mut slots: Vec<Option<T>> = points.into_iter().map(Some).collect();
        let data = order.into_iter().filter_map(|i| slots[i].take()).collect();
        Self { nodes, data }
    }

    /// Returns the number of stored points.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the map holds no points.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns an iterator over the stored points.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Visits every point closer than `max_distance_squared` to `p`. The
    /// visitor may shrink the radius as the search proceeds.
    ///
    /// * `p`                    - Lookup position.
    /// * `visitor`              - Receives candidates.
    /// * `max_distance_squared` - Squared search radius.
    pub fn lookup<'a, V>(&'a self, p: &Point3f, visitor: &mut V, max_distance_squared: &mut Float)
    where
        V: LookupVisitor<'a, T>,
    {
        if !self.nodes.is_empty() {
            self.lookup_node(0, p, visitor, max_distance_squared);
        }
    }

    /// Collects up to `k` nearest points within the radius. Returns the
    /// neighbors and the final squared radius. The radius only shrinks when
    /// `k` points were found.
    ///
    /// * `p`                    - Lookup position.
    /// * `k`                    - Maximum number of neighbors.
    /// * `max_distance_squared` - Squared search radius.
    pub fn nearest(&self, p: &Point3f, k: usize, max_distance_squared: Float) -> (Vec<ClosePoint<'_, T>>, Float) {
        let mut collector = BoundedNeighborCollector::new(k);
        let mut md2 = max_distance_squared;
        self.lookup(p, &mut collector, &mut md2);
        (collector.into_sorted_vec(), md2)
    }

    fn lookup_node<'a, V>(&'a self, node_num: usize, p: &Point3f, visitor: &mut V, max_distance_squared: &mut Float)
    where
        V: LookupVisitor<'a, T>,
    {
        if let KdNode::Interior {
            split_pos,
            split_axis,
            has_left_child,
            right_child,
        } = self.nodes[node_num]
        {
            let delta = p[split_axis] - split_pos;
            let dist2 = delta * delta;
            let (near, far) = if delta <= 0.0 {
                (has_left_child.then_some(node_num + 1), right_child)
            } else {
                (right_child, has_left_child.then_some(node_num + 1))
            };
            if let Some(child) = near {
                self.lookup_node(child, p, visitor, max_distance_squared);
            }
            if let Some(child) = far {
                if dist2 < *max_distance_squared {
                    self.lookup_node(child, p, visitor, max_distance_squared);
                }
            }
        }

        // Hand the point at this node to the visitor.
        let item = &self.data[node_num];
        let dist2 = item.position().distance_squared(p);
        if dist2 < *max_distance_squared {
            visitor.visit(item, node_num, dist2, max_distance_squared);
        }
    }
}

/// Recursively build the subtree for `indices`, appending nodes in depth
/// first order and recording which point each node stores.
///
/// * `points`  - All points.
/// * `indices` - Indices of the points in this subtree.
/// * `nodes`   - The nodes built so far.
/// * `order`   - Point index stored at each node.
fn build<T: MapPoint>(points: &[T], indices: &mut [usize], nodes: &mut Vec<KdNode>, order: &mut Vec<usize>) {
    let node_num = nodes.len();

    if indices.len() == 1 {
        nodes.push(KdNode::Leaf);
        order.push(indices[0]);
        return;
    }

    // Choose split direction and partition the points around the median.
    let bound = indices
        .iter()
        .fold(Bounds3f::empty(), |b, &i| b.union_point(points[i].position()));
    let split_axis = bound.maximum_extent();
    let split = indices.len() / 2;
    let median = *kth_by(indices, split, |&a, &b| {
        OrderedFloat(points[a].position()[split_axis]).cmp(&OrderedFloat(points[b].position()[split_axis]))
    });
    let split_pos = points[median].position()[split_axis];

    nodes.push(KdNode::Leaf);
    order.push(median);

    let (below, rest) = indices.split_at_mut(split);
    let above = &mut rest[1..];

    let has_left_child = !below.is_empty();
    if has_left_child {
        build(points, below, nodes, order);
    }
    let right_child = if above.is_empty() {
        None
    } else {
        let child = nodes.len();
        build(points, above, nodes, order);
        Some(child)
    };

    nodes[node_num] = KdNode::Interior {
        split_pos,
        split_axis,
        has_left_child,
        right_child,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use photon_core::spectrum::*;

    fn photon_at(x: Float, y: Float, z: Float) -> Photon {
        Photon::new(Point3f::new(x, y, z), Spectrum::one(), Vector3f::new(0.0, 0.0, 1.0))
    }

    #[test]
    fn empty_map_finds_nothing() {
        let map: PhotonMap<Photon> = PhotonMap::new(vec![]);
        let (found, md2) = map.nearest(&Point3f::zero(), 5, 1.0);
        assert!(found.is_empty());
        assert_eq!(md2, 1.0);
        assert!(map.is_empty());
    }

    #[test]
    fn map_owns_every_point() {
        let photons: Vec<Photon> = (0..37).map(|i| photon_at(i as Float, 0.0, 0.0)).collect();
        let map = PhotonMap::new(photons);
        assert_eq!(map.len(), 37);
        let mut xs: Vec<Float> = map.iter().map(|p| p.p.x).collect();
        xs.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(xs, (0..37).map(|i| i as Float).collect::<Vec<_>>());
    }

    #[test]
    fn finds_points_within_radius() {
        let photons: Vec<Photon> = (0..10).map(|i| photon_at(i as Float, 0.0, 0.0)).collect();
        let map = PhotonMap::new(photons);
        let (found, md2) = map.nearest(&Point3f::new(4.2, 0.0, 0.0), 100, 2.0);
        let mut xs: Vec<Float> = found.iter().map(|c| c.item.p.x).collect();
        xs.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(xs, vec![3.0, 4.0, 5.0]);
        assert_eq!(md2, 2.0);
    }

    #[test]
    fn nearest_shrinks_radius_to_kth_neighbor() {
        let photons: Vec<Photon> = (0..10).map(|i| photon_at(0.0, i as Float, 0.0)).collect();
        let map = PhotonMap::new(photons);
        let (found, md2) = map.nearest(&Point3f::zero(), 3, 100.0);
        assert_eq!(found.len(), 3);
        assert_eq!(found[2].item.p.y, 2.0);
        assert_eq!(md2, 4.0);
    }
}
