//! Parallel edge bookkeeping.
//!
//! Edges sharing an unordered endpoint pair form a group; each gets a slot
//! so the curved program can fan them out. Heights are laid out in the frame
//! of the first edge seen for the pair, so an edge running the other way is
//! marked `Backwards` to land on the intended side.

use std::collections::HashMap;
use std::hash::Hash;

use crate::display::{Direction, EdgeDisplayData, EdgeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeGroup {
    pub group_size: usize,
    pub group_position: usize,
    pub direction: Direction,
    pub self_loop: bool,
}

impl EdgeGroup {
    /// Copies the group fields onto a display record and picks the edge kind.
    pub fn apply(&self, edge: &mut EdgeDisplayData) {
        edge.group_size = self.group_size;
        edge.group_position = self.group_position;
        edge.direction = self.direction;
        if self.self_loop {
            edge.kind = EdgeKind::SelfLoop;
        } else if edge.kind == EdgeKind::SelfLoop {
            edge.kind = EdgeKind::Curved;
        }
    }
}

fn pair_key<K: Ord + Clone>(source: &K, target: &K) -> (K, K) {
    if source <= target {
        (source.clone(), target.clone())
    } else {
        (target.clone(), source.clone())
    }
}

/// Groups `(source, target)` pairs, returning one entry per edge in input
/// order.
pub fn assign_groups<K>(edges: &[(K, K)]) -> Vec<EdgeGroup>
where
    K: Ord + Hash + Clone,
{
    let mut counts: HashMap<(K, K), usize> = HashMap::new();
    for (source, target) in edges {
        *counts.entry(pair_key(source, target)).or_insert(0) += 1;
    }

    // Orientation of the first edge per pair, and the next free slot.
    let mut seen: HashMap<(K, K), (bool, usize)> = HashMap::new();

    edges
        .iter()
        .map(|(source, target)| {
            let key = pair_key(source, target);
            let forward = source <= target;
            let group_size = counts.get(&key).copied().unwrap_or(1);

            let (first_forward, next) = seen.entry(key).or_insert((forward, 0));
            let group_position = *next;
            *next += 1;

            let direction = if source == target || forward == *first_forward {
                Direction::Forward
            } else {
                Direction::Backwards
            };

            EdgeGroup {
                group_size,
                group_position,
                direction,
                self_loop: source == target,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bezier::curve_height;

    #[test]
    fn lone_edges_are_groups_of_one() {
        let groups = assign_groups(&[("a", "b"), ("b", "c")]);

        for group in groups {
            assert_eq!(group.group_size, 1);
            assert_eq!(group.group_position, 0);
            assert_eq!(group.direction, Direction::Forward);
        }
    }

    #[test]
    fn parallel_edges_get_distinct_slots() {
        let groups = assign_groups(&[("a", "b"), ("x", "y"), ("a", "b"), ("a", "b")]);

        let slots: Vec<_> = [0, 2, 3].iter().map(|&i| groups[i].group_position).collect();
        assert_eq!(slots, vec![0, 1, 2]);
        assert!([0, 2, 3].iter().all(|&i| groups[i].group_size == 3));
        assert_eq!(groups[1].group_size, 1);
    }

    #[test]
    fn reverse_edges_are_backwards_relative_to_the_first() {
        let groups = assign_groups(&[("b", "a"), ("a", "b")]);

        assert_eq!(groups[0].direction, Direction::Forward);
        assert_eq!(groups[1].direction, Direction::Backwards);
        assert_eq!(groups[1].group_size, 2);
    }

    #[test]
    fn reverse_pair_curves_to_opposite_sides() {
        let groups = assign_groups(&[("a", "b"), ("b", "a")]);

        let forward = curve_height(groups[0].group_size, groups[0].group_position, groups[0].direction);
        let reverse = curve_height(groups[1].group_size, groups[1].group_position, groups[1].direction);

        // The reverse edge's normal is flipped, so equal signs mean opposite sides.
        assert!(forward * reverse > 0.0);
    }

    #[test]
    fn self_loops_group_per_node() {
        let groups = assign_groups(&[(1, 1), (2, 2), (1, 1)]);

        assert!(groups.iter().all(|g| g.self_loop && g.direction == Direction::Forward));
        assert_eq!(groups[0].group_size, 2);
        assert_eq!(groups[2].group_position, 1);
        assert_eq!(groups[1].group_size, 1);
    }

    #[test]
    fn apply_sets_kind() {
        let group = assign_groups(&[(3, 3)])[0];
        let mut edge = EdgeDisplayData::default();
        group.apply(&mut edge);
        assert_eq!(edge.kind, EdgeKind::SelfLoop);

        let group = assign_groups(&[(3, 4)])[0];
        group.apply(&mut edge);
        assert_eq!(edge.kind, EdgeKind::Curved);
    }
}
