//! Min-heap entry for Dijkstra over nonnegative `f64` costs.

use std::cmp::Ordering;

use petgraph::graph::NodeIndex;

/// A tentative distance for `node`, ordered so that [`std::collections::BinaryHeap`]
/// pops the smallest cost first.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Candidate {
    pub cost: f64,
    pub node: NodeIndex,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed on cost for a min-heap; node index breaks ties so pop
        // order is deterministic.
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    #[test]
    fn pops_smallest_cost_first() {
        let mut heap = BinaryHeap::new();
        for (cost, n) in [(3.0, 0), (1.0, 1), (2.0, 2), (1.0, 3)] {
            heap.push(Candidate {
                cost,
                node: NodeIndex::new(n),
            });
        }
        let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|c| c.node.index())).collect();
        assert_eq!(order, vec![1, 3, 2, 0]);
    }
}
