//! Strong and weak connectivity of the sector graph.
//!
//! - **Strongly connected components** use Tarjan's algorithm with an
//!   explicit call stack, so deep supply chains cannot overflow the thread
//!   stack.
//! - **Weakly connected components** use union-find over every edge with
//!   direction ignored.

use petgraph::{Direction, visit::EdgeRef};
use serde::Serialize;
use tracing::instrument;

use crate::error::Result;
use crate::graph::SectorGraph;

/// Connectivity summary of a sector graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConnectivitySummary {
    /// Number of strongly connected components.
    pub strong_components: usize,
    /// Number of weakly connected components.
    pub weak_components: usize,
    /// `true` when every sector reaches every other sector.
    pub is_strongly_connected: bool,
}

/// Compute the connectivity summary.
///
/// # Errors
///
/// Returns [`crate::error::AnalysisError::EmptyGraph`] for a zero-node graph.
#[instrument(skip(g))]
pub fn connectivity_summary(g: &SectorGraph) -> Result<ConnectivitySummary> {
    g.ensure_non_empty()?;

    let strong_components = strongly_connected_components(g)?.len();
    let weak_components = weak_component_count(g)?;

    Ok(ConnectivitySummary {
        strong_components,
        weak_components,
        is_strongly_connected: strong_components == 1,
    })
}

// ---------------------------------------------------------------------------
// Tarjan SCC
// ---------------------------------------------------------------------------

/// Return every strongly connected component as a sorted list of labels.
///
/// Components are listed in the order Tarjan's algorithm completes them
/// (reverse topological order of the condensation).
///
/// # Errors
///
/// Returns [`crate::error::AnalysisError::EmptyGraph`] for a zero-node graph.
pub fn strongly_connected_components(g: &SectorGraph) -> Result<Vec<Vec<String>>> {
    g.ensure_non_empty()?;

    let inner = g.inner();
    let n = g.node_count();

    let successors: Vec<Vec<usize>> = inner
        .node_indices()
        .map(|v| {
            inner
                .edges_directed(v, Direction::Outgoing)
                .map(|e| e.target().index())
                .collect()
        })
        .collect();

    let mut index: Vec<Option<usize>> = vec![None; n];
    let mut lowlink: Vec<usize> = vec![0; n];
    let mut on_stack = vec![false; n];
    let mut stack: Vec<usize> = Vec::new();
    let mut next_index = 0usize;
    let mut components: Vec<Vec<usize>> = Vec::new();

    for root in 0..n {
        if index[root].is_some() {
            continue;
        }

        // Frames are (node, position of the next successor to visit).
        let mut call_stack: Vec<(usize, usize)> = vec![(root, 0)];
        index[root] = Some(next_index);
        lowlink[root] = next_index;
        next_index += 1;
        stack.push(root);
        on_stack[root] = true;

        while let Some(frame) = call_stack.last_mut() {
            let v = frame.0;
            if let Some(&w) = successors[v].get(frame.1) {
                frame.1 += 1;
                match index[w] {
                    None => {
                        index[w] = Some(next_index);
                        lowlink[w] = next_index;
                        next_index += 1;
                        stack.push(w);
                        on_stack[w] = true;
                        call_stack.push((w, 0));
                    }
                    Some(w_index) if on_stack[w] => {
                        lowlink[v] = lowlink[v].min(w_index);
                    }
                    Some(_) => {}
                }
                continue;
            }

            // All successors of v visited.
            call_stack.pop();
            if let Some(&(parent, _)) = call_stack.last() {
                lowlink[parent] = lowlink[parent].min(lowlink[v]);
            }

            if Some(lowlink[v]) == index[v] {
                let mut component = Vec::new();
                while let Some(w) = stack.pop() {
                    on_stack[w] = false;
                    component.push(w);
                    if w == v {
                        break;
                    }
                }
                components.push(component);
            }
        }
    }

    Ok(components
        .into_iter()
        .map(|members| {
            let mut labels: Vec<String> = members
                .into_iter()
                .map(|i| inner[petgraph::graph::NodeIndex::new(i)].label.clone())
                .collect();
            labels.sort_unstable();
            labels
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Union-find WCC
// ---------------------------------------------------------------------------

struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
    sets: usize,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
            sets: n,
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            // Path halving.
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] = self.rank[ra].saturating_add(1);
            }
        }
        self.sets -= 1;
    }
}

/// Count weakly connected components (edge direction ignored).
///
/// # Errors
///
/// Returns [`crate::error::AnalysisError::EmptyGraph`] for a zero-node graph.
pub fn weak_component_count(g: &SectorGraph) -> Result<usize> {
    g.ensure_non_empty()?;

    let mut ds = DisjointSet::new(g.node_count());
    for (a, b, _) in g.flows() {
        ds.union(a.index(), b.index());
    }
    Ok(ds.sets)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;

    fn make_graph(nodes: &[&str], edges: &[(&str, &str)]) -> SectorGraph {
        let labels: Vec<String> = nodes.iter().map(|s| (*s).to_string()).collect();
        let edges: Vec<(String, String, f64)> = edges
            .iter()
            .map(|(a, b)| ((*a).to_string(), (*b).to_string(), 1.0))
            .collect();
        SectorGraph::from_edges(&labels, &edges).expect("valid test graph")
    }

    #[test]
    fn empty_graph_is_an_error() {
        let g = make_graph(&[], &[]);
        assert_eq!(connectivity_summary(&g), Err(AnalysisError::EmptyGraph));
    }

    #[test]
    fn single_node_is_strongly_connected() {
        let g = make_graph(&["A"], &[]);
        let s = connectivity_summary(&g).expect("ok");
        assert_eq!(s.strong_components, 1);
        assert_eq!(s.weak_components, 1);
        assert!(s.is_strongly_connected);
    }

    #[test]
    fn chain_is_weakly_but_not_strongly_connected() {
        let g = make_graph(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
        let s = connectivity_summary(&g).expect("ok");
        assert_eq!(s.strong_components, 3);
        assert_eq!(s.weak_components, 1);
        assert!(!s.is_strongly_connected);
    }

    #[test]
    fn cycle_is_strongly_connected() {
        let g = make_graph(&["A", "B", "C"], &[("A", "B"), ("B", "C"), ("C", "A")]);
        let s = connectivity_summary(&g).expect("ok");
        assert_eq!(s.strong_components, 1);
        assert!(s.is_strongly_connected);
    }

    #[test]
    fn scc_members_grouped() {
        // {A, B} cycle → C, and isolated D.
        let g = make_graph(&["A", "B", "C", "D"], &[("A", "B"), ("B", "A"), ("A", "C")]);
        let mut sccs = strongly_connected_components(&g).expect("ok");
        sccs.sort();
        assert_eq!(
            sccs,
            vec![
                vec!["A".to_string(), "B".to_string()],
                vec!["C".to_string()],
                vec!["D".to_string()],
            ]
        );

        let s = connectivity_summary(&g).expect("ok");
        assert_eq!(s.strong_components, 3);
        assert_eq!(s.weak_components, 2);
    }

    #[test]
    fn tarjan_completes_sinks_first() {
        let g = make_graph(&["A", "B"], &[("A", "B")]);
        let sccs = strongly_connected_components(&g).expect("ok");
        assert_eq!(sccs, vec![vec!["B".to_string()], vec!["A".to_string()]]);
    }

    #[test]
    fn self_loop_does_not_merge_components() {
        let g = make_graph(&["A", "B"], &[("A", "A")]);
        let s = connectivity_summary(&g).expect("ok");
        assert_eq!(s.strong_components, 2);
        assert_eq!(s.weak_components, 2);
    }

    #[test]
    fn long_chain_does_not_overflow() {
        let names: Vec<String> = (0..20_000).map(|i| format!("S{i}")).collect();
        let edges: Vec<(String, String, f64)> = names
            .windows(2)
            .map(|w| (w[0].clone(), w[1].clone(), 1.0))
            .collect();
        let g = SectorGraph::from_edges(&names, &edges).expect("valid");
        let s = connectivity_summary(&g).expect("ok");
        assert_eq!(s.strong_components, 20_000);
        assert_eq!(s.weak_components, 1);
    }
}
