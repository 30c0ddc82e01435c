// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dependency graph over spliced declarations.
//!
//! Nodes are entry positions. An edge `u -> v` means `v` references `u`, so `u`
//! must be resolved first.

use std::collections::BTreeSet;

/// A directed graph over entry positions.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    dependents: Vec<Vec<usize>>,
    in_degree: Vec<usize>,
}

impl DependencyGraph {
    /// Creates a graph with `nodes` nodes and no edges.
    pub fn new(nodes: usize) -> Self {
        DependencyGraph {
            dependents: vec![Vec::new(); nodes],
            in_degree: vec![0; nodes],
        }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.in_degree.len()
    }

    /// Returns `true` if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.in_degree.is_empty()
    }

    /// Records that `dependent` needs `dependency` to be resolved first.
    pub fn add_dependency(&mut self, dependent: usize, dependency: usize) {
        self.dependents[dependency].push(dependent);
        self.in_degree[dependent] += 1;
    }

    /// Orders the nodes so every dependency comes before its dependents.
    ///
    /// Among nodes that are ready at the same time the lowest position goes first,
    /// so a graph without edges keeps declaration order. On failure the nodes that
    /// take part in a cycle are returned in ascending order.
    pub fn topological_order(&self) -> Result<Vec<usize>, Vec<usize>> {
        let mut in_degree = self.in_degree.clone();
        let mut ready: BTreeSet<usize> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, &deg)| deg == 0)
            .map(|(node, _)| node)
            .collect();
        let mut order = Vec::with_capacity(self.len());

        while let Some(node) = ready.pop_first() {
            order.push(node);
            for &dependent in &self.dependents[node] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    ready.insert(dependent);
                }
            }
        }

        if order.len() == self.len() {
            return Ok(order);
        }

        Err(self.cycle_members(&in_degree))
    }

    // Nodes left with unresolved dependencies include the cycles themselves plus
    // everything downstream of them. Peel off nodes nothing else still waits on
    // until only the cycles remain.
    fn cycle_members(&self, in_degree: &[usize]) -> Vec<usize> {
        let mut remaining: BTreeSet<usize> = (0..self.len()).filter(|&n| in_degree[n] > 0).collect();
        loop {
            let sinks: Vec<usize> = remaining
                .iter()
                .copied()
                .filter(|&n| !self.dependents[n].iter().any(|d| remaining.contains(d)))
                .collect();
            if sinks.is_empty() {
                return remaining.into_iter().collect();
            }
            for sink in sinks {
                remaining.remove(&sink);
            }
        }
    }
}
