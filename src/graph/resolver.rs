use std::fmt;

use crate::{
    foundation::error::{SeedsimError, SeedsimResult},
    graph::builder::DependencyGraph,
};

/// Total order over all layers of a graph that satisfies every surviving edge.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct RenderOrder {
    names: Vec<String>,
}

impl RenderOrder {
    /// Layer names, first to render first.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Iterate names in render order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Number of layers in the order.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// `true` for an empty run.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Zero-based position of `name`, if present.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// `true` if this order lists every node of `graph` exactly once and puts every edge's
    /// `from` strictly before its `to`.
    pub fn satisfies(&self, graph: &DependencyGraph) -> bool {
        if self.names.len() != graph.len() {
            return false;
        }
        let mut positions = std::collections::HashMap::with_capacity(self.names.len());
        for (i, n) in self.names.iter().enumerate() {
            if !graph.contains(n) || positions.insert(n.as_str(), i).is_some() {
                return false;
            }
        }
        graph.edges().iter().all(|e| {
            match (positions.get(e.from.as_str()), positions.get(e.to.as_str())) {
                (Some(from), Some(to)) => from < to,
                _ => false,
            }
        })
    }
}

impl fmt::Display for RenderOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names.join(" -> "))
    }
}

impl<'a> IntoIterator for &'a RenderOrder {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

struct Dfs<'g> {
    graph: &'g DependencyGraph,
    marks: Vec<Mark>,
    /// In-progress chain, root first.
    stack: Vec<usize>,
    /// `(node, next prerequisite slot)` for each in-progress node.
    frames: Vec<(usize, usize)>,
    order: Vec<usize>,
}

impl Dfs<'_> {
    fn visit(&mut self, root: usize) -> SeedsimResult<()> {
        if self.marks[root] != Mark::Unvisited {
            return Ok(());
        }
        self.enter(root);

        let graph = self.graph;
        while let Some(&(node, next)) = self.frames.last() {
            let Some(&pre) = graph.prerequisite_indices(node).get(next) else {
                self.frames.pop();
                self.stack.pop();
                self.marks[node] = Mark::Done;
                self.order.push(node);
                continue;
            };

            if let Some(frame) = self.frames.last_mut() {
                frame.1 += 1;
            }
            match self.marks[pre] {
                Mark::Done => {}
                Mark::InProgress => return Err(self.cycle_error(pre)),
                Mark::Unvisited => self.enter(pre),
            }
        }
        Ok(())
    }

    fn enter(&mut self, node: usize) {
        self.marks[node] = Mark::InProgress;
        self.stack.push(node);
        self.frames.push((node, 0));
    }

    fn cycle_error(&self, node: usize) -> SeedsimError {
        let Some(start) = self.stack.iter().position(|&n| n == node) else {
            return SeedsimError::Other(anyhow::anyhow!(
                "layer '{}' marked in progress but not on the traversal stack (bug)",
                self.graph.node_name(node)
            ));
        };
        let path = self.stack[start..]
            .iter()
            .chain(std::iter::once(&node))
            .map(|&i| self.graph.node_name(i).to_string())
            .collect();
        SeedsimError::cycle(path)
    }
}

/// Compute a render order for `graph`.
///
/// Depth-first: layers are taken in registration order, and each layer's prerequisites are
/// rendered first, in the order they were declared. The result is therefore fully determined by
/// registration and declaration order.
///
/// Fails with [`SeedsimError::CycleDetected`] if the graph has a cycle. The reported path starts
/// and ends with the same layer and each layer in it depends on the next, e.g. `[X, Y, X]`.
#[tracing::instrument(skip(graph), fields(layers = graph.len()))]
pub fn resolve(graph: &DependencyGraph) -> SeedsimResult<RenderOrder> {
    let n = graph.len();
    let mut dfs = Dfs {
        graph,
        marks: vec![Mark::Unvisited; n],
        stack: Vec::new(),
        frames: Vec::new(),
        order: Vec::with_capacity(n),
    };

    for node in 0..n {
        dfs.visit(node)?;
    }

    let names = dfs
        .order
        .into_iter()
        .map(|i| graph.node_name(i).to_string())
        .collect();
    Ok(RenderOrder { names })
}

#[cfg(test)]
#[path = "../../tests/unit/graph/resolver.rs"]
mod tests;
