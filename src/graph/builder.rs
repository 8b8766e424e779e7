use std::collections::HashMap;

use crate::{
    foundation::error::{SeedsimError, SeedsimResult},
    layer::dependency::Dependencies,
};

/// Normalized ordering constraint: `from` must render before `to`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Edge {
    /// Layer that renders first.
    pub from: String,
    /// Layer that renders after `from`.
    pub to: String,
    /// Copied from the originating declaration.
    pub optional: bool,
}

/// Optional declaration dropped because its target was not registered.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PrunedEdge {
    /// Layer that made the declaration.
    pub requester: String,
    /// Unregistered target.
    pub missing: String,
}

/// Dependency graph over all layers registered for one run.
///
/// Nodes keep registration order, which the resolver uses for tie-breaking. Every surviving edge
/// connects two registered layers; parallel edges from duplicate declarations are kept.
#[derive(Clone, Debug, Default)]
pub struct DependencyGraph {
    nodes: Vec<String>,
    index: HashMap<String, usize>,
    edges: Vec<Edge>,
    pruned: Vec<PrunedEdge>,
    // per node: layers that must render before it, in declaration order
    prerequisites: Vec<Vec<usize>>,
    dependents: Vec<Vec<usize>>,
}

impl DependencyGraph {
    /// Build the graph from `(layer name, declarations)` pairs in registration order.
    ///
    /// Fails with:
    /// - [`SeedsimError::Configuration`] for duplicate layer names, self-dependencies, or a
    ///   declaration that is both reverse and optional;
    /// - [`SeedsimError::MissingDependency`] when a mandatory target is not registered.
    ///
    /// Optional declarations on unregistered targets are dropped and listed in
    /// [`DependencyGraph::pruned`].
    #[tracing::instrument(skip(layers))]
    pub fn build<'a, I>(layers: I) -> SeedsimResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a Dependencies)>,
    {
        let layers: Vec<(&str, &Dependencies)> = layers.into_iter().collect();

        let mut graph = Self::default();
        for (name, _) in &layers {
            if graph.index.contains_key(*name) {
                return Err(SeedsimError::configuration(format!(
                    "duplicate layer name '{name}'"
                )));
            }
            graph.index.insert((*name).to_string(), graph.nodes.len());
            graph.nodes.push((*name).to_string());
        }
        graph.prerequisites = vec![Vec::new(); graph.nodes.len()];
        graph.dependents = vec![Vec::new(); graph.nodes.len()];

        for (owner_idx, (owner, deps)) in layers.iter().enumerate() {
            for dep in deps.iter() {
                if dep.reverse && dep.optional {
                    return Err(SeedsimError::configuration(format!(
                        "layer '{owner}' declares a reverse dependency on '{}' as optional; \
                         optional is not supported for reverse dependencies",
                        dep.target
                    )));
                }
                if dep.target == *owner {
                    return Err(SeedsimError::configuration(format!(
                        "layer '{owner}' declares a dependency on itself"
                    )));
                }

                let Some(&target_idx) = graph.index.get(&dep.target) else {
                    if dep.optional {
                        tracing::info!(
                            requester = %owner,
                            missing = %dep.target,
                            "optional dependency target not registered; dropping edge"
                        );
                        graph.pruned.push(PrunedEdge {
                            requester: (*owner).to_string(),
                            missing: dep.target.clone(),
                        });
                        continue;
                    }
                    return Err(SeedsimError::missing_dependency(
                        dep.target.clone(),
                        *owner,
                    ));
                };

                let (from, to) = if dep.reverse {
                    (owner_idx, target_idx)
                } else {
                    (target_idx, owner_idx)
                };
                graph.push_edge(from, to, dep.optional);
            }
        }

        tracing::debug!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            pruned = graph.pruned.len(),
            "dependency graph built"
        );
        Ok(graph)
    }

    fn push_edge(&mut self, from: usize, to: usize, optional: bool) {
        self.edges.push(Edge {
            from: self.nodes[from].clone(),
            to: self.nodes[to].clone(),
            optional,
        });
        self.prerequisites[to].push(from);
        self.dependents[from].push(to);
    }

    /// Layer names in registration order.
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    /// Surviving edges in declaration order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Optional declarations that were dropped.
    pub fn pruned(&self) -> &[PrunedEdge] {
        &self.pruned
    }

    /// `true` if `name` is a registered layer.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` when no layer is registered.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Layers that must render before `name`. Empty for unknown names.
    pub fn prerequisites(&self, name: &str) -> Vec<&str> {
        self.index
            .get(name)
            .map(|&i| self.names_of(&self.prerequisites[i]))
            .unwrap_or_default()
    }

    /// Layers that must render after `name`. Empty for unknown names.
    pub fn dependents(&self, name: &str) -> Vec<&str> {
        self.index
            .get(name)
            .map(|&i| self.names_of(&self.dependents[i]))
            .unwrap_or_default()
    }

    fn names_of(&self, idxs: &[usize]) -> Vec<&str> {
        idxs.iter().map(|&i| self.nodes[i].as_str()).collect()
    }

    pub(crate) fn node_name(&self, idx: usize) -> &str {
        &self.nodes[idx]
    }

    pub(crate) fn prerequisite_indices(&self, idx: usize) -> &[usize] {
        &self.prerequisites[idx]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/builder.rs"]
mod tests;
