use std::{collections::HashMap, fmt};

use crate::{
    foundation::error::{SeedsimError, SeedsimResult},
    graph::builder::DependencyGraph,
    graph::resolver::{RenderOrder, resolve},
    layer::contract::Layer,
    registry::store::Registry,
};

/// Lifecycle of a [`Renderer`].
///
/// `Idle -> Building -> Resolving -> Rendering { .. } -> Done`. Any error while building,
/// resolving or rendering moves to `Failed`, which is terminal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RendererState {
    /// Accepting layers; nothing has run yet.
    Idle,
    /// Building the dependency graph.
    Building,
    /// Computing the render order.
    Resolving,
    /// Rendering the layer at `index` in the resolved order.
    Rendering {
        /// Position in the render order.
        index: usize,
    },
    /// Every layer rendered.
    Done,
    /// The run stopped on an error.
    Failed {
        /// Display text of the error that stopped the run.
        reason: String,
    },
}

/// Counters describing one render run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct RenderStats {
    /// Registered layers.
    pub layers_total: usize,
    /// Layers whose render step completed.
    pub layers_rendered: usize,
    /// Edges that constrained the order.
    pub edges: usize,
    /// Optional declarations dropped because their target was absent.
    pub edges_pruned: usize,
}

/// Outcome of a successful [`Renderer::render`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct RenderReport {
    /// Resolved order the layers were rendered in.
    pub order: RenderOrder,
    /// Run counters.
    pub stats: RenderStats,
}

/// Registers layers, resolves their order, and renders each one exactly once.
///
/// ```
/// use seedsim::{Dependencies, Layer, Registry, Renderer};
///
/// struct Named(&'static str, Dependencies);
///
/// impl Layer for Named {
///     fn name(&self) -> &str { self.0 }
///     fn dependencies(&self) -> &Dependencies { &self.1 }
///     fn dependencies_mut(&mut self) -> &mut Dependencies { &mut self.1 }
///     fn on_render(&mut self, reg: &mut Registry) -> anyhow::Result<()> {
///         reg.register("demo", "layer", self.0, ())?;
///         Ok(())
///     }
/// }
///
/// let mut routing = Named("Routing", Dependencies::new());
/// routing.add_dependency("Base", false, false);
///
/// let mut renderer = Renderer::new();
/// renderer.add_layer(Box::new(routing))?;
/// renderer.add_layer(Box::new(Named("Base", Dependencies::new())))?;
///
/// let mut registry = Registry::new();
/// let report = renderer.render(&mut registry)?;
/// assert_eq!(report.order.names(), &["Base", "Routing"]);
/// # Ok::<(), seedsim::SeedsimError>(())
/// ```
pub struct Renderer {
    layers: Vec<Box<dyn Layer>>,
    state: RendererState,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            layers: Vec::new(),
            state: RendererState::Idle,
        }
    }
}

impl Renderer {
    /// Idle renderer with no layers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register all `layers` and render them into `registry`.
    pub fn run<I>(layers: I, registry: &mut Registry) -> SeedsimResult<RenderReport>
    where
        I: IntoIterator<Item = Box<dyn Layer>>,
    {
        let mut renderer = Self::new();
        for layer in layers {
            renderer.add_layer(layer)?;
        }
        renderer.render(registry)
    }

    /// Register a layer. Only allowed before rendering starts.
    ///
    /// Name uniqueness is checked when the graph is built.
    pub fn add_layer(&mut self, layer: Box<dyn Layer>) -> SeedsimResult<()> {
        if self.state != RendererState::Idle {
            return Err(SeedsimError::lifecycle(format!(
                "cannot add layer '{}' once rendering has started",
                layer.name()
            )));
        }
        tracing::debug!(layer = %layer.name(), "layer registered");
        self.layers.push(layer);
        Ok(())
    }

    /// Current lifecycle state.
    pub fn state(&self) -> &RendererState {
        &self.state
    }

    /// Registered layer by name.
    pub fn layer(&self, name: &str) -> Option<&dyn Layer> {
        self.layers
            .iter()
            .find(|l| l.name() == name)
            .map(|l| l.as_ref())
    }

    /// Mutable registered layer by name, e.g. to add declarations before rendering.
    pub fn layer_mut(&mut self, name: &str) -> Option<&mut dyn Layer> {
        self.layers
            .iter_mut()
            .find(|l| l.name() == name)
            .map(|l| l.as_mut() as &mut dyn Layer)
    }

    /// Registered layers in registration order.
    pub fn layers(&self) -> impl Iterator<Item = &dyn Layer> {
        self.layers.iter().map(|l| l.as_ref() as &dyn Layer)
    }

    /// Dependency graph of the registered layers.
    pub fn graph(&self) -> SeedsimResult<DependencyGraph> {
        DependencyGraph::build(self.layers.iter().map(|l| (l.name(), l.dependencies())))
    }

    /// Build and resolve without rendering anything.
    pub fn plan(&self) -> SeedsimResult<RenderOrder> {
        resolve(&self.graph()?)
    }

    /// Build the graph, resolve the order, and render every layer in that order.
    ///
    /// Nothing renders if building or resolving fails. If a layer fails, later layers are skipped
    /// and the error names the failing layer; artifacts already written to `registry` stay.
    /// A renderer runs once: calling this again after `Done` or `Failed` is an error.
    #[tracing::instrument(skip(self, registry), fields(layers = self.layers.len()))]
    pub fn render(&mut self, registry: &mut Registry) -> SeedsimResult<RenderReport> {
        if self.state != RendererState::Idle {
            return Err(SeedsimError::lifecycle(format!(
                "renderer cannot start a run from state {:?}",
                self.state
            )));
        }

        self.state = RendererState::Building;
        let graph = self.graph().map_err(|e| self.fail(e))?;

        self.state = RendererState::Resolving;
        let order = resolve(&graph).map_err(|e| self.fail(e))?;
        tracing::info!(order = %order, "render order resolved");

        let slots: HashMap<String, usize> = self
            .layers
            .iter()
            .enumerate()
            .map(|(i, l)| (l.name().to_string(), i))
            .collect();

        let mut stats = RenderStats {
            layers_total: self.layers.len(),
            layers_rendered: 0,
            edges: graph.edges().len(),
            edges_pruned: graph.pruned().len(),
        };

        for (index, name) in order.iter().enumerate() {
            self.state = RendererState::Rendering { index };
            let Some(&slot) = slots.get(name) else {
                return Err(self.fail(SeedsimError::Other(anyhow::anyhow!(
                    "resolved layer '{name}' is not registered (bug)"
                ))));
            };

            tracing::debug!(layer = %name, index, "rendering layer");
            if let Err(source) = self.layers[slot].on_render(registry) {
                tracing::warn!(layer = %name, error = %source, "layer render failed; aborting run");
                return Err(self.fail(SeedsimError::render(name, source)));
            }
            stats.layers_rendered += 1;
        }

        self.state = RendererState::Done;
        tracing::info!(
            layers = stats.layers_rendered,
            artifacts = registry.len(),
            "render complete"
        );
        Ok(RenderReport { order, stats })
    }

    fn fail(&mut self, err: SeedsimError) -> SeedsimError {
        self.state = RendererState::Failed {
            reason: err.to_string(),
        };
        err
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("layers", &self.layers.iter().map(|l| l.name()).collect::<Vec<_>>())
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
