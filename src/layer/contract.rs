use crate::{layer::dependency::Dependencies, registry::store::Registry};

/// A named unit of work that contributes artifacts to the shared [`Registry`].
///
/// Implementors own their [`Dependencies`] and expose them through [`Layer::dependencies`]; the
/// renderer reads them once, before any layer renders. Layer kinds are an open set: anything that
/// implements this trait can take part in a run.
///
/// ```
/// use seedsim::{Dependencies, Layer, Registry};
///
/// struct Routing {
///     deps: Dependencies,
/// }
///
/// impl Layer for Routing {
///     fn name(&self) -> &str {
///         "Routing"
///     }
///
///     fn dependencies(&self) -> &Dependencies {
///         &self.deps
///     }
///
///     fn dependencies_mut(&mut self) -> &mut Dependencies {
///         &mut self.deps
///     }
///
///     fn on_render(&mut self, registry: &mut Registry) -> anyhow::Result<()> {
///         registry.register("seedsim", "layer", "Routing", ())?;
///         Ok(())
///     }
/// }
///
/// let mut routing = Routing { deps: Dependencies::new() };
/// routing.add_dependency("Base", false, false);
/// assert_eq!(routing.dependencies().len(), 1);
/// ```
pub trait Layer {
    /// Unique, stable name of this layer. Used to resolve dependency relationships.
    fn name(&self) -> &str;

    /// Declarations made so far, in declaration order.
    fn dependencies(&self) -> &Dependencies;

    /// Mutable access to the declarations, backing [`Layer::add_dependency`].
    fn dependencies_mut(&mut self) -> &mut Dependencies;

    /// Do the layer's work against the shared registry.
    ///
    /// Called at most once per run. An error aborts the run.
    fn on_render(&mut self, registry: &mut Registry) -> anyhow::Result<()>;

    /// Declare a dependency on `layer_name`.
    ///
    /// A regular dependency requires `layer_name` to render before this layer; a reverse one
    /// requires it to render after. `optional` lets the run continue when `layer_name` is not
    /// registered and is not accepted together with `reverse`.
    fn add_dependency(&mut self, layer_name: &str, reverse: bool, optional: bool) {
        self.dependencies_mut().add(layer_name, reverse, optional);
    }

    /// Human-readable description for diagnostics.
    fn describe(&self) -> String {
        let deps = self.dependencies();
        if deps.is_empty() {
            return format!("{}Layer", self.name());
        }
        let list = deps
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}Layer (renders {list})", self.name())
    }

    /// Emit a diagnostic message tagged with this layer's name.
    fn log(&self, message: &str) {
        tracing::info!(target: "seedsim::layer", "{}", log_line(self.name(), message));
    }
}

pub(crate) fn log_line(name: &str, message: &str) -> String {
    format!("==== {name}Layer: {message}")
}

#[cfg(test)]
#[path = "../../tests/unit/layer/contract.rs"]
mod tests;
