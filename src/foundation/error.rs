/// Convenience result type used across seedsim.
pub type SeedsimResult<T> = Result<T, SeedsimError>;

/// Top-level error taxonomy used by the graph, resolver and renderer.
#[derive(thiserror::Error, Debug)]
pub enum SeedsimError {
    /// Invalid layer declarations or manifest data.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A non-optional dependency names a layer that is not registered.
    #[error("missing dependency: layer '{requester}' depends on '{missing}', which is not registered")]
    MissingDependency {
        /// Name of the absent layer.
        missing: String,
        /// Layer whose declaration referenced it.
        requester: String,
    },

    /// Layer dependencies form a cycle; no render order exists.
    #[error("dependency cycle detected: {}", .path.join(" -> "))]
    CycleDetected {
        /// Cycle path, starting and ending with the same layer. Each layer depends on the next.
        path: Vec<String>,
    },

    /// A layer's render step failed.
    #[error("layer '{layer}' failed to render: {source:#}")]
    Render {
        /// Name of the failing layer.
        layer: String,
        /// Error returned by the layer.
        #[source]
        source: anyhow::Error,
    },

    /// Registry misuse, such as registering the same key twice.
    #[error("registry error: {0}")]
    Registry(String),

    /// Renderer used out of order (render twice, add layers after start).
    #[error("lifecycle error: {0}")]
    Lifecycle(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SeedsimError {
    /// Build a [`SeedsimError::Configuration`] value.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`SeedsimError::MissingDependency`] value.
    pub fn missing_dependency(missing: impl Into<String>, requester: impl Into<String>) -> Self {
        Self::MissingDependency {
            missing: missing.into(),
            requester: requester.into(),
        }
    }

    /// Build a [`SeedsimError::CycleDetected`] value.
    pub fn cycle(path: Vec<String>) -> Self {
        Self::CycleDetected { path }
    }

    /// Build a [`SeedsimError::Render`] value.
    pub fn render(layer: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Render {
            layer: layer.into(),
            source,
        }
    }

    /// Build a [`SeedsimError::Registry`] value.
    pub fn registry(msg: impl Into<String>) -> Self {
        Self::Registry(msg.into())
    }

    /// Build a [`SeedsimError::Lifecycle`] value.
    pub fn lifecycle(msg: impl Into<String>) -> Self {
        Self::Lifecycle(msg.into())
    }

    /// Build a [`SeedsimError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
