use crate::{
    layer::{contract::Layer, dependency::Dependencies},
    manifest::model::{ArtifactSpec, LayerSpec},
    registry::store::Registry,
};

/// A [`Layer`] defined by a manifest entry: it writes a fixed set of JSON artifacts.
#[derive(Clone, Debug)]
pub struct ManifestLayer {
    name: String,
    description: String,
    deps: Dependencies,
    artifacts: Vec<ArtifactSpec>,
    fail: Option<String>,
}

impl ManifestLayer {
    /// Layer with no declarations and no artifacts.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            deps: Dependencies::new(),
            artifacts: Vec::new(),
            fail: None,
        }
    }

    /// Build from a manifest entry.
    pub fn from_spec(spec: LayerSpec) -> Self {
        Self {
            name: spec.name,
            description: spec.description,
            deps: spec.depends.into_iter().collect(),
            artifacts: spec.artifacts,
            fail: spec.fail,
        }
    }

    /// Add an artifact written at render time.
    pub fn with_artifact(mut self, artifact: ArtifactSpec) -> Self {
        self.artifacts.push(artifact);
        self
    }

    /// Artifacts this layer writes.
    pub fn artifacts(&self) -> &[ArtifactSpec] {
        &self.artifacts
    }
}

impl Layer for ManifestLayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn dependencies(&self) -> &Dependencies {
        &self.deps
    }

    fn dependencies_mut(&mut self) -> &mut Dependencies {
        &mut self.deps
    }

    fn describe(&self) -> String {
        if self.description.is_empty() {
            format!("{}Layer", self.name)
        } else {
            format!("{}Layer: {}", self.name, self.description)
        }
    }

    fn on_render(&mut self, registry: &mut Registry) -> anyhow::Result<()> {
        if let Some(msg) = &self.fail {
            anyhow::bail!("{msg}");
        }
        for artifact in &self.artifacts {
            registry.register(
                artifact.scope.as_str(),
                artifact.kind.as_str(),
                artifact.name.as_str(),
                artifact.value.clone(),
            )?;
        }
        self.log(&format!("registered {} artifact(s)", self.artifacts.len()));
        Ok(())
    }
}
