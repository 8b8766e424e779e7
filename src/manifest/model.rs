use std::{collections::HashSet, path::Path};

use anyhow::Context as _;

use crate::{
    foundation::error::{SeedsimError, SeedsimResult},
    layer::{contract::Layer, dependency::Dependency},
    manifest::layer::ManifestLayer,
    registry::store::RegistryKey,
};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Declarative description of the layers taking part in one run.
///
/// A manifest is plain data that can be written by hand or generated, then loaded from JSON and
/// turned into [`ManifestLayer`]s with [`Manifest::into_layers`].
pub struct Manifest {
    /// Layers in registration order.
    pub layers: Vec<LayerSpec>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One layer entry of a [`Manifest`].
pub struct LayerSpec {
    /// Unique layer name.
    pub name: String,
    /// Free-form description used in diagnostics.
    #[serde(default)]
    pub description: String,
    /// Dependency declarations, in declaration order.
    #[serde(default)]
    pub depends: Vec<Dependency>,
    /// Artifacts the layer writes to the registry when it renders.
    #[serde(default)]
    pub artifacts: Vec<ArtifactSpec>,
    /// When set, the render step fails with this message instead of writing artifacts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail: Option<String>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// An artifact written by a manifest layer.
pub struct ArtifactSpec {
    /// Registry scope.
    pub scope: String,
    /// Registry kind.
    pub kind: String,
    /// Registry name.
    pub name: String,
    /// Stored JSON value.
    #[serde(default)]
    pub value: serde_json::Value,
}

impl ArtifactSpec {
    /// Registry key this artifact is stored under.
    pub fn key(&self) -> RegistryKey {
        RegistryKey::new(&self.scope, &self.kind, &self.name)
    }
}

impl Manifest {
    /// Parse a manifest from JSON text. Does not validate.
    pub fn from_json_str(s: &str) -> SeedsimResult<Self> {
        serde_json::from_str(s).map_err(|e| SeedsimError::serde(format!("parse manifest: {e}")))
    }

    /// Read and parse a manifest file. Does not validate.
    pub fn from_path(path: impl AsRef<Path>) -> SeedsimResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read manifest '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Check layer names and artifact keys.
    ///
    /// Dependency targets are not checked here: missing targets, cycles and invalid declaration
    /// combinations are reported by graph construction and resolution.
    pub fn validate(&self) -> SeedsimResult<()> {
        let mut names = HashSet::new();
        let mut keys = HashSet::new();
        for layer in &self.layers {
            if layer.name.trim().is_empty() {
                return Err(SeedsimError::configuration("layer name must be non-empty"));
            }
            if !names.insert(layer.name.as_str()) {
                return Err(SeedsimError::configuration(format!(
                    "duplicate layer name '{}'",
                    layer.name
                )));
            }
            for dep in &layer.depends {
                if dep.target.trim().is_empty() {
                    return Err(SeedsimError::configuration(format!(
                        "layer '{}' declares a dependency with an empty layer name",
                        layer.name
                    )));
                }
            }
            for artifact in &layer.artifacts {
                for (field, value) in [
                    ("scope", &artifact.scope),
                    ("kind", &artifact.kind),
                    ("name", &artifact.name),
                ] {
                    if value.trim().is_empty() {
                        return Err(SeedsimError::configuration(format!(
                            "layer '{}' has an artifact with empty {field}",
                            layer.name
                        )));
                    }
                }
                let key = artifact.key();
                if !keys.insert(key.clone()) {
                    return Err(SeedsimError::configuration(format!(
                        "artifact '{key}' is produced more than once"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Turn every entry into a boxed [`ManifestLayer`], in manifest order.
    pub fn into_layers(self) -> Vec<Box<dyn Layer>> {
        self.layers
            .into_iter()
            .map(|spec| Box::new(ManifestLayer::from_spec(spec)) as Box<dyn Layer>)
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/manifest/model.rs"]
mod tests;
