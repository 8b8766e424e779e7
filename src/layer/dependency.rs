use std::fmt;

/// One dependency declaration made by a layer, stored exactly as declared.
///
/// Declarations are normalized into graph edges later, by
/// [`DependencyGraph::build`](crate::DependencyGraph::build):
///
/// - regular (`reverse == false`): `target` must render **before** the declaring layer.
/// - reverse (`reverse == true`): `target` must render **after** the declaring layer.
///
/// `optional` lets the run continue when `target` is not registered. It is rejected on reverse
/// declarations.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Dependency {
    /// Name of the referenced layer.
    #[serde(rename = "layer")]
    pub target: String,
    /// Declared in reverse direction.
    #[serde(default)]
    pub reverse: bool,
    /// Dropped instead of failing when `target` is absent.
    #[serde(default)]
    pub optional: bool,
}

impl Dependency {
    /// Regular, mandatory dependency on `target`.
    pub fn on(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            reverse: false,
            optional: false,
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = if self.reverse { "before" } else { "after" };
        write!(f, "{dir} {}", self.target)?;
        if self.optional {
            f.write_str(" (optional)")?;
        }
        Ok(())
    }
}

/// Ordered list of a layer's dependency declarations.
///
/// Declarations accumulate; duplicates are kept and each later becomes its own edge.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dependencies {
    decls: Vec<Dependency>,
}

impl Dependencies {
    /// Empty declaration list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one declaration.
    pub fn add(&mut self, target: impl Into<String>, reverse: bool, optional: bool) {
        self.decls.push(Dependency {
            target: target.into(),
            reverse,
            optional,
        });
    }

    /// Declarations in the order they were added.
    pub fn iter(&self) -> std::slice::Iter<'_, Dependency> {
        self.decls.iter()
    }

    /// Number of declarations.
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    /// `true` when nothing was declared.
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

impl<'a> IntoIterator for &'a Dependencies {
    type Item = &'a Dependency;
    type IntoIter = std::slice::Iter<'a, Dependency>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Dependency> for Dependencies {
    fn from_iter<I: IntoIterator<Item = Dependency>>(iter: I) -> Self {
        Self {
            decls: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/dependency.rs"]
mod tests;
