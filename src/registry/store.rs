use std::{any::Any, collections::HashMap, fmt};

use crate::foundation::error::{SeedsimError, SeedsimResult};

/// Identity of one artifact in the [`Registry`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct RegistryKey {
    /// Owner namespace, e.g. the network or simulation the artifact belongs to.
    pub scope: String,
    /// Artifact category.
    pub kind: String,
    /// Name unique within `scope`/`kind`.
    pub name: String,
}

impl RegistryKey {
    /// Build a key from its three parts.
    pub fn new(scope: impl Into<String>, kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            kind: kind.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RegistryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.scope, self.kind, self.name)
    }
}

struct Entry {
    key: RegistryKey,
    value: Box<dyn Any>,
}

/// Shared, insertion-ordered store of artifacts produced by rendered layers.
///
/// Values are type-erased; lookups name the expected type and return `None` on a mismatch.
/// Iteration follows insertion order, so after a run the registry lists artifacts in the order
/// the layers produced them.
#[derive(Default)]
pub struct Registry {
    entries: Vec<Entry>,
    index: HashMap<RegistryKey, usize>,
}

impl Registry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `scope/kind/name`.
    ///
    /// Fails when the key is already taken; existing artifacts are never replaced.
    pub fn register<T: Any>(
        &mut self,
        scope: impl Into<String>,
        kind: impl Into<String>,
        name: impl Into<String>,
        value: T,
    ) -> SeedsimResult<&mut T> {
        let key = RegistryKey::new(scope, kind, name);
        if self.index.contains_key(&key) {
            return Err(SeedsimError::registry(format!(
                "object '{key}' is already registered"
            )));
        }
        let idx = self.entries.len();
        self.index.insert(key.clone(), idx);
        self.entries.push(Entry {
            key,
            value: Box::new(value),
        });
        self.entries[idx]
            .value
            .downcast_mut::<T>()
            .ok_or_else(|| SeedsimError::registry("registered value changed type (bug)"))
    }

    /// Look up an artifact by key and expected type.
    pub fn get<T: Any>(&self, scope: &str, kind: &str, name: &str) -> Option<&T> {
        let idx = *self.index.get(&RegistryKey::new(scope, kind, name))?;
        self.entries[idx].value.downcast_ref::<T>()
    }

    /// Mutable variant of [`Registry::get`].
    pub fn get_mut<T: Any>(&mut self, scope: &str, kind: &str, name: &str) -> Option<&mut T> {
        let idx = *self.index.get(&RegistryKey::new(scope, kind, name))?;
        self.entries[idx].value.downcast_mut::<T>()
    }

    /// `true` if anything is registered under the key, whatever its type.
    pub fn has(&self, scope: &str, kind: &str, name: &str) -> bool {
        self.index.contains_key(&RegistryKey::new(scope, kind, name))
    }

    /// Keys of every artifact of `kind`, in insertion order.
    pub fn by_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a RegistryKey> + 'a {
        self.keys().filter(move |k| k.kind == kind)
    }

    /// Keys of every artifact in `scope`, in insertion order.
    pub fn by_scope<'a>(&'a self, scope: &'a str) -> impl Iterator<Item = &'a RegistryKey> + 'a {
        self.keys().filter(move |k| k.scope == scope)
    }

    /// All keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &RegistryKey> {
        self.entries.iter().map(|e| &e.key)
    }

    /// Number of stored artifacts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("len", &self.entries.len())
            .field("keys", &self.entries.iter().map(|e| &e.key).collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/registry/store.rs"]
mod tests;
