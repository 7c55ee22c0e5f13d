//! Named-type registry.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use tracing::warn;

use crate::kernel::Type;

pub type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Maps names to types, in registration order. Entries are never removed;
/// registering a name again shadows the earlier type.
#[derive(Debug, Default)]
pub struct Space {
  types: FxIndexMap<String, Type>,
}

impl Space {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers `ty` under `name`, returning the type it shadows, if any.
  pub fn register(
    &mut self,
    name: impl Into<String>,
    ty: Type,
  ) -> Option<Type> {
    let name = name.into();
    let prev = self.types.insert(name.clone(), ty);
    if prev.is_some() {
      warn!(%name, "type name registered twice, shadowing");
    }
    prev
  }

  pub fn lookup(&self, name: &str) -> Option<&Type> {
    self.types.get(name)
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.types.keys().map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.types.len()
  }

  pub fn is_empty(&self) -> bool {
    self.types.is_empty()
  }
}
