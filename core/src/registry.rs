//! Plugin registries.
//!
//! Each plugin family (BSDF, light, medium, shape, sampler, renderer) keeps a
//! registry mapping string type identifiers to constructors. Lookup happens
//! only at scene-build time; the hot evaluation path holds direct trait
//! object references.

use crate::error::{Error, Result};
use crate::paramset::ParamSet;
use std::collections::HashMap;
use std::sync::Arc;

/// Factory signature for a plugin family.
pub type Factory<T> = Box<dyn Fn(&ParamSet) -> Result<Arc<T>> + Send + Sync>;

/// A string-keyed registry of plugin constructors for one family.
pub struct Registry<T: ?Sized> {
    factories: HashMap<String, Factory<T>>,
}

impl<T: ?Sized> Default for Registry<T> {
    fn default() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }
}

impl<T: ?Sized> Registry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor under a type identifier. Re-registration
    /// replaces the previous constructor.
    ///
    /// * `name`    - Type identifier.
    /// * `factory` - The constructor.
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(&ParamSet) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.factories.insert(name.to_string(), Box::new(factory));
    }

    /// Construct a plugin instance by type identifier.
    ///
    /// * `name`   - Type identifier.
    /// * `params` - Resolved parameters.
    pub fn create(&self, name: &str, params: &ParamSet) -> Result<Arc<T>> {
        match self.factories.get(name) {
            Some(factory) => factory(params),
            None => Err(Error::UnknownPlugin(name.to_string())),
        }
    }

    /// Returns the registered type identifiers.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(|s| s.as_str())
    }
}
