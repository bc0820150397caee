//! Alias table mapping short model names to backend model identifiers.

use std::collections::HashMap;

use axis_types::chat::ModelAlias;

/// Immutable alias -> model identifier table.
///
/// Built once at startup and shared behind an `Arc`; there is no mutation API.
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    models: HashMap<String, String>,
}

impl ModelCatalog {
    pub fn new<I, A, M>(entries: I) -> Self
    where
        I: IntoIterator<Item = (A, M)>,
        A: Into<String>,
        M: Into<String>,
    {
        Self {
            models: entries
                .into_iter()
                .map(|(alias, model)| (alias.into(), model.into()))
                .collect(),
        }
    }

    /// Backend model identifier for `alias`, if known.
    pub fn resolve(&self, alias: &str) -> Option<&str> {
        self.models.get(alias).map(String::as_str)
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.models.contains_key(alias)
    }

    /// Every alias in the table, in no particular order.
    pub fn aliases(&self) -> Vec<ModelAlias> {
        self.models
            .iter()
            .map(|(name, model)| ModelAlias {
                name: name.clone(),
                model: model.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
