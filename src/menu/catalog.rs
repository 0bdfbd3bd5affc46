//! ItemCatalog: menu items addressable by id.
//!
//! Items come from a JSON menu definition. The built-in flows are always
//! registered under their own ids and cannot be redefined by the file.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::MenuError;
use crate::flows::FlowId;
use crate::session::ValueType;
use crate::types::ValidationFailure;

use super::caption::Caption;
use super::model::Action;

/// Option of a menu declared in the definition file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StaticOption {
    pub caption: Caption,
    /// Item ids run in order when the option is chosen.
    pub next: Vec<String>,
}

/// A menu item.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemDef {
    /// Ask for input and store it in session variable `name`.
    Prompt {
        caption: Caption,
        name: String,
        #[serde(default)]
        value_type: ValueType,
    },
    /// End the session with a message.
    Final { caption: Caption },
    /// Fixed menu.
    Menu {
        caption: Caption,
        options: Vec<StaticOption>,
    },
    /// Built-in flow.
    Flow { flow: FlowId },
}

#[derive(Debug, Deserialize)]
struct ItemEntry {
    id: String,
    #[serde(flatten)]
    def: ItemDef,
}

#[derive(Debug, Deserialize)]
struct MenuFile {
    items: Vec<ItemEntry>,
    #[serde(default)]
    errors: HashMap<String, Caption>,
}

/// Registry of menu items and validation messages.
#[derive(Debug, Clone)]
pub struct ItemCatalog {
    items: HashMap<String, ItemDef>,
    /// Validation failure messages keyed by failure code.
    errors: HashMap<String, Caption>,
}

impl Default for ItemCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemCatalog {
    /// Catalog holding only the built-in flows.
    pub fn new() -> Self {
        let items = FlowId::ALL
            .iter()
            .map(|flow| (flow.item_id().to_string(), ItemDef::Flow { flow: *flow }))
            .collect();
        Self {
            items,
            errors: HashMap::new(),
        }
    }

    /// Load and validate a menu definition file.
    pub fn load(path: &Path) -> Result<Self, MenuError> {
        let content = std::fs::read_to_string(path).map_err(|source| MenuError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&content)?;
        info!(path = %path.display(), items = catalog.len(), "Menu definition loaded");
        Ok(catalog)
    }

    /// Parse and validate a menu definition.
    ///
    /// Every item id referenced by a static menu must exist.
    pub fn from_json(json: &str) -> Result<Self, MenuError> {
        let file: MenuFile = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for entry in file.items {
            catalog.insert(entry.id, entry.def)?;
        }
        catalog.errors = file.errors;

        for def in catalog.items.values() {
            if let ItemDef::Menu { options, .. } = def {
                for option in options {
                    for id in &option.next {
                        catalog.resolve(id)?;
                    }
                }
            }
        }
        Ok(catalog)
    }

    /// Add an item. Ids are unique, including against built-in flows.
    pub fn insert(&mut self, id: impl Into<String>, def: ItemDef) -> Result<(), MenuError> {
        let id = id.into();
        if self.items.contains_key(&id) {
            return Err(MenuError::DuplicateItem(id));
        }
        self.items.insert(id, def);
        Ok(())
    }

    /// Set the message shown for a validation failure code.
    pub fn set_error_message(&mut self, code: impl Into<String>, caption: Caption) {
        self.errors.insert(code.into(), caption);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ItemDef> {
        self.items.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// Look up an item that must exist.
    pub fn resolve(&self, id: &str) -> Result<&ItemDef, MenuError> {
        self.get(id).ok_or_else(|| MenuError::UnknownItem(id.to_string()))
    }

    /// Turn a list of item ids into actions, failing on the first unknown id.
    pub fn resolve_all(&self, ids: &[&str]) -> Result<Vec<Action>, MenuError> {
        ids.iter()
            .map(|id| self.resolve(id).map(|_| Action::item(id)))
            .collect()
    }

    /// User-facing message for a validation failure. Falls back to the
    /// failure code when no message is configured.
    pub fn failure_message(&self, failure: &ValidationFailure, language: &str) -> String {
        match self.errors.get(failure.code) {
            Some(caption) => caption.render_params(language, &failure.params()),
            None => failure.code.to_string(),
        }
    }
}
