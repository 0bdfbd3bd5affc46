//! Dynamic menus built by flows at runtime.

use crate::flows::FlowId;
use crate::session::SessionValue;

use super::caption::Caption;

/// One step executed when a menu option is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Store a value in a session variable.
    Set { name: String, value: SessionValue },
    /// Run a catalog item by id.
    Item(String),
    /// Run a built-in flow directly.
    Flow(FlowId),
    /// End the session with a message.
    Final(Caption),
}

impl Action {
    pub fn set(name: &str, value: impl Into<SessionValue>) -> Self {
        Self::Set {
            name: name.to_string(),
            value: value.into(),
        }
    }

    pub fn item(id: &str) -> Self {
        Self::Item(id.to_string())
    }
}

/// A selectable option: caption plus the actions it runs, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOption {
    pub caption: Caption,
    pub actions: Vec<Action>,
}

impl MenuOption {
    pub fn new(caption: Caption, actions: Vec<Action>) -> Self {
        Self { caption, actions }
    }

    /// Whether choosing this option runs catalog item `id`.
    pub fn runs_item(&self, id: &str) -> bool {
        self.actions
            .iter()
            .any(|a| matches!(a, Action::Item(item) if item == id))
    }

    /// Whether choosing this option ends the session immediately.
    pub fn is_final(&self) -> bool {
        matches!(self.actions.first(), Some(Action::Final(_)))
    }
}

/// A menu assembled at runtime. Options are shown in order, numbered
/// from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicMenu {
    pub title: Caption,
    pub options: Vec<MenuOption>,
}

impl DynamicMenu {
    pub fn new(title: Caption, options: Vec<MenuOption>) -> Self {
        Self { title, options }
    }

    /// First option that runs catalog item `id`.
    pub fn option_running(&self, id: &str) -> Option<&MenuOption> {
        self.options.iter().find(|o| o.runs_item(id))
    }
}

/// What a flow asks the engine to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Nothing to show; proceed with the remaining items.
    Continue,
    /// Show this menu.
    Menu(DynamicMenu),
    /// End the session with this message.
    Final(Caption),
}
