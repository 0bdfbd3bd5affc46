//! Built-in flows invoked by the menu engine.
//!
//! Each flow is a plain synchronous function over the session and the
//! injected registry/catalog. It returns a `Step` telling the engine
//! whether to continue with the next item, show a menu, or end.

pub mod finalize;
pub mod profile_menu;
pub mod resolve;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::menu::{ItemCatalog, Step};
use crate::profiles::ProfileRegistry;
use crate::session::Session;

pub use finalize::profile_add;
pub use profile_menu::profile_menu;
pub use resolve::{Resolution, check_national_id};

/// Ids of catalog items the flows link to.
pub mod items {
    pub const PROFILE_SHOW: &str = "profile_show";
    pub const PROFILE_EDIT: &str = "profile_edit";
    pub const INVITE_NATID: &str = "invite_natid";

    pub const PROFILE_NEW_NATID: &str = "profile_new_natid";
    pub const PROFILE_NEW_SURNAME: &str = "profile_new_surname";
    pub const PROFILE_NEW_NAME: &str = "profile_new_name";
    pub const PROFILE_NEW_DOB: &str = "profile_new_dob";
    pub const PROFILE_NEW_GENDER: &str = "profile_new_gender";
}

/// Items run, in order, to create a new profile. Both the family menu's
/// "new profile" option and the conflict menu's "another id" option run
/// the whole sequence, since choosing a menu option replaces whatever was
/// still pending.
pub const NEW_PROFILE_SEQUENCE: &[&str] = &[
    items::PROFILE_NEW_NATID,
    FlowId::CheckNationalId.item_id(),
    items::PROFILE_NEW_SURNAME,
    items::PROFILE_NEW_NAME,
    items::PROFILE_NEW_DOB,
    items::PROFILE_NEW_GENDER,
    FlowId::ProfileAdd.item_id(),
];

/// The built-in flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowId {
    #[serde(rename = "profile_menu")]
    ProfileMenu,
    #[serde(rename = "fail_if_natid_exists")]
    CheckNationalId,
    #[serde(rename = "profile_add")]
    ProfileAdd,
}

impl FlowId {
    pub const ALL: &'static [FlowId] = &[Self::ProfileMenu, Self::CheckNationalId, Self::ProfileAdd];

    /// Catalog id the flow is registered under.
    pub const fn item_id(&self) -> &'static str {
        match self {
            Self::ProfileMenu => "profile_menu",
            Self::CheckNationalId => "fail_if_natid_exists",
            Self::ProfileAdd => "profile_add",
        }
    }
}

impl std::fmt::Display for FlowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.item_id())
    }
}

/// Collaborators a flow may use.
#[derive(Clone, Copy)]
pub struct FlowContext<'a> {
    pub registry: &'a ProfileRegistry,
    pub catalog: &'a ItemCatalog,
}

impl<'a> FlowContext<'a> {
    pub fn new(registry: &'a ProfileRegistry, catalog: &'a ItemCatalog) -> Self {
        Self { registry, catalog }
    }
}

/// Run a built-in flow.
pub fn run(flow: FlowId, ctx: FlowContext<'_>, session: &Session) -> Result<Step> {
    match flow {
        FlowId::ProfileMenu => profile_menu(ctx, session),
        FlowId::CheckNationalId => check_national_id(ctx, session),
        FlowId::ProfileAdd => profile_add(ctx, session),
    }
}
