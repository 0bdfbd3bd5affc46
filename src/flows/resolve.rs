//! Duplicate national id resolution.
//!
//! Runs right after the national id prompt of the "new profile" sequence.
//! If the id is free the sequence continues; otherwise the caller gets a
//! menu to try another id, open or claim the existing profile, or leave.

use tracing::debug;

use crate::error::Result;
use crate::menu::{Action, Caption, DynamicMenu, ItemCatalog, MenuOption, Step};
use crate::profiles::{ProfileRecord, ProfileRegistry};
use crate::session::{Session, vars};
use crate::types::NationalId;

use super::{FlowContext, NEW_PROFILE_SEQUENCE, items};

/// Outcome of checking a national id against the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No profile has this id.
    Absent,
    /// A profile exists and the caller owns it.
    OwnedByCaller(ProfileRecord),
    /// A profile exists and belongs to someone else.
    OwnedByOther(ProfileRecord),
}

impl Resolution {
    pub fn check(registry: &ProfileRegistry, national_id: &NationalId, msisdn: &str) -> Self {
        match registry.lookup(national_id) {
            None => Self::Absent,
            Some(p) if p.owned_by(msisdn) => Self::OwnedByCaller(p),
            Some(p) => Self::OwnedByOther(p),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// Continue if `profile_new_natid` is unused, else show the conflict menu.
pub fn check_national_id(ctx: FlowContext<'_>, session: &Session) -> Result<Step> {
    let national_id = session.get(vars::PROFILE_NEW_NATID)?;
    let msisdn = session.msisdn()?;

    let resolution = Resolution::check(ctx.registry, &national_id, &msisdn);
    match conflict_menu(ctx.catalog, &resolution) {
        None => {
            debug!(national_id = %national_id, "National id is free, continuing");
            Ok(Step::Continue)
        }
        Some(menu) => {
            debug!(
                national_id = %national_id,
                owned = matches!(resolution, Resolution::OwnedByCaller(_)),
                "National id already registered"
            );
            Ok(Step::Menu(menu))
        }
    }
}

/// Menu offered when the national id is taken; `None` when it is free.
///
/// Options are only added when the items they lead to exist, except "Ok"
/// which is always present. "Another id" restarts the whole creation
/// sequence, so the caller is asked for the remaining fields again after
/// a free id.
pub fn conflict_menu(catalog: &ItemCatalog, resolution: &Resolution) -> Option<DynamicMenu> {
    let owned = match resolution {
        Resolution::Absent => return None,
        Resolution::OwnedByCaller(_) => true,
        Resolution::OwnedByOther(_) => false,
    };

    let mut options = Vec::new();

    if let Ok(retry) = catalog.resolve_all(NEW_PROFILE_SEQUENCE) {
        options.push(MenuOption::new(
            Caption::localized([("af", "Ander ID"), ("en", "Enter another ID")]),
            retry,
        ));
    }

    if owned {
        if catalog.contains(items::PROFILE_EDIT) {
            options.push(MenuOption::new(
                Caption::localized([("af", "Gaan na profiel"), ("en", "Go to profile")]),
                vec![Action::item(items::PROFILE_EDIT)],
            ));
        }
    } else if catalog.contains(items::INVITE_NATID) {
        options.push(MenuOption::new(
            Caption::localized([
                ("af", "Maak dit ook deel van jou profiel"),
                ("en", "Add this to your profile"),
            ]),
            vec![Action::item(items::INVITE_NATID)],
        ));
    }

    options.push(MenuOption::new(
        Caption::localized([("af", "Ok"), ("en", "Ok")]),
        vec![Action::Final(Caption::localized([
            ("af", "Totsiens"),
            ("en", "Goodbye"),
        ]))],
    ));

    Some(DynamicMenu::new(
        Caption::localized([
            ("af", "ID {{profile_new_natid}} bestaan alreeds"),
            ("en", "ID {{profile_new_natid}} already exists"),
        ]),
        options,
    ))
}
