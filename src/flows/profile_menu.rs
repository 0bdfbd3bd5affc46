//! "My family" menu: the caller's profiles plus a "new profile" entry.

use tracing::debug;

use crate::error::Result;
use crate::menu::{Action, Caption, DynamicMenu, MenuOption, Step};
use crate::profiles::ProfileRecord;
use crate::session::{Session, vars};

use super::{FlowContext, NEW_PROFILE_SEQUENCE, items};

/// Build the family menu for the calling phone number.
///
/// Fails if any linked item is missing from the catalog.
pub fn profile_menu(ctx: FlowContext<'_>, session: &Session) -> Result<Step> {
    ctx.catalog.resolve(items::PROFILE_SHOW)?;
    let new_profile_actions = ctx.catalog.resolve_all(NEW_PROFILE_SEQUENCE)?;

    let msisdn = session.msisdn()?;
    let mut family: Vec<(String, ProfileRecord)> = ctx
        .registry
        .list_owned_by(&msisdn)
        .into_iter()
        .map(|p| (p.display_label(), p))
        .collect();
    family.sort_by(|a, b| a.0.cmp(&b.0));
    debug!(msisdn = %msisdn, profiles = family.len(), "Building family menu");

    let mut options: Vec<MenuOption> = family
        .into_iter()
        .map(|(label, p)| {
            MenuOption::new(
                Caption::localized([("af", label.as_str()), ("en", label.as_str())]),
                vec![
                    Action::set(vars::PROFILE_NATID.name(), p.national_id),
                    Action::set(vars::PROFILE_SURNAME.name(), p.surname),
                    Action::set(vars::PROFILE_NAME.name(), p.given_name),
                    Action::set(vars::PROFILE_DOB.name(), p.date_of_birth),
                    Action::set(vars::PROFILE_GENDER.name(), p.gender),
                    Action::item(items::PROFILE_SHOW),
                ],
            )
        })
        .collect();

    options.push(MenuOption::new(
        Caption::localized([("af", "Nuwe profiel ..."), ("en", "New profile ...")]),
        new_profile_actions,
    ));

    Ok(Step::Menu(DynamicMenu::new(
        Caption::localized([("af", "My Familie"), ("en", "My Family")]),
        options,
    )))
}
