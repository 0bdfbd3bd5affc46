//! Final step of "new profile": commit the collected fields.

use tracing::{info, warn};

use crate::error::{FlowError, RegistryError, Result};
use crate::menu::{Caption, Step};
use crate::profiles::ProfileRecord;
use crate::session::{Session, vars};
use crate::types::{CalendarDate, NationalId};

use super::resolve::{Resolution, conflict_menu};
use super::FlowContext;

/// Create the profile from the session and end the session.
///
/// The id and date were validated by their prompts, so a parse failure
/// here is a defect and is returned as an error. If another session
/// registered the same id in the meantime, the conflict menu is shown
/// instead.
pub fn profile_add(ctx: FlowContext<'_>, session: &Session) -> Result<Step> {
    let msisdn = session.msisdn()?;

    let national_id = NationalId::parse(&session.text(vars::PROFILE_NEW_NATID.name())?)
        .map_err(|source| FlowError::Unparseable {
            field: "national id",
            source,
        })?;
    let date_of_birth = CalendarDate::parse(&session.text(vars::PROFILE_NEW_DOB.name())?)
        .map_err(|source| FlowError::Unparseable {
            field: "date of birth",
            source,
        })?;

    let record = ProfileRecord::new(
        msisdn.as_str(),
        national_id.clone(),
        session.get(vars::PROFILE_NEW_SURNAME)?,
        session.get(vars::PROFILE_NEW_NAME)?,
        date_of_birth,
        session.get(vars::PROFILE_NEW_GENDER)?,
    );

    match ctx.registry.insert(record) {
        Ok(()) => {
            info!(national_id = %national_id, msisdn = %msisdn, "New profile added");
            Ok(Step::Final(Caption::localized([
                ("af", "Die profiel is geskep. Totsiens."),
                ("en", "The profile has been created. Goodbye."),
            ])))
        }
        Err(RegistryError::AlreadyExists { national_id: taken }) => {
            warn!(
                national_id = %taken,
                msisdn = %msisdn,
                "National id registered by another session before commit"
            );
            let resolution = Resolution::check(ctx.registry, &national_id, &msisdn);
            match conflict_menu(ctx.catalog, &resolution) {
                Some(menu) => Ok(Step::Menu(menu)),
                None => Err(RegistryError::AlreadyExists { national_id: taken }.into()),
            }
        }
        Err(e) => Err(e.into()),
    }
}
