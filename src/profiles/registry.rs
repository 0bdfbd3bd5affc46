//! ProfileRegistry: in-memory profile table with whole-file JSON
//! persistence.
//!
//! The file is read once when the registry is opened and rewritten on
//! every successful insert. Writes go to a temporary sibling file that is
//! synced and then renamed over the original, so a reader never sees a
//! partially written registry.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::RegistryError;
use crate::types::NationalId;

use super::model::ProfileRecord;

/// On-disk layout: `{"profiles": {"<national_id>": {...}}}`.
#[derive(Debug, Default, Deserialize)]
struct ProfileFile {
    #[serde(default)]
    profiles: BTreeMap<String, ProfileRecord>,
}

#[derive(Serialize)]
struct ProfileFileRef<'a> {
    profiles: BTreeMap<&'a str, &'a ProfileRecord>,
}

/// Profile table keyed by national id.
///
/// `insert` holds the write lock across the existence check, the map
/// update and the file write, so two sessions racing on the same id
/// cannot both succeed.
pub struct ProfileRegistry {
    path: PathBuf,
    profiles: RwLock<BTreeMap<NationalId, ProfileRecord>>,
}

impl ProfileRegistry {
    /// Open the registry backed by `path`.
    ///
    /// A missing file yields an empty registry. A file that cannot be read
    /// or parsed, or that stores a record under a key other than its own
    /// national id, is an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RegistryError> {
        let path = path.into();
        let profiles = match load(&path)? {
            Some(profiles) => profiles,
            None => {
                info!(path = %path.display(), "No profile file yet, starting empty");
                BTreeMap::new()
            }
        };
        info!(path = %path.display(), count = profiles.len(), "Profile registry loaded");
        Ok(Self {
            path,
            profiles: RwLock::new(profiles),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Look up a profile by national id.
    pub fn lookup(&self, national_id: &NationalId) -> Option<ProfileRecord> {
        self.read().get(national_id).cloned()
    }

    /// All profiles owned by `msisdn`, in no particular order.
    pub fn list_owned_by(&self, msisdn: &str) -> Vec<ProfileRecord> {
        self.read()
            .values()
            .filter(|p| p.owned_by(msisdn))
            .cloned()
            .collect()
    }

    /// Insert a new profile and persist the whole registry.
    ///
    /// Fails with `AlreadyExists` if the national id is taken. If the file
    /// write fails the in-memory table is left as it was.
    pub fn insert(&self, record: ProfileRecord) -> Result<(), RegistryError> {
        let mut profiles = self.write();
        let national_id = record.national_id.clone();
        if profiles.contains_key(&national_id) {
            debug!(national_id = %national_id, "Insert rejected, national id exists");
            return Err(RegistryError::AlreadyExists {
                national_id: national_id.to_string(),
            });
        }

        profiles.insert(national_id.clone(), record);
        if let Err(e) = persist(&self.path, &profiles) {
            profiles.remove(&national_id);
            return Err(e);
        }

        info!(
            national_id = %national_id,
            count = profiles.len(),
            "Profile created"
        );
        Ok(())
    }

    // Flows never panic while holding the lock and insert rolls back on
    // error, so a poisoned table is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<NationalId, ProfileRecord>> {
        self.profiles.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<NationalId, ProfileRecord>> {
        self.profiles.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// Read the profile file. `None` only when the file does not exist; any
/// other read error is returned.
fn load(path: &Path) -> Result<Option<BTreeMap<NationalId, ProfileRecord>>, RegistryError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(RegistryError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let file: ProfileFile =
        serde_json::from_str(&content).map_err(|e| RegistryError::Corrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let mut profiles = BTreeMap::new();
    for (key, record) in file.profiles {
        if key != record.national_id.as_str() {
            return Err(RegistryError::Corrupt {
                path: path.to_path_buf(),
                reason: format!(
                    "profile stored under key {key} has national id {}",
                    record.national_id
                ),
            });
        }
        profiles.insert(record.national_id.clone(), record);
    }
    Ok(Some(profiles))
}

fn persist(
    path: &Path,
    profiles: &BTreeMap<NationalId, ProfileRecord>,
) -> Result<(), RegistryError> {
    let file = ProfileFileRef {
        profiles: profiles.iter().map(|(k, v)| (k.as_str(), v)).collect(),
    };
    let json = serde_json::to_vec_pretty(&file)?;

    let io_err = |source: std::io::Error| RegistryError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    // UUID suffix keeps concurrent processes from sharing a temp file.
    let tmp_path = path.with_extension(format!("tmp.{}", uuid::Uuid::new_v4()));
    let write_tmp = || -> std::io::Result<()> {
        let mut f = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)?;
        f.write_all(&json)?;
        f.sync_all()
    };
    if let Err(e) = write_tmp() {
        let _ = fs::remove_file(&tmp_path);
        return Err(io_err(e));
    }
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(io_err(e));
    }
    debug!(path = %path.display(), count = profiles.len(), "Profiles saved");
    Ok(())
}
