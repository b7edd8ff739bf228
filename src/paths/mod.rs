#![warn(clippy::all, clippy::pedantic)]

use std::{env, fs, path::PathBuf};

use log::debug;

use crate::error::JrpError;

/// File name of the WordNet Japan lexicon, matching the canonical
/// distribution archive.
pub const WNJ_DB_FILE: &str = "wnjpn.db";

/// File name of the phrase history database.
pub const JRP_DB_FILE: &str = "jrp.db";

/// Environment variable overriding the lexicon directory.
pub const WNJ_DIR_ENV: &str = "JRP_WNJ_DIR";

/// Environment variable overriding the history directory.
pub const JRP_DIR_ENV: &str = "JRP_DB_DIR";

/// Resolve the directory holding the WordNet Japan database, creating it if
/// missing.
///
/// # Errors
///
/// Returns [`JrpError::PathResolve`] if no per-user directory can be
/// determined or the directory cannot be created.
pub fn wnj_db_dir() -> Result<PathBuf, JrpError> {
    resolve_dir(WNJ_DIR_ENV)
}

/// Resolve the directory holding the phrase history database, creating it if
/// missing.
///
/// # Errors
///
/// Returns [`JrpError::PathResolve`] if no per-user directory can be
/// determined or the directory cannot be created.
pub fn jrp_db_dir() -> Result<PathBuf, JrpError> {
    resolve_dir(JRP_DIR_ENV)
}

/// Absolute path of the WordNet Japan database file.
///
/// # Errors
///
/// Propagates directory resolution failures from [`wnj_db_dir`].
pub fn wnj_db_path() -> Result<PathBuf, JrpError> {
    Ok(wnj_db_dir()?.join(WNJ_DB_FILE))
}

/// Absolute path of the phrase history database file.
///
/// # Errors
///
/// Propagates directory resolution failures from [`jrp_db_dir`].
pub fn jrp_db_path() -> Result<PathBuf, JrpError> {
    Ok(jrp_db_dir()?.join(JRP_DB_FILE))
}

fn resolve_dir(env_var: &str) -> Result<PathBuf, JrpError> {
    // Explicit override first, then the platform config directory. `dirs`
    // honors XDG_CONFIG_HOME and its platform equivalents.
    let dir = match env::var_os(env_var) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::config_dir()
            .ok_or_else(|| JrpError::PathResolve("no user config directory".to_string()))?
            .join("jrp"),
    };

    fs::create_dir_all(&dir)
        .map_err(|e| JrpError::PathResolve(format!("cannot create {}: {e}", dir.display())))?;
    debug!("resolved application directory: {}", dir.display());
    Ok(dir)
}
