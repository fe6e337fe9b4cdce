//! Burst ahead-of-time compilation settings.
//!
//! Unity keeps one `BurstAotSettings_<platform>.json` per build target under
//! `ProjectSettings/`. CI jobs that must build without Burst flip
//! `MonoBehaviour.EnableBurstCompilation` in each of them. Files that do not
//! exist yet are created with the minimal content Unity accepts.

use crate::config::BurstConfig;
use crate::core::error::{Error, Result};
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};

/// Settings schema version written into new files.
pub const SETTINGS_VERSION: u64 = 3;

const ROOT_KEY: &str = "MonoBehaviour";
const ENABLE_KEY: &str = "EnableBurstCompilation";

/// Returns the settings file for `platform` inside `project`.
#[must_use]
pub fn settings_path(project: &Path, settings: &BurstConfig, platform: &str) -> PathBuf {
    project
        .join(&settings.settings_dir)
        .join(format!("BurstAotSettings_{platform}.json"))
}

/// Sets Burst compilation to `enabled` for every configured platform.
///
/// Returns the files that were written.
pub fn set_burst_compilation(
    project: &Path,
    settings: &BurstConfig,
    enabled: bool,
) -> Result<Vec<PathBuf>> {
    let dir = project.join(&settings.settings_dir);
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| Error::io("create settings dir", e))?;
    }

    let mut written = Vec::with_capacity(settings.platforms.len());
    for platform in &settings.platforms {
        let path = settings_path(project, settings, platform);
        write_setting(&path, enabled)?;
        tracing::debug!(path = %path.display(), enabled, "Updated Burst AOT settings");
        written.push(path);
    }

    Ok(written)
}

fn write_setting(path: &Path, enabled: bool) -> Result<()> {
    let mut value = if path.exists() {
        read_settings(path)?
    } else {
        json!({ ROOT_KEY: { "Version": SETTINGS_VERSION } })
    };

    let Some(object) = value.as_object_mut() else {
        return Err(Error::burst(path, "expected a JSON object at the top level"));
    };

    let root = object
        .entry(ROOT_KEY)
        .or_insert_with(|| Value::Object(Map::new()));
    let Some(root) = root.as_object_mut() else {
        return Err(Error::burst(path, format!("'{ROOT_KEY}' is not an object")));
    };
    root.insert(ENABLE_KEY.to_string(), Value::Bool(enabled));

    let mut content = serde_json::to_string_pretty(&value).map_err(|e| Error::Internal {
        message: format!("Failed to serialize Burst settings: {e}"),
    })?;
    content.push('\n');

    std::fs::write(path, content).map_err(|e| Error::io("write Burst settings", e))
}

fn read_settings(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io("read Burst settings", e))?;
    serde_json::from_str(&content).map_err(|e| Error::burst(path, e.to_string()))
}
