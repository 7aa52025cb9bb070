//! The workspace `.env` file.
//!
//! A flat KEY=VALUE file at the workspace root, shared by every repo.
//! Read into the process overlay before launching children and rewritten
//! wholesale by the parameter refresh step.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::Result;

/// File name of the shared environment file.
pub const ENV_FILE: &str = ".env";

/// Path of the shared environment file for a workspace root.
pub fn global_env_path(root: &Path) -> PathBuf {
    root.join(ENV_FILE)
}

/// Reads the shared environment file. A missing file is an empty map.
///
/// Blank lines and `#` comments are skipped; everything after the first
/// `=` belongs to the value, including further `=` signs.
pub fn read_global_env(root: &Path) -> Result<BTreeMap<String, String>> {
    let path = global_env_path(root);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(err) => return Err(err.into()),
    };

    let mut vars = BTreeMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            vars.insert(key.trim().to_string(), value.to_string());
        }
    }
    Ok(vars)
}

/// Writes the shared environment file, replacing its previous content.
/// Keys come out sorted, so refreshes produce stable diffs.
pub fn write_global_env(root: &Path, vars: &BTreeMap<String, String>) -> Result<()> {
    let mut content = String::new();
    for (key, value) in vars {
        content.push_str(key);
        content.push('=');
        content.push_str(value);
        content.push('\n');
    }
    std::fs::write(global_env_path(root), content)?;
    Ok(())
}
