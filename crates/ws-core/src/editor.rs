//! Editor workspace file generation.
//!
//! Keeps a `<root>.code-workspace` file at the workspace root listing
//! every cloned repository, so the whole workspace opens as one editor
//! window. Regeneration only rewrites the folder list; user settings in
//! the file survive.

use std::path::{Path, PathBuf};

use serde_json::{Value, json};

use crate::config::Workspace;
use crate::Result;

/// Path of the editor workspace file for a root directory, named after
/// the directory itself.
pub fn workspace_file_path(root: &Path) -> PathBuf {
    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "workspace".to_string());
    root.join(format!("{name}.code-workspace"))
}

/// Writes the editor workspace file.
///
/// Folders are the cloned checkouts in name order; repositories without a
/// local directory are left out until they appear. Any other top-level
/// keys already in the file (settings, extensions) are preserved.
pub fn generate(root: &Path, ws: &Workspace) -> Result<PathBuf> {
    let path = workspace_file_path(root);

    let mut doc = match std::fs::read_to_string(&path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|_| json!({})),
        Err(_) => json!({}),
    };

    let folders: Vec<Value> = ws
        .repos
        .values()
        .filter(|def| ws.repo_dir(root, def).is_dir())
        .map(|def| json!({ "path": def.path }))
        .collect();

    if let Value::Object(map) = &mut doc {
        map.insert("folders".to_string(), Value::Array(folders));
        if !map.contains_key("settings") {
            map.insert("settings".to_string(), json!({}));
        }
    }

    std::fs::write(&path, format!("{}\n", serde_json::to_string_pretty(&doc)?))?;
    Ok(path)
}
