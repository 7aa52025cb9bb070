//! package.json manifest parsing.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::Result;

/// The slice of package.json the workspace manager cares about.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageManifest {
    #[serde(default)]
    pub scripts: BTreeMap<String, String>,

    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,

    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: BTreeMap<String, String>,
}

impl PackageManifest {
    /// Loads the manifest from `dir/package.json`.
    ///
    /// Returns `Ok(None)` when no manifest exists; a repository without
    /// package.json is valid and falls back to build-system detection.
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join("package.json");
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(Some(Self::parse(&content)?))
    }

    /// Parses manifest content.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn has_script(&self, name: &str) -> bool {
        self.scripts.contains_key(name)
    }

    /// Script names suitable for user-facing listings, excluding npm's
    /// implicit pre/post hook scripts.
    pub fn script_names(&self) -> Vec<String> {
        self.scripts
            .keys()
            .filter(|name| !name.starts_with("pre") && !name.starts_with("post"))
            .cloned()
            .collect()
    }

    /// All dependency names (regular and dev) under `scope`, sorted and
    /// deduplicated. `scope` is the bare scope, e.g. `@acme`.
    pub fn scoped_dependencies(&self, scope: &str) -> Vec<String> {
        let prefix = format!("{scope}/");
        let mut names: Vec<String> = self
            .dependencies
            .keys()
            .chain(self.dev_dependencies.keys())
            .filter(|name| name.starts_with(&prefix))
            .cloned()
            .collect();
        names.sort();
        names.dedup();
        names
    }
}
