//! Workspace configuration model.
//!
//! A workspace is a directory holding repository checkouts plus a
//! `workspace.toml` describing them. Configuration is loaded once per run
//! and passed by reference into the engines; nothing here mutates it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Workspace configuration file name, looked up from the current
/// directory upward.
pub const CONFIG_FILE: &str = "workspace.toml";

fn default_artifact_dir() -> String {
    "dist".to_string()
}

/// One managed repository.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepoDef {
    /// Checkout path relative to the workspace root.
    pub path: String,

    /// Remote to clone from when the checkout is missing: an `org/repo`
    /// shorthand or a full URL. Without one, a missing checkout is just
    /// skipped.
    #[serde(default)]
    pub remote: Option<String>,

    /// Per-repo default branch, overriding the workspace default.
    #[serde(default)]
    pub default_branch: Option<String>,

    /// Declared dependency repo names, in build order as written.
    /// Names that match no workspace entry are ignored.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// A declarative implicit dependency edge plus its link-state subject.
///
/// The provider's build output (under `artifact_dir`) is what the consumer
/// would otherwise install as `package`. A rule implies provider-before-
/// consumer build ordering and drives link reconciliation around builds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkRule {
    /// Repo that produces the package.
    pub provider: String,

    /// Repo that consumes it.
    pub consumer: String,

    /// Published package name the consumer declares.
    pub package: String,

    /// Build output directory inside the provider holding the linkable
    /// package.
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: String,
}

/// The parsed workspace configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Workspace {
    /// Managed repositories keyed by unique name. BTreeMap keys give the
    /// name-sorted iteration order the sync contract requires.
    #[serde(default)]
    pub repos: BTreeMap<String, RepoDef>,

    /// Implicit dependency / link rules, in declaration order.
    #[serde(default)]
    pub links: Vec<LinkRule>,

    /// Workspace-wide default branch for sync targets.
    #[serde(default)]
    pub default_branch: Option<String>,

    /// Cloud profile used for parameter retrieval.
    #[serde(default)]
    pub aws_profile: Option<String>,

    /// Cloud region for parameter retrieval.
    #[serde(default)]
    pub aws_region: Option<String>,

    /// Default parameter-store environment (e.g. "beta").
    #[serde(default)]
    pub param_env: Option<String>,

    /// The organization's own package scope (e.g. "@acme"), used by the
    /// update step.
    #[serde(default)]
    pub package_scope: Option<String>,

    /// Environment variable name → parameter-store suffix, for env
    /// refresh.
    #[serde(default)]
    pub params: BTreeMap<String, String>,

    /// Extra environment variables injected into every child process.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl Workspace {
    /// Walks upward from `start` looking for [`CONFIG_FILE`].
    pub fn find(start: &Path) -> Result<PathBuf> {
        let mut dir = start;
        loop {
            if dir.join(CONFIG_FILE).is_file() {
                return Ok(dir.to_path_buf());
            }
            match dir.parent() {
                Some(parent) => dir = parent,
                None => {
                    return Err(Error::WorkspaceNotFound {
                        start: start.to_path_buf(),
                    });
                }
            }
        }
    }

    /// Loads the configuration from a workspace root.
    pub fn load(root: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(root.join(CONFIG_FILE))?;
        Self::parse(&content)
    }

    /// Parses configuration content.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Looks up a repository, failing with a configuration error.
    pub fn repo(&self, name: &str) -> Result<&RepoDef> {
        self.repos.get(name).ok_or_else(|| Error::RepoNotFound {
            name: name.to_string(),
        })
    }

    /// Absolute checkout directory for a repository definition.
    pub fn repo_dir(&self, root: &Path, def: &RepoDef) -> PathBuf {
        root.join(&def.path)
    }

    /// Link rules where `name` is the consumer, in declaration order.
    pub fn provider_rules_for(&self, name: &str) -> impl Iterator<Item = &LinkRule> {
        self.links.iter().filter(move |rule| rule.consumer == name)
    }

    /// Link rules where `name` is the provider, in declaration order.
    pub fn consumer_rules_for(&self, name: &str) -> impl Iterator<Item = &LinkRule> {
        self.links.iter().filter(move |rule| rule.provider == name)
    }

    /// Whether `name` provides a linkable package to anyone.
    pub fn is_provider(&self, name: &str) -> bool {
        self.links.iter().any(|rule| rule.provider == name)
    }

    /// Finds the repository whose checkout contains `dir`.
    ///
    /// Both sides are canonicalized so symlinked working directories
    /// still resolve.
    pub fn repo_containing(&self, root: &Path, dir: &Path) -> Result<String> {
        let dir = dir.canonicalize()?;
        for (name, def) in &self.repos {
            let repo_dir = self.repo_dir(root, def);
            let Ok(repo_dir) = repo_dir.canonicalize() else {
                continue;
            };
            if dir.starts_with(&repo_dir) {
                return Ok(name.clone());
            }
        }
        Err(Error::NotInRepo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
default_branch = "main"
aws_profile = "acme-dev"
aws_region = "us-east-1"
param_env = "beta"
package_scope = "@acme"

[params]
GOOGLE_MAPS_KEY = "googleMapsKey"

[env]
NODE_OPTIONS = "--max-old-space-size=4096"

[repos.WidgetModel]
path = "WidgetModel"
remote = "acme/widget-model"

[repos.WidgetAPI]
path = "WidgetAPI"
dependencies = ["CommonLib", "NotARepo"]

[repos.CommonLib]
path = "libs/common"
default_branch = "prod"

[[links]]
provider = "WidgetModel"
consumer = "WidgetAPI"
package = "@acme/widget-sdk"
artifact_dir = "build/sdk"
"#;

    #[test]
    fn parses_full_config() {
        let ws = Workspace::parse(SAMPLE).unwrap();
        assert_eq!(ws.repos.len(), 3);
        assert_eq!(ws.default_branch.as_deref(), Some("main"));
        assert_eq!(ws.package_scope.as_deref(), Some("@acme"));
        assert_eq!(ws.repos["CommonLib"].default_branch.as_deref(), Some("prod"));
        assert_eq!(
            ws.repos["WidgetModel"].remote.as_deref(),
            Some("acme/widget-model")
        );
        assert_eq!(ws.repos["CommonLib"].remote, None);
        assert_eq!(
            ws.repos["WidgetAPI"].dependencies,
            vec!["CommonLib".to_string(), "NotARepo".to_string()]
        );
        assert_eq!(ws.links.len(), 1);
        assert_eq!(ws.links[0].artifact_dir, "build/sdk");
        assert_eq!(ws.params["GOOGLE_MAPS_KEY"], "googleMapsKey");
    }

    #[test]
    fn artifact_dir_defaults_to_dist() {
        let ws = Workspace::parse(
            r#"
[repos.A]
path = "A"

[repos.B]
path = "B"

[[links]]
provider = "A"
consumer = "B"
package = "@acme/a"
"#,
        )
        .unwrap();
        assert_eq!(ws.links[0].artifact_dir, "dist");
    }

    #[test]
    fn empty_config_parses() {
        let ws = Workspace::parse("").unwrap();
        assert!(ws.repos.is_empty());
        assert!(ws.links.is_empty());
    }

    #[test]
    fn repos_iterate_name_sorted() {
        let ws = Workspace::parse(SAMPLE).unwrap();
        let names: Vec<&String> = ws.repos.keys().collect();
        assert_eq!(names, vec!["CommonLib", "WidgetAPI", "WidgetModel"]);
    }

    #[test]
    fn repo_lookup_unknown_name_fails() {
        let ws = Workspace::parse(SAMPLE).unwrap();
        assert!(matches!(
            ws.repo("Nope"),
            Err(Error::RepoNotFound { name }) if name == "Nope"
        ));
    }

    #[test]
    fn rule_queries() {
        let ws = Workspace::parse(SAMPLE).unwrap();
        assert!(ws.is_provider("WidgetModel"));
        assert!(!ws.is_provider("WidgetAPI"));

        let providers: Vec<&str> = ws
            .provider_rules_for("WidgetAPI")
            .map(|r| r.provider.as_str())
            .collect();
        assert_eq!(providers, vec!["WidgetModel"]);

        let consumers: Vec<&str> = ws
            .consumer_rules_for("WidgetModel")
            .map(|r| r.consumer.as_str())
            .collect();
        assert_eq!(consumers, vec!["WidgetAPI"]);
    }

    #[test]
    fn find_walks_upward() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(CONFIG_FILE), "").unwrap();
        let nested = temp.path().join("WidgetAPI/src/deep");
        std::fs::create_dir_all(&nested).unwrap();

        let found = Workspace::find(&nested).unwrap();
        assert_eq!(found, temp.path());
    }

    #[test]
    fn find_fails_outside_workspace() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            Workspace::find(temp.path()),
            Err(Error::WorkspaceNotFound { .. })
        ));
    }

    #[test]
    fn repo_containing_resolves_nested_dirs() {
        let temp = TempDir::new().unwrap();
        let ws = Workspace::parse(SAMPLE).unwrap();
        let nested = temp.path().join("libs/common/src");
        std::fs::create_dir_all(&nested).unwrap();

        let name = ws.repo_containing(temp.path(), &nested).unwrap();
        assert_eq!(name, "CommonLib");
    }

    #[test]
    fn repo_containing_outside_any_repo() {
        let temp = TempDir::new().unwrap();
        let ws = Workspace::parse(SAMPLE).unwrap();
        assert!(matches!(
            ws.repo_containing(temp.path(), temp.path()),
            Err(Error::NotInRepo)
        ));
    }
}
