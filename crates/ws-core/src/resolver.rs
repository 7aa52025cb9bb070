//! Dependency resolution.
//!
//! Turns the workspace's declared and implicit dependency edges into a
//! deterministic build order for one target repository. Pure: no side
//! effects, no I/O.

use std::collections::HashSet;

use crate::config::Workspace;

/// Resolves the transitive dependencies of `target` in build order,
/// excluding the target itself.
///
/// Depth-first post-order: a repository appears only after everything it
/// depends on. At each node the implicit link-rule edges are walked before
/// declared dependencies, declared dependencies in the order written.
/// Names that match no workspace entry are skipped. A visited set makes
/// cycles degrade to "visit once" rather than loop; repeated visits are
/// silently dropped, never reported.
pub fn resolve(ws: &Workspace, target: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut order = Vec::new();
    visit(ws, target, &mut seen, &mut order);
    order.retain(|name| name != target);
    order
}

fn visit(ws: &Workspace, name: &str, seen: &mut HashSet<String>, order: &mut Vec<String>) {
    if !seen.insert(name.to_string()) {
        return;
    }

    // Implicit edge first: a consumer builds after its provider.
    for rule in ws.provider_rules_for(name) {
        if ws.repos.contains_key(&rule.provider) {
            visit(ws, &rule.provider, seen, order);
            push_unique(order, &rule.provider);
        }
    }

    if let Some(def) = ws.repos.get(name) {
        for dep in &def.dependencies {
            if ws.repos.contains_key(dep) {
                visit(ws, dep, seen, order);
                push_unique(order, dep);
            }
        }
    }
}

fn push_unique(order: &mut Vec<String>, name: &str) {
    if !order.iter().any(|existing| existing == name) {
        order.push(name.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LinkRule, RepoDef};
    use pretty_assertions::assert_eq;

    fn repo(deps: &[&str]) -> RepoDef {
        RepoDef {
            path: "unused".into(),
            dependencies: deps.iter().map(|s| s.to_string()).collect(),
            ..RepoDef::default()
        }
    }

    fn rule(provider: &str, consumer: &str) -> LinkRule {
        LinkRule {
            provider: provider.into(),
            consumer: consumer.into(),
            package: format!("@acme/{}", provider.to_lowercase()),
            artifact_dir: "dist".into(),
        }
    }

    fn workspace(repos: &[(&str, RepoDef)], links: Vec<LinkRule>) -> Workspace {
        Workspace {
            repos: repos
                .iter()
                .map(|(name, def)| (name.to_string(), def.clone()))
                .collect(),
            links,
            ..Workspace::default()
        }
    }

    #[test]
    fn no_dependencies_resolves_empty() {
        let ws = workspace(&[("Solo", repo(&[]))], vec![]);
        assert_eq!(resolve(&ws, "Solo"), Vec::<String>::new());
    }

    #[test]
    fn implicit_edge_orders_provider_first() {
        let ws = workspace(
            &[("Model", repo(&[])), ("API", repo(&[]))],
            vec![rule("Model", "API")],
        );
        assert_eq!(resolve(&ws, "API"), vec!["Model".to_string()]);
    }

    #[test]
    fn declared_dependencies_post_order() {
        // X declares [Y, Z], Y declares [Z]: Z lands before Y because
        // Y's recursion resolves Z first, Y is appended after its own
        // dependencies.
        let ws = workspace(
            &[
                ("X", repo(&["Y", "Z"])),
                ("Y", repo(&["Z"])),
                ("Z", repo(&[])),
            ],
            vec![],
        );
        assert_eq!(
            resolve(&ws, "X"),
            vec!["Z".to_string(), "Y".to_string()]
        );
    }

    #[test]
    fn implicit_edge_precedes_declared_edges() {
        let ws = workspace(
            &[
                ("API", repo(&["Lib"])),
                ("Model", repo(&[])),
                ("Lib", repo(&[])),
            ],
            vec![rule("Model", "API")],
        );
        assert_eq!(
            resolve(&ws, "API"),
            vec!["Model".to_string(), "Lib".to_string()]
        );
    }

    #[test]
    fn unresolved_names_are_skipped() {
        let ws = workspace(&[("X", repo(&["Ghost", "Y"])), ("Y", repo(&[]))], vec![]);
        assert_eq!(resolve(&ws, "X"), vec!["Y".to_string()]);
    }

    #[test]
    fn unknown_target_resolves_empty() {
        let ws = workspace(&[("X", repo(&[]))], vec![]);
        assert_eq!(resolve(&ws, "Ghost"), Vec::<String>::new());
    }

    #[test]
    fn cycle_terminates_without_duplicates() {
        let ws = workspace(
            &[("A", repo(&["B"])), ("B", repo(&["A"]))],
            vec![],
        );
        assert_eq!(resolve(&ws, "A"), vec!["B".to_string()]);
        assert_eq!(resolve(&ws, "B"), vec!["A".to_string()]);
    }

    #[test]
    fn self_dependency_is_dropped() {
        let ws = workspace(&[("A", repo(&["A", "B"])), ("B", repo(&[]))], vec![]);
        assert_eq!(resolve(&ws, "A"), vec!["B".to_string()]);
    }

    #[test]
    fn diamond_emits_shared_dependency_once() {
        let ws = workspace(
            &[
                ("Top", repo(&["Left", "Right"])),
                ("Left", repo(&["Base"])),
                ("Right", repo(&["Base"])),
                ("Base", repo(&[])),
            ],
            vec![],
        );
        assert_eq!(
            resolve(&ws, "Top"),
            vec!["Base".to_string(), "Left".to_string(), "Right".to_string()]
        );
    }

    #[test]
    fn transitive_implicit_edges() {
        // API's provider itself declares a dependency; the full chain
        // resolves in build order.
        let ws = workspace(
            &[
                ("API", repo(&[])),
                ("Model", repo(&["Schema"])),
                ("Schema", repo(&[])),
            ],
            vec![rule("Model", "API")],
        );
        assert_eq!(
            resolve(&ws, "API"),
            vec!["Schema".to_string(), "Model".to_string()]
        );
    }
}
