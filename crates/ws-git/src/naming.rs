//! Remote URL helpers.

/// Builds a git SSH URL from an `org/repo` shorthand.
///
/// Strings that already look like a remote (`git@...`, `https://...`, a
/// `file://` URL, or an absolute path) pass through unchanged.
pub fn build_remote_url(org_repo: &str) -> String {
    if org_repo.starts_with("git@")
        || org_repo.starts_with("https://")
        || org_repo.starts_with("file://")
        || org_repo.starts_with('/')
    {
        return org_repo.to_string();
    }
    format!("git@github.com:{org_repo}.git")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorthand_becomes_ssh_url() {
        assert_eq!(
            build_remote_url("acme/widget-api"),
            "git@github.com:acme/widget-api.git"
        );
    }

    #[test]
    fn existing_remotes_pass_through() {
        assert_eq!(
            build_remote_url("git@github.com:acme/widget.git"),
            "git@github.com:acme/widget.git"
        );
        assert_eq!(
            build_remote_url("https://github.com/acme/widget.git"),
            "https://github.com/acme/widget.git"
        );
        assert_eq!(
            build_remote_url("/srv/git/widget.git"),
            "/srv/git/widget.git"
        );
    }

}
