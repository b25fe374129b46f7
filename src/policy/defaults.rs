//! Built-in policy defaults.

/// Credential locations under the home directory that sandboxed commands may
/// never read.
pub const DEFAULT_DENY_READ: &[&str] = &[
    ".ssh",
    ".gnupg",
    ".aws/credentials",
    ".config/gcloud",
    ".npmrc",
    ".env",
];

/// Package registries, source-control hosts and AI provider APIs.
pub const DEFAULT_ALLOWED_DOMAINS: &[&str] = &[
    // Package registries
    "registry.npmjs.org",
    "*.npmjs.org",
    "registry.yarnpkg.com",
    "pypi.org",
    "*.pypi.org",
    "crates.io",
    "*.crates.io",
    // Source control
    "github.com",
    "*.github.com",
    "gitlab.com",
    "*.gitlab.com",
    "bitbucket.org",
    "*.bitbucket.org",
    // AI providers
    "api.openai.com",
    "api.anthropic.com",
    "generativelanguage.googleapis.com",
    "*.googleapis.com",
];

/// Write roots so broad that allowing them would effectively disable the
/// sandbox. `/tmp` is not one of them.
pub const UNSAFE_WRITE_ROOTS: &[&str] = &["/", "/home", "/usr", "/etc", "/var", "/opt"];

/// Default allowed domains as owned strings.
pub fn default_allowed_domains() -> Vec<String> {
    DEFAULT_ALLOWED_DOMAINS.iter().map(|d| d.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allowlist_contains_key_domains() {
        let list = default_allowed_domains();
        assert!(list.contains(&"crates.io".to_string()));
        assert!(list.contains(&"github.com".to_string()));
        assert!(list.contains(&"api.anthropic.com".to_string()));
        assert!(list.contains(&"registry.npmjs.org".to_string()));
    }

    #[test]
    fn test_tmp_is_not_an_unsafe_root() {
        assert!(!UNSAFE_WRITE_ROOTS.contains(&"/tmp"));
    }

    #[test]
    fn test_deny_read_entries_are_relative() {
        assert!(DEFAULT_DENY_READ.iter().all(|p| !p.starts_with('/')));
    }
}
