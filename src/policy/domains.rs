//! Domain pattern matching for network policies.
//!
//! Supports exact matches and `*.`-prefixed wildcard patterns. The sandbox
//! backend does the real enforcement; this is what operators use to preview
//! how a resolved policy treats a host.

use std::fmt;

/// Pattern for matching domains.
#[derive(Debug, Clone)]
pub struct DomainPattern {
    /// The pattern as written (e.g., "api.example.com" or "*.example.com").
    pattern: String,
    is_wildcard: bool,
    /// Lowercased domain, without the `*.` prefix.
    base_domain: String,
}

impl DomainPattern {
    pub fn new(pattern: &str) -> Self {
        let is_wildcard = pattern.starts_with("*.");
        let base_domain = if is_wildcard {
            pattern[2..].to_lowercase()
        } else {
            pattern.to_lowercase()
        };

        Self {
            pattern: pattern.to_string(),
            is_wildcard,
            base_domain,
        }
    }

    /// Check if a host matches this pattern.
    pub fn matches(&self, host: &str) -> bool {
        let host_lower = host.trim_end_matches('.').to_lowercase();

        if self.is_wildcard {
            // *.example.com matches foo.example.com, bar.baz.example.com, example.com
            host_lower == self.base_domain
                || host_lower.ends_with(&format!(".{}", self.base_domain))
        } else {
            host_lower == self.base_domain
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl fmt::Display for DomainPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pattern)
    }
}

/// Outcome of checking a host against a network policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostDecision {
    /// Matched an allowed pattern.
    Allowed { pattern: String },
    /// Matched a denied pattern. Denials win over allowances.
    Denied { pattern: String },
    /// Matched nothing; the sandbox blocks it.
    NotListed,
}

impl HostDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, HostDecision::Allowed { .. })
    }
}

impl fmt::Display for HostDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allowed { pattern } => write!(f, "allowed (matches {pattern})"),
            Self::Denied { pattern } => write!(f, "denied (matches {pattern})"),
            Self::NotListed => write!(f, "blocked (not in allowedDomains)"),
        }
    }
}

/// Allowed and denied pattern lists compiled for matching.
#[derive(Debug, Clone, Default)]
pub struct DomainRules {
    allowed: Vec<DomainPattern>,
    denied: Vec<DomainPattern>,
}

impl DomainRules {
    pub fn new(allowed: &[String], denied: &[String]) -> Self {
        Self {
            allowed: allowed.iter().map(|d| DomainPattern::new(d)).collect(),
            denied: denied.iter().map(|d| DomainPattern::new(d)).collect(),
        }
    }

    pub fn decide(&self, host: &str) -> HostDecision {
        if let Some(p) = self.denied.iter().find(|p| p.matches(host)) {
            return HostDecision::Denied {
                pattern: p.pattern().to_string(),
            };
        }
        if let Some(p) = self.allowed.iter().find(|p| p.matches(host)) {
            return HostDecision::Allowed {
                pattern: p.pattern().to_string(),
            };
        }
        HostDecision::NotListed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        let pattern = DomainPattern::new("api.example.com");
        assert!(pattern.matches("api.example.com"));
        assert!(pattern.matches("API.EXAMPLE.COM"));
        assert!(!pattern.matches("foo.api.example.com"));
        assert!(!pattern.matches("example.com"));
    }

    #[test]
    fn test_wildcard_match() {
        let pattern = DomainPattern::new("*.example.com");
        assert!(pattern.matches("api.example.com"));
        assert!(pattern.matches("foo.bar.example.com"));
        assert!(pattern.matches("example.com"));
        assert!(!pattern.matches("exampleXcom"));
        assert!(!pattern.matches("badexample.com"));
    }

    #[test]
    fn test_trailing_dot_is_ignored() {
        assert!(DomainPattern::new("crates.io").matches("crates.io."));
    }

    #[test]
    fn test_denied_wins_over_allowed() {
        let rules = DomainRules::new(
            &["*.github.com".to_string()],
            &["gist.github.com".to_string()],
        );
        assert!(rules.decide("api.github.com").is_allowed());
        assert_eq!(
            rules.decide("gist.github.com"),
            HostDecision::Denied {
                pattern: "gist.github.com".to_string()
            }
        );
    }

    #[test]
    fn test_unlisted_host() {
        let rules = DomainRules::new(&["crates.io".to_string()], &[]);
        assert_eq!(rules.decide("evil.com"), HostDecision::NotListed);
        assert!(!rules.decide("evil.com").is_allowed());
    }

    #[test]
    fn test_empty_rules_block_everything() {
        let rules = DomainRules::default();
        assert_eq!(rules.decide("anything.com"), HostDecision::NotListed);
    }
}
