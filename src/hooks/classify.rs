//! Post-execution output classification.
//!
//! Sandbox denials only show up as text in a command's output, so this is a
//! substring heuristic over the wording of the sandbox runtime. The wording
//! lives here and nowhere else.

use std::fmt;

use regex::Regex;

/// Diagnostics the sandbox runtime prints on every run. Harmless.
pub const BENIGN_PATTERNS: &[&str] = &[r"bwrap: loopback: [^\n]*\n?"];

/// Substrings that mean the sandbox stopped something.
pub const BLOCK_INDICATORS: &[&str] = &[
    "Operation not permitted",
    "Permission denied",
    "Connection blocked by network allowlist",
];

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("Invalid output pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// What the output says about the sandbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The sandbox denied something the command tried to do.
    Blocked,
    /// Only benign sandbox diagnostics, which were stripped.
    Noise,
    /// Nothing sandbox-related.
    Clean,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blocked => write!(f, "blocked"),
            Self::Noise => write!(f, "warning-noise"),
            Self::Clean => write!(f, "clean"),
        }
    }
}

/// Result of classifying one output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub verdict: Verdict,
    /// Output with benign diagnostics removed and surrounding whitespace
    /// trimmed. Equal to the input when the verdict is `Clean`.
    pub cleaned: String,
}

/// Classifies command output.
#[derive(Debug, Clone)]
pub struct OutputClassifier {
    benign: Vec<Regex>,
    indicators: Vec<String>,
}

impl OutputClassifier {
    pub fn new<P, I>(benign_patterns: P, block_indicators: I) -> Result<Self, ClassifierError>
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let benign = benign_patterns
            .into_iter()
            .map(|p| {
                Regex::new(p.as_ref()).map_err(|source| ClassifierError::InvalidPattern {
                    pattern: p.as_ref().to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            benign,
            indicators: block_indicators.into_iter().map(Into::into).collect(),
        })
    }

    /// Remove benign diagnostics. Returns `None` if there were none.
    pub fn strip_benign(&self, text: &str) -> Option<String> {
        let mut stripped: Option<String> = None;
        for re in &self.benign {
            let current = stripped.as_deref().unwrap_or(text);
            if re.is_match(current) {
                stripped = Some(re.replace_all(current, "").into_owned());
            }
        }
        stripped
    }

    pub fn classify(&self, text: &str) -> Classification {
        let stripped = self.strip_benign(text);
        let had_noise = stripped.is_some();
        let cleaned = match stripped {
            Some(s) => s.trim().to_string(),
            None => text.to_string(),
        };

        let verdict = if self.indicators.iter().any(|i| cleaned.contains(i.as_str())) {
            Verdict::Blocked
        } else if had_noise {
            Verdict::Noise
        } else {
            Verdict::Clean
        };

        Classification { verdict, cleaned }
    }
}

impl Default for OutputClassifier {
    fn default() -> Self {
        Self::new(BENIGN_PATTERNS, BLOCK_INDICATORS.iter().copied())
            .expect("valid built-in output patterns")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_is_blocked() {
        let c = OutputClassifier::default().classify("cat: /etc/shadow: Permission denied");
        assert_eq!(c.verdict, Verdict::Blocked);
    }

    #[test]
    fn test_operation_not_permitted_is_blocked() {
        let c = OutputClassifier::default()
            .classify("touch: cannot touch '/usr/x': Operation not permitted");
        assert_eq!(c.verdict, Verdict::Blocked);
    }

    #[test]
    fn test_network_allowlist_is_blocked() {
        let c = OutputClassifier::default()
            .classify("curl: (56) Connection blocked by network allowlist");
        assert_eq!(c.verdict, Verdict::Blocked);
    }

    #[test]
    fn test_plain_output_is_clean_and_unchanged() {
        let c = OutputClassifier::default().classify("file1.txt\nfile2.txt");
        assert_eq!(c.verdict, Verdict::Clean);
        assert_eq!(c.cleaned, "file1.txt\nfile2.txt");
    }

    #[test]
    fn test_clean_output_keeps_trailing_newline() {
        let c = OutputClassifier::default().classify("done\n");
        assert_eq!(c.cleaned, "done\n");
    }

    #[test]
    fn test_loopback_warning_is_noise() {
        let c = OutputClassifier::default().classify(
            "bwrap: loopback: Failed RTM_NEWADDR: Operation not permitted\nfile1.txt\n",
        );
        assert_eq!(c.verdict, Verdict::Noise);
        assert_eq!(c.cleaned, "file1.txt");
    }

    #[test]
    fn test_noise_does_not_hide_real_denial() {
        let c = OutputClassifier::default().classify(
            "bwrap: loopback: Failed RTM_NEWADDR: Operation not permitted\ncat: x: Permission denied",
        );
        assert_eq!(c.verdict, Verdict::Blocked);
        assert_eq!(c.cleaned, "cat: x: Permission denied");
    }

    #[test]
    fn test_empty_output_is_clean() {
        let c = OutputClassifier::default().classify("");
        assert_eq!(c.verdict, Verdict::Clean);
        assert!(c.cleaned.is_empty());
    }

    #[test]
    fn test_custom_indicators() {
        let classifier =
            OutputClassifier::new([r"^sandbox-debug:.*\n?"], ["denied by policy"]).unwrap();
        assert_eq!(
            classifier.classify("write denied by policy").verdict,
            Verdict::Blocked
        );
        assert_eq!(
            classifier.classify("Permission denied").verdict,
            Verdict::Clean
        );
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let err = OutputClassifier::new(["(unclosed"], BLOCK_INDICATORS.iter().copied())
            .unwrap_err();
        assert!(err.to_string().contains("(unclosed"));
    }

    #[test]
    fn test_verdict_display() {
        assert_eq!(Verdict::Blocked.to_string(), "blocked");
        assert_eq!(Verdict::Noise.to_string(), "warning-noise");
        assert_eq!(Verdict::Clean.to_string(), "clean");
    }
}
