use regex::{Regex, RegexBuilder};

use crate::error::{CiError, Result};

/// Prefix every release tag must carry
pub const TAG_PREFIX: &str = "v";

/// Compiled version syntax, as configured in `tbump.toml`
#[derive(Debug, Clone)]
pub struct VersionPattern {
    source: String,
    regex: Regex,
}

impl VersionPattern {
    /// Compile a version pattern.
    ///
    /// Whitespace and `#` comments in the pattern are ignored, so the
    /// multi-line patterns found in `tbump.toml` compile unchanged. Matching
    /// is anchored at the start of the candidate.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = RegexBuilder::new(&format!("\\A(?:{}\n)", pattern))
            .ignore_whitespace(true)
            .build()
            .map_err(|e| CiError::config(format!("Invalid version regex: {}", e)))?;

        Ok(VersionPattern {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Whether `version` is valid version syntax
    pub fn matches(&self, version: &str) -> bool {
        self.regex.is_match(version)
    }

    /// The pattern as written in configuration
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// Derives the release version from a git tag.
///
/// # Arguments
/// * `git_tag` - Tag that triggered the release (e.g., "v1.2.3")
/// * `pattern` - Configured version syntax
///
/// # Returns
/// * `Ok(String)` - The tag without its prefix (e.g., "1.2.3")
/// * `Err(CiError::MalformedInput)` - If the prefix is missing or the
///   remainder is not a valid version
pub fn version_from_git_tag(git_tag: &str, pattern: &VersionPattern) -> Result<String> {
    let version = git_tag.strip_prefix(TAG_PREFIX).ok_or_else(|| {
        CiError::malformed(format!(
            "tag '{}' should start with '{}'",
            git_tag, TAG_PREFIX
        ))
    })?;

    if !pattern.matches(version) {
        return Err(CiError::malformed(format!(
            "could not parse '{}' as a valid tag",
            git_tag
        )));
    }

    log::debug!("tag {} resolved to version {}", git_tag, version);
    Ok(version.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict() -> VersionPattern {
        VersionPattern::new(r"^\d+\.\d+\.\d+$").unwrap()
    }

    #[test]
    fn test_version_from_tag() {
        assert_eq!(version_from_git_tag("v1.2.3", &strict()).unwrap(), "1.2.3");
    }

    #[test]
    fn test_missing_prefix_is_malformed() {
        let err = version_from_git_tag("1.2.3", &strict()).unwrap_err();
        assert!(matches!(err, CiError::MalformedInput(_)));
        assert!(err.to_string().contains("should start with 'v'"));
    }

    #[test]
    fn test_uppercase_prefix_is_malformed() {
        let err = version_from_git_tag("V1.2.3", &strict()).unwrap_err();
        assert!(matches!(err, CiError::MalformedInput(_)));
    }

    #[test]
    fn test_non_numeric_version_is_malformed() {
        let err = version_from_git_tag("vX.Y.Z", &strict()).unwrap_err();
        assert!(matches!(err, CiError::MalformedInput(_)));
        assert!(err.to_string().contains("vX.Y.Z"));
    }

    #[test]
    fn test_bare_prefix_is_malformed() {
        assert!(version_from_git_tag("v", &strict()).is_err());
    }

    #[test]
    fn test_verbose_multiline_pattern() {
        let pattern = VersionPattern::new(
            r"
            (?P<major>\d+)
            \.
            (?P<minor>\d+)
            \.
            (?P<patch>\d+)
            (
              -
              (?P<channel>alpha|beta)
              (?P<release>\d+)?
            )?
            ",
        )
        .unwrap();

        assert_eq!(
            version_from_git_tag("v2.0.0-beta", &pattern).unwrap(),
            "2.0.0-beta"
        );
        assert_eq!(
            version_from_git_tag("v2.0.0-alpha3", &pattern).unwrap(),
            "2.0.0-alpha3"
        );
        assert!(version_from_git_tag("vnext", &pattern).is_err());
    }

    #[test]
    fn test_match_is_anchored_at_start() {
        let pattern = VersionPattern::new(r"\d+\.\d+\.\d+").unwrap();
        assert!(pattern.matches("1.2.3"));
        assert!(!pattern.matches("release-1.2.3"));
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let err = VersionPattern::new(r"(\d+").unwrap_err();
        assert!(matches!(err, CiError::Config(_)));
    }

    #[test]
    fn test_pattern_keeps_source() {
        assert_eq!(strict().as_str(), r"^\d+\.\d+\.\d+$");
    }
}
