//! Registry distribution channels for published versions

use std::fmt;

/// Channel label a published version is made available under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistTag {
    Alpha,
    Beta,
    Latest,
}

impl DistTag {
    /// The label as passed to the registry client's `--tag` flag
    pub fn as_str(&self) -> &'static str {
        match self {
            DistTag::Alpha => "alpha",
            DistTag::Beta => "beta",
            DistTag::Latest => "latest",
        }
    }
}

impl fmt::Display for DistTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pre-release markers in priority order. The first one found in a version wins.
pub const CHANNEL_MARKERS: &[(&str, DistTag)] =
    &[("alpha", DistTag::Alpha), ("beta", DistTag::Beta)];

/// Resolves the distribution tag for a version string.
///
/// Markers are matched as plain substrings anywhere in the version, so
/// `1.0.0-alpha.2` and `1.0.0alpha` both publish under `alpha`. Versions
/// carrying no marker go to `latest`.
pub fn dist_tag_for_version(version: &str) -> DistTag {
    CHANNEL_MARKERS
        .iter()
        .find(|(marker, _)| version.contains(marker))
        .map(|(_, tag)| *tag)
        .unwrap_or(DistTag::Latest)
}
