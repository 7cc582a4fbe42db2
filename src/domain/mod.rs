//! Domain logic - pure release rules independent of external tools

pub mod channel;
pub mod package;
pub mod tag;

pub use channel::{dist_tag_for_version, DistTag, CHANNEL_MARKERS};
pub use package::{package_path, resolve_package_dir};
pub use tag::{version_from_git_tag, VersionPattern, TAG_PREFIX};
