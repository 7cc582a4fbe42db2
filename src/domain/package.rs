use std::path::{Path, PathBuf};

use crate::error::{CiError, Result};

/// Directory holding every package of the project
pub const PACKAGES_DIR: &str = "packages";

/// Build output directory inside a package
pub const DIST_DIR: &str = "dist";

/// Maps a scoped package name to its build output directory.
///
/// `@tanker/identity` lives in `packages/identity/dist`. A scope with an
/// empty name maps to `packages/dist`.
///
/// # Returns
/// * `Ok(PathBuf)` - Path relative to the project root
/// * `Err(CiError::MalformedInput)` - If the name is not `@scope/...`
pub fn package_path(package_name: &str) -> Result<PathBuf> {
    let name = package_name
        .strip_prefix('@')
        .and_then(|rest| rest.split_once('/'))
        .filter(|(scope, _)| !scope.is_empty())
        .map(|(_, name)| name)
        .ok_or_else(|| {
            CiError::malformed(format!(
                "package name '{}' is not of the form @scope/name",
                package_name
            ))
        })?;

    let mut path = PathBuf::from(PACKAGES_DIR);
    if !name.is_empty() {
        path.push(name);
    }
    path.push(DIST_DIR);
    Ok(path)
}

/// Resolves where a package is published from.
///
/// An explicit `override_dir` wins over the path derived from the name.
pub fn resolve_package_dir(package_name: &str, override_dir: Option<&Path>) -> Result<PathBuf> {
    match override_dir {
        Some(dir) => Ok(dir.to_path_buf()),
        None => package_path(package_name),
    }
}
