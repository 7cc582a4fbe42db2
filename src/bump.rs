//! Rewrites version strings into project files.
//!
//! Follows the `tbump.toml` conventions: each `[[file]]` entry names a
//! source file and a search template, and `[version] current` is updated
//! together with them.

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{FileEntry, TbumpConfig};
use crate::error::{CiError, Result};

const CURRENT_VERSION_PLACEHOLDER: &str = "{current_version}";

/// A pending rewrite of one file
#[derive(Debug, Clone, PartialEq)]
pub struct FileChange {
    pub path: PathBuf,
    pub search: String,
    pub replace: String,
    pub occurrences: usize,
}

fn render(entry: &FileEntry, version: &str) -> String {
    entry
        .search
        .as_deref()
        .unwrap_or(CURRENT_VERSION_PLACEHOLDER)
        .replace(CURRENT_VERSION_PLACEHOLDER, version)
}

/// Computes the rewrites needed to move from the current to `new_version`.
///
/// Reads every configured file without writing anything.
///
/// # Returns
/// * `Ok(Vec<FileChange>)` - One change per `[[file]]` entry
/// * `Err(CiError::Bump)` - If a file does not contain its search string
pub fn plan_bump(root: &Path, config: &TbumpConfig, new_version: &str) -> Result<Vec<FileChange>> {
    let current = &config.version.current;

    config
        .files
        .iter()
        .map(|entry| {
            let path = root.join(&entry.src);
            let search = render(entry, current);
            let replace = render(entry, new_version);

            let content = fs::read_to_string(&path).map_err(|e| {
                CiError::bump(format!("cannot read {}: {}", path.display(), e))
            })?;
            let occurrences = content.matches(&search).count();
            if occurrences == 0 {
                return Err(CiError::bump(format!(
                    "'{}' not found in {}",
                    search,
                    path.display()
                )));
            }

            Ok(FileChange {
                path,
                search,
                replace,
                occurrences,
            })
        })
        .collect()
}

/// Rewrites the version in every configured file and in `tbump.toml` itself.
///
/// The new content of every file, `tbump.toml` included, is computed before
/// the first one is written, so a missing search string or `current` line
/// leaves the tree untouched. Entries sharing a `src` are applied in order
/// to the same content.
///
/// # Arguments
/// * `root` - Project root the `[[file]]` sources are relative to
/// * `tbump_path` - Location of `tbump.toml`
/// * `config` - Parsed content of `tbump.toml`
/// * `new_version` - Already validated target version
pub fn bump_files(
    root: &Path,
    tbump_path: &Path,
    config: &TbumpConfig,
    new_version: &str,
) -> Result<Vec<FileChange>> {
    let changes = plan_bump(root, config, new_version)?;

    let mut staged: Vec<(PathBuf, String)> = Vec::new();
    for change in &changes {
        let index = match staged.iter().position(|(path, _)| *path == change.path) {
            Some(index) => index,
            None => {
                staged.push((change.path.clone(), fs::read_to_string(&change.path)?));
                staged.len() - 1
            }
        };

        let content = &mut staged[index].1;
        let occurrences = content.matches(&change.search).count();
        *content = content.replace(&change.search, &change.replace);
        log::info!(
            "bumping {} ({} occurrence(s))",
            change.path.display(),
            occurrences
        );
    }

    match staged.iter_mut().find(|(path, _)| path == tbump_path) {
        Some((_, content)) => *content = set_current_version(content, new_version)?,
        None => {
            let tbump = fs::read_to_string(tbump_path)?;
            staged.push((tbump_path.to_path_buf(), set_current_version(&tbump, new_version)?));
        }
    }

    for (path, content) in &staged {
        fs::write(path, content)?;
    }

    Ok(changes)
}

/// Replaces the first `current = ...` assignment, keeping its quoting and the rest of the file as is
fn set_current_version(tbump: &str, new_version: &str) -> Result<String> {
    let re = Regex::new(r#"(?m)^([ \t]*current[ \t]*=[ \t]*)(?:"[^"]*"|'([^']*)')"#)
        .map_err(|e| CiError::bump(e.to_string()))?;

    if !re.is_match(tbump) {
        return Err(CiError::bump("no `current = \"...\"` line in tbump.toml"));
    }

    Ok(re
        .replacen(tbump, 1, |caps: &regex::Captures<'_>| {
            let quote = if caps.get(2).is_some() { '\'' } else { '"' };
            format!("{}{}{}{}", &caps[1], quote, new_version, quote)
        })
        .into_owned())
}
