//! Deploy and check workflows
//!
//! Both workflows are a fixed, linear sequence of external tool calls. The
//! first failing step aborts the run; nothing is retried or rolled back.

use std::path::{Path, PathBuf};

use crate::bump;
use crate::config::{Settings, TbumpConfig};
use crate::domain::{dist_tag_for_version, resolve_package_dir, version_from_git_tag, DistTag};
use crate::error::{CiError, Result};
use crate::process::{CommandRunner, Invocation};
use crate::ui;

/// Everything a workflow needs to know about the project being released
#[derive(Debug, Clone)]
pub struct Project {
    /// Directory `tbump.toml` lives in; bump sources are relative to it
    pub root: PathBuf,
    pub tbump_path: PathBuf,
    pub settings: Settings,
}

impl Project {
    pub fn new(tbump_path: impl Into<PathBuf>, settings: Settings) -> Self {
        let tbump_path = tbump_path.into();
        let root = match tbump_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Project {
            root,
            tbump_path,
            settings,
        }
    }
}

/// Arguments for the deploy workflow
///
/// Decoupled from the clap definitions so the workflow can be driven
/// programmatically.
#[derive(Debug, Clone, PartialEq)]
pub struct DeployArgs {
    pub git_tag: String,
    /// Passed to the build script as `--env <ENV>`
    pub env: Option<String>,
    pub dry_run: bool,
}

/// Outcome of a deploy
#[derive(Debug, Clone, PartialEq)]
pub struct DeployResult {
    pub version: String,
    pub dist_tag: DistTag,
    pub package_dir: PathBuf,
    /// False for dry runs
    pub published: bool,
}

pub fn install_step(settings: &Settings, root: &Path) -> Invocation {
    Invocation::new(&settings.installer)
        .arg("install")
        .current_dir(root)
}

pub fn build_step(settings: &Settings, root: &Path, env: Option<&str>) -> Invocation {
    let step = Invocation::new(&settings.installer)
        .arg(&settings.build_script)
        .current_dir(root);
    match env {
        Some(env) => step.args(["--env", env]),
        None => step,
    }
}

pub fn publish_step(settings: &Settings, package_dir: &Path, dist_tag: DistTag) -> Invocation {
    Invocation::new(&settings.registry_client)
        .args(["publish", "--access", settings.access.as_str()])
        .args(["--tag", dist_tag.as_str()])
        .current_dir(package_dir)
}

/// Release the package for a git tag.
///
/// `tbump` supplies the version regex and the files to bump.
///
/// Steps:
/// 1. Derive and validate the version from the tag
/// 2. Install dependencies
/// 3. Bump the version in every configured file
/// 4. Build the package
/// 5. Publish the build output under the dist-tag matching the version
///
/// The tag is validated before anything runs, so a malformed tag never
/// leaves a half-installed or half-bumped tree. With `dry_run` the planned
/// steps are printed and nothing is executed or written.
pub fn run_deploy<R: CommandRunner>(
    runner: &R,
    project: &Project,
    tbump: &TbumpConfig,
    args: &DeployArgs,
) -> Result<DeployResult> {
    let settings = &project.settings;
    let pattern = tbump.version_pattern()?;
    let version = version_from_git_tag(&args.git_tag, &pattern)?;
    let dist_tag = dist_tag_for_version(&version);
    let package_dir = project.root.join(resolve_package_dir(
        &settings.package,
        settings.package_dir.as_deref(),
    )?);

    ui::display_release(&version, dist_tag.as_str());

    let install = install_step(settings, &project.root);
    let build = build_step(settings, &project.root, args.env.as_deref());
    let publish = publish_step(settings, &package_dir, dist_tag);

    if args.dry_run {
        let changes = bump::plan_bump(&project.root, tbump, &version)?;
        ui::display_plan(&changes, &[install, build, publish]);
        return Ok(DeployResult {
            version,
            dist_tag,
            package_dir,
            published: false,
        });
    }

    run_step(runner, &install)?;

    ui::display_status(&format!("Bumping version to {}", version));
    bump::bump_files(&project.root, &project.tbump_path, tbump, &version)?;

    run_step(runner, &build)?;
    run_step(runner, &publish)?;

    ui::display_success(&format!(
        "Published {} {} with dist-tag {}",
        settings.package, version, dist_tag
    ));

    Ok(DeployResult {
        version,
        dist_tag,
        package_dir,
        published: true,
    })
}

/// Install dependencies, run the linters, then the test suite.
///
/// A failing test step is reported as [`CiError::TestsFailed`] rather than
/// as a tool failure.
pub fn run_check<R: CommandRunner>(runner: &R, project: &Project) -> Result<()> {
    let settings = &project.settings;

    run_step(runner, &install_step(settings, &project.root))?;

    for script in &settings.lint_scripts {
        let lint = Invocation::new(&settings.installer)
            .arg(script)
            .current_dir(&project.root);
        run_step(runner, &lint)?;
    }

    let test = Invocation::new(&settings.installer)
        .arg(&settings.test_script)
        .current_dir(&project.root);
    match run_step(runner, &test) {
        Err(CiError::ToolFailed { .. }) => return Err(CiError::TestsFailed),
        other => other?,
    }

    ui::display_success("All checks passed");
    Ok(())
}

fn run_step<R: CommandRunner>(runner: &R, invocation: &Invocation) -> Result<()> {
    ui::display_invocation(invocation);
    runner.run(invocation)
}
