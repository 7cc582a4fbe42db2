// tests/deploy_test.rs
use std::fs;
use std::path::Path;

use run_ci::cli::{run_check, run_deploy, DeployArgs, Project};
use run_ci::config::{load_tbump, Settings};
use run_ci::domain::DistTag;
use run_ci::process::RecordingRunner;
use run_ci::CiError;
use tempfile::TempDir;

const PACKAGE_JSON: &str = r#"{
  "name": "@tanker/identity",
  "version": "1.3.0",
  "license": "Apache-2.0"
}
"#;

/// A scratch project with the fixture tbump.toml and one versioned file
fn project_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::copy("tests/fixtures/tbump.toml", dir.path().join("tbump.toml")).unwrap();
    fs::create_dir_all(dir.path().join("packages/identity")).unwrap();
    fs::write(dir.path().join("packages/identity/package.json"), PACKAGE_JSON).unwrap();
    dir
}

fn deploy_args(git_tag: &str) -> DeployArgs {
    DeployArgs {
        git_tag: git_tag.to_string(),
        env: None,
        dry_run: false,
    }
}

fn read(dir: &TempDir, rel: &str) -> String {
    fs::read_to_string(dir.path().join(rel)).unwrap()
}

#[test]
fn test_deploy_beta_end_to_end() {
    let dir = project_tree();
    let tbump_path = dir.path().join("tbump.toml");
    let tbump = load_tbump(&tbump_path).unwrap();
    let project = Project::new(&tbump_path, Settings::default());
    let runner = RecordingRunner::new();

    let result = run_deploy(&runner, &project, &tbump, &deploy_args("v2.0.0-beta")).unwrap();

    assert_eq!(result.version, "2.0.0-beta");
    assert_eq!(result.dist_tag, DistTag::Beta);
    assert!(result.published);
    assert_eq!(result.package_dir, dir.path().join("packages/identity/dist"));

    let calls = runner.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0].program, "yarn");
    assert_eq!(calls[0].args, vec!["install"]);
    assert_eq!(calls[1].args, vec!["build:identity"]);
    assert_eq!(calls[2].program, "npm");
    assert_eq!(
        calls[2].args,
        vec!["publish", "--access", "public", "--tag", "beta"]
    );
    assert_eq!(
        calls[2].cwd.as_deref(),
        Some(dir.path().join("packages/identity/dist").as_path())
    );

    assert!(read(&dir, "packages/identity/package.json").contains("\"version\": \"2.0.0-beta\""));
    assert!(read(&dir, "tbump.toml").contains("current = \"2.0.0-beta\""));
}

#[test]
fn test_deploy_stable_release_is_latest() {
    let dir = project_tree();
    let tbump_path = dir.path().join("tbump.toml");
    let tbump = load_tbump(&tbump_path).unwrap();
    let project = Project::new(&tbump_path, Settings::default());
    let runner = RecordingRunner::new();

    let result = run_deploy(&runner, &project, &tbump, &deploy_args("v1.4.0")).unwrap();

    assert_eq!(result.dist_tag, DistTag::Latest);
    assert!(runner.command_lines()[2].contains("--tag latest"));
}

#[test]
fn test_deploy_alpha_with_env() {
    let dir = project_tree();
    let tbump_path = dir.path().join("tbump.toml");
    let tbump = load_tbump(&tbump_path).unwrap();
    let project = Project::new(&tbump_path, Settings::default());
    let runner = RecordingRunner::new();
    let args = DeployArgs {
        git_tag: "v2.0.0-alpha2".to_string(),
        env: Some("production".to_string()),
        dry_run: false,
    };

    let result = run_deploy(&runner, &project, &tbump, &args).unwrap();

    assert_eq!(result.dist_tag, DistTag::Alpha);
    let calls = runner.calls();
    assert_eq!(calls[1].args, vec!["build:identity", "--env", "production"]);
    assert_eq!(
        calls[2].args,
        vec!["publish", "--access", "public", "--tag", "alpha"]
    );
}

#[test]
fn test_deploy_missing_prefix_runs_nothing() {
    let dir = project_tree();
    let tbump_path = dir.path().join("tbump.toml");
    let tbump = load_tbump(&tbump_path).unwrap();
    let project = Project::new(&tbump_path, Settings::default());
    let runner = RecordingRunner::new();

    let err = run_deploy(&runner, &project, &tbump, &deploy_args("2.0.0")).unwrap_err();

    assert!(matches!(err, CiError::MalformedInput(_)));
    assert!(runner.calls().is_empty());
    assert_eq!(read(&dir, "packages/identity/package.json"), PACKAGE_JSON);
}

#[test]
fn test_deploy_invalid_version_runs_nothing() {
    let dir = project_tree();
    let tbump_path = dir.path().join("tbump.toml");
    let tbump = load_tbump(&tbump_path).unwrap();
    let project = Project::new(&tbump_path, Settings::default());
    let runner = RecordingRunner::new();

    let err = run_deploy(&runner, &project, &tbump, &deploy_args("vX.Y.Z")).unwrap_err();

    assert!(matches!(err, CiError::MalformedInput(_)));
    assert!(runner.calls().is_empty());
}

#[test]
fn test_deploy_build_failure_stops_before_publish() {
    let dir = project_tree();
    let tbump_path = dir.path().join("tbump.toml");
    let tbump = load_tbump(&tbump_path).unwrap();
    let project = Project::new(&tbump_path, Settings::default());
    let runner = RecordingRunner::new().fail_on("yarn", "build:identity", 2);

    let err = run_deploy(&runner, &project, &tbump, &deploy_args("v1.4.0")).unwrap_err();

    assert_eq!(err.exit_code(), 2);
    let lines = runner.command_lines();
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|l| !l.starts_with("npm")));
}

#[test]
fn test_deploy_install_failure_leaves_files() {
    let dir = project_tree();
    let tbump_path = dir.path().join("tbump.toml");
    let tbump = load_tbump(&tbump_path).unwrap();
    let project = Project::new(&tbump_path, Settings::default());
    let runner = RecordingRunner::new().fail_on("yarn", "install", 1);

    assert!(run_deploy(&runner, &project, &tbump, &deploy_args("v1.4.0")).is_err());
    assert_eq!(read(&dir, "packages/identity/package.json"), PACKAGE_JSON);
}

#[test]
fn test_deploy_dry_run_touches_nothing() {
    let dir = project_tree();
    let tbump_path = dir.path().join("tbump.toml");
    let tbump = load_tbump(&tbump_path).unwrap();
    let project = Project::new(&tbump_path, Settings::default());
    let runner = RecordingRunner::new();
    let args = DeployArgs {
        git_tag: "v2.0.0-beta".to_string(),
        env: None,
        dry_run: true,
    };

    let result = run_deploy(&runner, &project, &tbump, &args).unwrap();

    assert!(!result.published);
    assert_eq!(result.dist_tag, DistTag::Beta);
    assert!(runner.calls().is_empty());
    assert_eq!(read(&dir, "packages/identity/package.json"), PACKAGE_JSON);
    assert!(read(&dir, "tbump.toml").contains("current = \"1.3.0\""));
}

#[test]
fn test_deploy_package_dir_override() {
    let dir = project_tree();
    let tbump_path = dir.path().join("tbump.toml");
    let tbump = load_tbump(&tbump_path).unwrap();
    let settings = Settings {
        package_dir: Some("packages/identity/build".into()),
        ..Settings::default()
    };
    let project = Project::new(&tbump_path, settings);
    let runner = RecordingRunner::new();

    let result = run_deploy(&runner, &project, &tbump, &deploy_args("v1.4.0")).unwrap();

    assert_eq!(result.package_dir, dir.path().join("packages/identity/build"));
}

#[test]
fn test_deploy_bad_package_name() {
    let dir = project_tree();
    let tbump_path = dir.path().join("tbump.toml");
    let tbump = load_tbump(&tbump_path).unwrap();
    let settings = Settings {
        package: "identity".to_string(),
        ..Settings::default()
    };
    let project = Project::new(&tbump_path, settings);
    let runner = RecordingRunner::new();

    let err = run_deploy(&runner, &project, &tbump, &deploy_args("v1.4.0")).unwrap_err();
    assert!(matches!(err, CiError::MalformedInput(_)));
    assert!(runner.calls().is_empty());
}

#[test]
fn test_project_root_for_bare_file_name() {
    let project = Project::new("tbump.toml", Settings::default());
    assert_eq!(project.root, Path::new("."));
}

#[test]
fn test_check_runs_install_lint_test() {
    let settings = Settings {
        lint_scripts: vec!["lint:js".to_string(), "flow".to_string()],
        ..Settings::default()
    };
    let project = Project::new("tbump.toml", settings);
    let runner = RecordingRunner::new();

    run_check(&runner, &project).unwrap();

    let args: Vec<Vec<String>> = runner.calls().into_iter().map(|c| c.args).collect();
    assert_eq!(
        args,
        vec![
            vec!["install".to_string()],
            vec!["lint:js".to_string()],
            vec!["flow".to_string()],
            vec!["test".to_string()],
        ]
    );
}

#[test]
fn test_check_failing_tests() {
    let project = Project::new("tbump.toml", Settings::default());
    let runner = RecordingRunner::new().fail_on("yarn", "test", 1);

    let err = run_check(&runner, &project).unwrap_err();
    assert!(matches!(err, CiError::TestsFailed));
}

#[test]
fn test_check_failing_lint_is_tool_failure() {
    let project = Project::new("tbump.toml", Settings::default());
    let runner = RecordingRunner::new().fail_on("yarn", "lint", 3);

    let err = run_check(&runner, &project).unwrap_err();
    assert!(matches!(err, CiError::ToolFailed { code: 3, .. }));
    // tests never ran
    assert_eq!(runner.calls().len(), 2);
}
