//! Command-line workflows, independent of argument parsing

pub mod orchestration;

pub use orchestration::{run_check, run_deploy, DeployArgs, DeployResult, Project};
