//! External tool invocation
//!
//! Pipelines describe each step as an [`Invocation`] and hand it to a
//! [`CommandRunner`]. The real implementation spawns the process with
//! inherited stdio; [`mock::RecordingRunner`] records invocations for tests.

pub mod mock;

pub use mock::RecordingRunner;

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{CiError, Result};

/// A single external tool call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Working directory, the current one when `None`
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Invocation {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        if let Some(cwd) = &self.cwd {
            write!(f, " (in {})", cwd.display())?;
        }
        Ok(())
    }
}

/// Runs external tools to completion.
///
/// ## Error Handling
///
/// A tool exiting non-zero maps to [`CiError::ToolFailed`]; a tool that
/// cannot be started maps to [`CiError::ToolSpawn`].
pub trait CommandRunner {
    fn run(&self, invocation: &Invocation) -> Result<()>;
}

/// Spawns real processes, inheriting stdin, stdout and stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<()> {
        log::debug!("running {}", invocation);

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        if let Some(cwd) = &invocation.cwd {
            cmd.current_dir(cwd);
        }

        let status = cmd.status().map_err(|source| CiError::ToolSpawn {
            program: invocation.program.clone(),
            source,
        })?;

        if !status.success() {
            // Killed by a signal: no code to pass on
            let code = status.code().unwrap_or(1);
            log::debug!("{} exited with {}", invocation.program, code);
            return Err(CiError::ToolFailed {
                program: invocation.program.clone(),
                code,
            });
        }

        Ok(())
    }
}
