use std::cell::RefCell;

use crate::error::{CiError, Result};
use crate::process::{CommandRunner, Invocation};

/// Runner that records invocations instead of spawning processes
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: RefCell<Vec<Invocation>>,
    failures: Vec<(String, String, i32)>,
}

impl RecordingRunner {
    /// Create a runner where every invocation succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Make invocations of `program` that carry `arg` exit with `code`
    pub fn fail_on(mut self, program: impl Into<String>, arg: impl Into<String>, code: i32) -> Self {
        self.failures.push((program.into(), arg.into(), code));
        self
    }

    /// Every invocation seen so far, in order
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    /// Invocations rendered as command lines
    pub fn command_lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.to_string()).collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> Result<()> {
        self.calls.borrow_mut().push(invocation.clone());

        let failure = self.failures.iter().find(|(program, arg, _)| {
            *program == invocation.program && invocation.args.iter().any(|a| a == arg)
        });

        match failure {
            Some((program, _, code)) => Err(CiError::ToolFailed {
                program: program.clone(),
                code: *code,
            }),
            None => Ok(()),
        }
    }
}
