//! Provisioning steps.
//!
//! Each step checks state, optionally asks the operator, runs external
//! commands, and reports failures without raising them. Steps share nothing
//! but the read-only desired state and the session below.
pub mod apps;
pub mod homebrew;
pub mod identity;
pub mod settings;
pub mod shapes;
pub mod system;

use crate::command::{CommandOutcome, CommandRunner, Invocation};
use crate::terminal::Terminal;
use crate::toolchain::Toolchain;
use std::path::PathBuf;
use std::sync::Arc;

/// What a step hands back to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// The operator confirmed a restart; nothing else may run.
    Restart(CommandOutcome),
}

/// Everything a step may touch.
pub struct Session<'a> {
    pub runner: Arc<dyn CommandRunner>,
    pub term: Terminal<'a>,
    pub toolchain: Toolchain,
    /// Shell profile that receives environment lines, if one is known.
    pub profile: Option<PathBuf>,
}

impl<'a> Session<'a> {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        term: Terminal<'a>,
        profile: Option<PathBuf>,
    ) -> Self {
        Self {
            runner,
            term,
            toolchain: Toolchain::default(),
            profile,
        }
    }

    pub fn run(&self, invocation: &Invocation) -> CommandOutcome {
        self.runner.run(invocation)
    }

    pub fn probe(&self, invocation: &Invocation) -> CommandOutcome {
        self.runner.probe(invocation)
    }

    pub fn capture(&self, invocation: &Invocation) -> Option<String> {
        self.runner.capture(invocation)
    }
}
