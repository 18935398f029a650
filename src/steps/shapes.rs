//! The reusable step shapes: apply-list, idempotent ensure, abort-on-failure
//! sequence, and profile-line append.
use super::Session;
use crate::command::{CommandOutcome, Invocation};
use crate::profile::{append_line_once, AppendOutcome};
use crate::terminal::DefaultAnswer;
use crate::toolchain::Toolchain;
use std::fmt;

/// Result of applying a list of items with per-item continuation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    pub attempted: usize,
    /// Items whose command failed, in the order they were attempted.
    pub failed: Vec<String>,
    /// Malformed entries that were never attempted.
    pub skipped: Vec<String>,
}

impl ApplyReport {
    pub fn merge(&mut self, other: ApplyReport) {
        self.attempted += other.attempted;
        self.failed.extend(other.failed);
        self.skipped.extend(other.skipped);
    }
}

impl fmt::Display for ApplyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} attempted, {} failed", self.attempted, self.failed.len())?;
        if !self.skipped.is_empty() {
            write!(f, ", {} skipped", self.skipped.len())?;
        }
        Ok(())
    }
}

/// Operator text for an apply-list.
#[derive(Debug, Clone, Copy)]
pub struct ItemMessages<'m> {
    /// Printed as `<notice>: <item>` before each item runs.
    pub notice: Option<&'m str>,
    /// Printed as `<failure> <item> (<outcome>). Continuing...` on failure.
    pub failure: &'m str,
}

/// Run one command per item, in declared order, never stopping early.
pub fn apply_list<F>(
    session: &mut Session<'_>,
    items: &[String],
    messages: ItemMessages<'_>,
    build: F,
) -> ApplyReport
where
    F: Fn(&Toolchain, &str) -> Invocation,
{
    let mut report = ApplyReport::default();
    for item in items {
        if let Some(notice) = messages.notice {
            session.term.say(format!("{notice}: {item}"));
        }
        let invocation = build(&session.toolchain, item);
        report.attempted += 1;
        if let Err(outcome) = attempt(session, &invocation) {
            session
                .term
                .say(format!("{} {item} ({outcome}). Continuing...", messages.failure));
            report.failed.push(item.clone());
        }
    }
    report
}

/// Run a single command with the terminal attached.
pub fn attempt(session: &Session<'_>, invocation: &Invocation) -> Result<(), CommandOutcome> {
    match session.run(invocation) {
        CommandOutcome::Success => Ok(()),
        outcome => Err(outcome),
    }
}

/// Probe-then-act description for one resource.
#[derive(Debug, Clone)]
pub struct Ensure<'s> {
    /// Name shown to the operator, e.g. `Rosetta`.
    pub subject: &'s str,
    /// Cheap silent check; `None` means always act.
    pub probe: Option<Invocation>,
    /// Question asked before acting.
    pub gate: Option<(&'s str, DefaultAnswer)>,
    /// Announced before the action runs, e.g. `Installing Rosetta...`.
    pub announce: &'s str,
    pub action: Invocation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnsureOutcome {
    AlreadySatisfied,
    Declined,
    Applied,
    Failed(CommandOutcome),
}

impl EnsureOutcome {
    /// True when the resource is known to be in place afterwards.
    pub fn in_place(&self) -> bool {
        matches!(self, EnsureOutcome::AlreadySatisfied | EnsureOutcome::Applied)
    }
}

impl fmt::Display for EnsureOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnsureOutcome::AlreadySatisfied => f.write_str("already satisfied"),
            EnsureOutcome::Declined => f.write_str("declined"),
            EnsureOutcome::Applied => f.write_str("applied"),
            EnsureOutcome::Failed(outcome) => write!(f, "failed: {outcome}"),
        }
    }
}

pub fn ensure(session: &mut Session<'_>, step: Ensure<'_>) -> EnsureOutcome {
    if let Some(probe) = &step.probe {
        session
            .term
            .say(format!("Checking if {} is installed...", step.subject));
        if session.probe(probe).success() {
            session
                .term
                .say(format!("{} is already installed.", step.subject));
            return EnsureOutcome::AlreadySatisfied;
        }
    }
    if let Some((question, default)) = step.gate {
        if !session.term.confirm(question, default) {
            tracing::debug!(subject = step.subject, "declined by operator");
            return EnsureOutcome::Declined;
        }
    }
    session.term.say(step.announce);
    match attempt(session, &step.action) {
        Ok(()) => EnsureOutcome::Applied,
        Err(outcome) => {
            session
                .term
                .say(format!("Error with {}: {outcome}", step.subject));
            EnsureOutcome::Failed(outcome)
        }
    }
}

/// Run commands in order, stopping at the first failure.
///
/// Each entry pairs a command with the text used to report its failure.
pub fn run_sequence(
    session: &mut Session<'_>,
    sequence: &[(Invocation, &str)],
) -> Result<(), CommandOutcome> {
    for (invocation, failure) in sequence {
        if let Err(outcome) = attempt(session, invocation) {
            session.term.say(format!("{failure}: {outcome}"));
            return Err(outcome);
        }
    }
    Ok(())
}

/// Append `line` to the session's shell profile once, then evaluate it in a
/// transient shell.
///
/// The evaluation only affects that child shell; it cannot change this
/// process or its parent. Later steps get package-manager settings through
/// the session toolchain instead.
pub fn ensure_profile_line(
    session: &mut Session<'_>,
    subject: &str,
    line: &str,
) -> Option<AppendOutcome> {
    let Some(path) = session.profile.clone() else {
        session
            .term
            .say(format!("No shell profile location known; skipping {subject}."));
        return None;
    };
    let outcome = match append_line_once(&path, line) {
        Ok(outcome) => outcome,
        Err(err) => {
            session.term.say(format!("Error updating {subject}: {err:#}"));
            return None;
        }
    };
    match outcome {
        AppendOutcome::AlreadyPresent => {
            session
                .term
                .say(format!("{subject} is already in {}.", path.display()));
        }
        AppendOutcome::Appended => {
            session
                .term
                .say(format!("Added {subject} to {}.", path.display()));
            let evaluate = session.toolchain.command("bash", ["-c", line]);
            tracing::debug!(command = %evaluate, "evaluating profile line in a child shell");
            if let Err(outcome) = attempt(session, &evaluate) {
                session
                    .term
                    .say(format!("Error evaluating {subject}: {outcome}"));
            }
        }
    }
    Some(outcome)
}
