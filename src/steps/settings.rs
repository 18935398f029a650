//! System defaults and Dock layout.
use super::homebrew::ensure_formula;
use super::shapes::{apply_list, attempt, ApplyReport, ItemMessages};
use super::Session;
use crate::config::{parse_replace_pair, DesiredState};
use crate::terminal::DefaultAnswer;
use std::fmt;

/// Run each configured setting through `bash -c`, announcing it first.
pub fn apply_default_settings(session: &mut Session<'_>, settings: &[String]) -> ApplyReport {
    apply_list(
        session,
        settings,
        ItemMessages {
            notice: Some("Applying setting"),
            failure: "Failed to apply setting:",
        },
        |toolchain, setting| toolchain.command("bash", ["-c", setting]),
    )
}

/// Gate the default settings behind a default-yes confirmation.
pub fn configure_default_settings(
    session: &mut Session<'_>,
    settings: &[String],
) -> Option<ApplyReport> {
    session.term.clear();
    if !session
        .term
        .confirm("Configure default system settings?", DefaultAnswer::Yes)
    {
        return None;
    }
    session.term.say("Configuring default settings...");
    Some(apply_default_settings(session, settings))
}

/// Outcome of the Dock step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DockOutcome {
    Declined,
    /// `dockutil` was unavailable, so no Dock change was attempted.
    HelperMissing,
    Applied(ApplyReport),
}

impl fmt::Display for DockOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DockOutcome::Declined => f.write_str("declined"),
            DockOutcome::HelperMissing => f.write_str("dockutil unavailable"),
            DockOutcome::Applied(report) => write!(f, "{report}"),
        }
    }
}

/// Replace, add, then remove Dock items with `dockutil`.
pub fn configure_dock(session: &mut Session<'_>, config: &DesiredState) -> DockOutcome {
    session.term.clear();
    if !session
        .term
        .confirm("Apply Dock settings?", DefaultAnswer::No)
    {
        return DockOutcome::Declined;
    }
    if !ensure_formula(session, "dockutil", None).in_place() {
        return DockOutcome::HelperMissing;
    }

    let mut report = replace_dock_items(session, &config.dock_replacements);
    report.merge(apply_list(
        session,
        &config.dock_additions,
        ItemMessages {
            notice: None,
            failure: "Failed to add",
        },
        |toolchain, app| toolchain.command("dockutil", ["--add", app]),
    ));
    report.merge(apply_list(
        session,
        &config.dock_removals,
        ItemMessages {
            notice: None,
            failure: "Failed to remove",
        },
        |toolchain, app| toolchain.command("dockutil", ["--remove", app]),
    ));
    DockOutcome::Applied(report)
}

fn replace_dock_items(session: &mut Session<'_>, entries: &[String]) -> ApplyReport {
    let mut report = ApplyReport::default();
    for entry in entries {
        let Some((add, remove)) = parse_replace_pair(entry) else {
            session.term.say(format!(
                "Skipping Dock entry {entry:?}: expected <add>|<remove>."
            ));
            report.skipped.push(entry.clone());
            continue;
        };
        let invocation = session
            .toolchain
            .command("dockutil", ["--add", add, "--replacing", remove]);
        report.attempted += 1;
        if let Err(outcome) = attempt(session, &invocation) {
            session
                .term
                .say(format!("Failed to replace {remove} with {add} ({outcome}). Continuing..."));
            report.failed.push(entry.clone());
        }
    }
    report
}
