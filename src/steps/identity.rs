//! Version-control identity: user name, email, and color output.
use super::shapes::run_sequence;
use super::Session;
use crate::command::{CommandOutcome, Invocation};
use crate::terminal::DefaultAnswer;
use std::fmt;

/// Identity fields checked for existing values, in prompt order.
const FIELDS: &[(&str, &str)] = &[("user.name", "Git username"), ("user.email", "Git email")];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityOutcome {
    /// The operator kept an existing value; nothing was changed.
    KeptExisting,
    Configured,
    Failed(CommandOutcome),
}

impl fmt::Display for IdentityOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityOutcome::KeptExisting => f.write_str("kept existing identity"),
            IdentityOutcome::Configured => f.write_str("configured"),
            IdentityOutcome::Failed(outcome) => write!(f, "failed: {outcome}"),
        }
    }
}

fn git_config(key: &str, value: Option<&str>) -> Invocation {
    let mut args = vec!["config", "--global", key];
    args.extend(value);
    Invocation::new("git", args)
}

/// Set the global Git identity.
///
/// Any existing name or email must be explicitly overwritten; declining
/// either one leaves both untouched.
pub fn setup_git_identity(session: &mut Session<'_>) -> IdentityOutcome {
    session.term.clear();
    for (key, label) in FIELDS {
        let existing = session
            .capture(&git_config(key, None))
            .filter(|value| !value.is_empty());
        let Some(existing) = existing else {
            continue;
        };
        session.term.say(format!("Existing {label}: {existing}"));
        if !session
            .term
            .confirm("Do you want to overwrite it?", DefaultAnswer::No)
        {
            session.term.say(format!("Keeping existing {label}."));
            return IdentityOutcome::KeptExisting;
        }
    }

    session.term.say("SET UP GIT");
    let name = session.term.ask("Please enter your git username");
    let email = session.term.ask("Please enter your git email");

    let sequence = [
        (
            git_config("user.name", Some(name.as_str())),
            "Failed to set git username",
        ),
        (
            git_config("user.email", Some(email.as_str())),
            "Failed to set git email",
        ),
        (
            git_config("color.ui", Some("true")),
            "Failed to set git color.ui",
        ),
    ];
    if let Err(outcome) = run_sequence(session, &sequence) {
        return IdentityOutcome::Failed(outcome);
    }
    session.term.say("Git is set up.");
    IdentityOutcome::Configured
}
