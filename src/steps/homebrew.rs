//! Package-manager steps: bootstrap, environment, health, bulk installs,
//! and the final cleanup pass.
use super::shapes::{
    apply_list, ensure, ensure_profile_line, run_sequence, ApplyReport, Ensure, EnsureOutcome,
    ItemMessages,
};
use super::Session;
use crate::command::{CommandOutcome, Invocation};
use crate::profile::AppendOutcome;

/// Official non-interactive installer, run through `bash -c`.
pub const INSTALL_SCRIPT: &str = "NONINTERACTIVE=1 /bin/bash -c \"$(curl -fsSL https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh)\"";

/// Profile line that puts Homebrew on `PATH` for future login shells.
pub const SHELLENV_LINE: &str = r#"eval "$(/opt/homebrew/bin/brew shellenv)""#;

/// Set for every package-manager call once the health-check passes, so each
/// install skips its own cleanup; the cleanup step does it once at the end.
pub const NO_INSTALL_CLEANUP: &str = "HOMEBREW_NO_INSTALL_CLEANUP";

pub fn install_homebrew(session: &mut Session<'_>) -> EnsureOutcome {
    session.term.clear();
    let probe = session.toolchain.brew(["--version"]);
    let action = session.toolchain.command("bash", ["-c", INSTALL_SCRIPT]);
    ensure(
        session,
        Ensure {
            subject: "Homebrew",
            probe: Some(probe),
            gate: None,
            announce: "Installing Homebrew...",
            action,
        },
    )
}

pub fn setup_homebrew_env(session: &mut Session<'_>) -> Option<AppendOutcome> {
    session.term.clear();
    ensure_profile_line(session, "Homebrew initialization", SHELLENV_LINE)
}

/// `brew update` then `brew doctor`, stopping at the first failure.
pub fn check_homebrew(session: &mut Session<'_>) -> Result<(), CommandOutcome> {
    session.term.clear();
    session
        .term
        .say("Checking Homebrew installation and updating...");
    let sequence = [
        (session.toolchain.brew(["update"]), "Error updating Homebrew"),
        (session.toolchain.brew(["doctor"]), "Error running brew doctor"),
    ];
    run_sequence(session, &sequence)?;
    session.toolchain.set_env(NO_INSTALL_CLEANUP, "1");
    Ok(())
}

pub fn install_formulae(session: &mut Session<'_>, formulae: &[String]) -> ApplyReport {
    session.term.clear();
    session.term.say("Installing formulae...");
    apply_list(
        session,
        formulae,
        ItemMessages {
            notice: None,
            failure: "Failed to install",
        },
        |toolchain, formula| toolchain.brew(["install", formula]),
    )
}

pub fn install_casks(session: &mut Session<'_>, casks: &[String]) -> ApplyReport {
    session.term.clear();
    session.term.say("Installing casks...");
    apply_list(
        session,
        casks,
        ItemMessages {
            notice: None,
            failure: "Failed to install",
        },
        |toolchain, cask| toolchain.brew(["install", "--cask", cask]),
    )
}

/// Install a helper formula if its probe fails. Shared by steps that drive a
/// brew-installed CLI.
pub fn ensure_formula(
    session: &mut Session<'_>,
    formula: &str,
    probe: Option<Invocation>,
) -> EnsureOutcome {
    let announce = format!("Installing {formula}...");
    let action = session.toolchain.brew(["install", formula]);
    ensure(
        session,
        Ensure {
            subject: formula,
            probe,
            gate: None,
            announce: &announce,
            action,
        },
    )
}

/// Update, upgrade, prune and re-check; the first failure ends the step.
pub fn cleanup(session: &mut Session<'_>) -> Result<(), CommandOutcome> {
    session.term.clear();
    session.term.say("Cleaning up...");
    let sequence = [
        (session.toolchain.brew(["update"]), "Error updating Homebrew"),
        (session.toolchain.brew(["upgrade"]), "Error upgrading Homebrew"),
        (session.toolchain.brew(["cleanup"]), "Error cleaning up Homebrew"),
        (session.toolchain.brew(["doctor"]), "Error running brew doctor"),
    ];
    run_sequence(session, &sequence)
}
