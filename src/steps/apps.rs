//! App Store applications and the optional .NET runtime.
use super::homebrew::ensure_formula;
use super::shapes::{
    apply_list, ensure, ensure_profile_line, ApplyReport, Ensure, EnsureOutcome, ItemMessages,
};
use super::Session;
use crate::terminal::DefaultAnswer;

pub const DOTNET_ROOT_LINE: &str = r#"export DOTNET_ROOT="/opt/homebrew/opt/dotnet/libexec""#;

/// Ensure `mas` is present, then install each App Store item by ID.
///
/// Returns `None` when `mas` could not be installed and nothing was tried.
pub fn install_app_store_apps(session: &mut Session<'_>, apps: &[String]) -> Option<ApplyReport> {
    session.term.clear();
    let probe = session.toolchain.command("mas", ["--version"]);
    if !ensure_formula(session, "mas", Some(probe)).in_place() {
        return None;
    }
    session
        .term
        .say("Installing Mac App Store applications...");
    Some(apply_list(
        session,
        apps,
        ItemMessages {
            notice: None,
            failure: "Failed to install app",
        },
        |toolchain, app| toolchain.command("mas", ["install", app]),
    ))
}

/// Offer .NET when it is missing; export `DOTNET_ROOT` once installed.
pub fn install_dotnet(session: &mut Session<'_>) -> EnsureOutcome {
    session.term.clear();
    let probe = session.toolchain.command("dotnet", ["--version"]);
    let action = session.toolchain.brew(["install", "dotnet"]);
    let outcome = ensure(
        session,
        Ensure {
            subject: ".NET",
            probe: Some(probe),
            gate: Some(("Install .NET?", DefaultAnswer::No)),
            announce: "Installing .NET...",
            action,
        },
    );
    if outcome == EnsureOutcome::Applied {
        ensure_profile_line(session, "DOTNET_ROOT export", DOTNET_ROOT_LINE);
    }
    outcome
}
