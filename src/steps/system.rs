//! Operating-system level steps: credentials, updates, Rosetta, restart.
use super::shapes::{attempt, ensure, Ensure, EnsureOutcome};
use super::{Flow, Session};
use crate::command::Invocation;
use crate::terminal::DefaultAnswer;

const START_BANNER: &[&str] = &[
    r" _           _        _ _       _     ",
    r"(_)         | |      | | |     | |    ",
    r" _ _ __  ___| |_ __ _| | |  ___| |__  ",
    r"| | |_ \/ __| __/ _  | | | / __| |_ \ ",
    r"| | | | \__ \ || (_| | | |_\__ \ | | |",
    r"|_|_| |_|___/\__\__,_|_|_(_)___/_| |_|",
];

const FINISH_BANNER: &[&str] = &[
    r"______ _____ _   _  _____ ",
    r"|  _  \  _  | \ | ||  ___|",
    r"| | | | | | |  \| || |__  ",
    r"| | | | | | | .   ||  __| ",
    r"| |/ /\ \_/ / |\  || |___ ",
    r"|___/  \___/\_| \_/\____/ ",
];

fn print_banner(session: &mut Session<'_>, banner: &[&str]) {
    for line in banner {
        session.term.say(line);
    }
    session.term.blank();
    session.term.blank();
}

pub fn print_start_banner(session: &mut Session<'_>) {
    session.term.clear();
    print_banner(session, START_BANNER);
}

/// Refresh the cached sudo credential so later steps run unattended.
///
/// A failure is reported, not fatal: privileged steps will fail on their own.
pub fn refresh_credentials(session: &mut Session<'_>) -> bool {
    session.term.say("Enter root password");
    match attempt(session, &Invocation::new("sudo", ["-v"])) {
        Ok(()) => true,
        Err(outcome) => {
            session
                .term
                .say(format!("Error refreshing root credentials: {outcome}"));
            false
        }
    }
}

pub fn update_macos(session: &mut Session<'_>) -> EnsureOutcome {
    session.term.clear();
    ensure(
        session,
        Ensure {
            subject: "macOS updates",
            probe: None,
            gate: None,
            announce: "Updating macOS...",
            action: Invocation::new("sudo", ["softwareupdate", "-i", "-a"]),
        },
    )
}

pub fn install_rosetta(session: &mut Session<'_>) -> EnsureOutcome {
    ensure(
        session,
        Ensure {
            subject: "Rosetta",
            probe: Some(Invocation::new("arch", ["-x86_64", "/usr/bin/true"])),
            gate: None,
            announce: "Installing Rosetta...",
            action: Invocation::new(
                "sudo",
                ["softwareupdate", "--install-rosetta", "--agree-to-license"],
            ),
        },
    )
}

/// Offer a restart. On yes the restart command is issued and the pipeline
/// must stop, whatever the command's outcome.
pub fn finish_and_restart(session: &mut Session<'_>) -> Flow {
    session.term.clear();
    print_banner(session, FINISH_BANNER);
    if !session
        .term
        .confirm("Would you like to reboot now?", DefaultAnswer::No)
    {
        session.term.say("Reboot canceled.");
        return Flow::Continue;
    }
    let outcome = session.run(&Invocation::new("sudo", ["reboot"]));
    if !outcome.success() {
        session.term.say(format!("Error rebooting: {outcome}"));
    }
    Flow::Restart(outcome)
}
