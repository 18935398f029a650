//! CLI argument parsing for the provisioning run.
//!
//! The CLI is intentionally thin: there are no subcommands, every flag only
//! points the fixed pipeline at its inputs or tunes terminal behavior.
use clap::Parser;
use std::path::PathBuf;

/// Default desired-state document, resolved against the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Shell profile that receives environment lines, relative to `$HOME`.
pub const DEFAULT_PROFILE_NAME: &str = ".zprofile";

/// Root CLI entrypoint for a provisioning run.
#[derive(Parser, Debug)]
#[command(
    name = "macdeploy",
    version,
    about = "Provision a macOS workstation from a declarative package list",
    after_help = "Steps (in order):\n  credential refresh, keep-alive, macOS update, Rosetta, Homebrew,\n  Homebrew environment, Homebrew health-check, formulae, casks,\n  App Store apps, .NET, default settings, Dock, Git identity,\n  cleanup, restart\n\nExamples:\n  macdeploy\n  macdeploy --config ~/dotfiles/config.yaml --no-clear\n  MACDEPLOY_LOG=debug macdeploy"
)]
pub struct RootArgs {
    /// Desired-state YAML document (casks, formulae, appStore, ...)
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Shell profile for environment lines (defaults to ~/.zprofile)
    #[arg(long, value_name = "PATH")]
    pub profile: Option<PathBuf>,

    /// Keep terminal output between steps instead of clearing it
    #[arg(long)]
    pub no_clear: bool,

    /// Emit debug diagnostics on stderr
    #[arg(long)]
    pub verbose: bool,
}

impl RootArgs {
    /// Resolve the shell profile path, falling back to `$HOME/.zprofile`.
    pub fn profile_path(&self) -> Option<PathBuf> {
        self.profile
            .clone()
            .or_else(|| dirs::home_dir().map(|home| home.join(DEFAULT_PROFILE_NAME)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_config() {
        let args = RootArgs::parse_from(["macdeploy"]);
        assert_eq!(args.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert!(!args.no_clear);
        assert!(!args.verbose);
    }

    #[test]
    fn explicit_profile_wins_over_home() {
        let args = RootArgs::parse_from(["macdeploy", "--profile", "/tmp/profile"]);
        assert_eq!(args.profile_path(), Some(PathBuf::from("/tmp/profile")));
    }
}
