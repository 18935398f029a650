//! Package-manager location and the environment handed to child processes.
//!
//! Nothing here mutates the provisioning process's own environment. Later
//! steps see package-manager changes because every invocation built through
//! [`Toolchain::command`] carries them explicitly.
use crate::command::Invocation;
use std::env;
use std::path::{Path, PathBuf};

pub const BREW: &str = "brew";

/// Where the official installer puts Homebrew on Apple silicon and Intel.
const BREW_PREFIXES: &[&str] = &["/opt/homebrew/bin/brew", "/usr/local/bin/brew"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    brew: String,
    env: Vec<(String, String)>,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            brew: BREW.to_string(),
            env: Vec::new(),
        }
    }
}

impl Toolchain {
    /// Build an invocation that carries the toolchain environment.
    pub fn command<I, S>(&self, program: &str, args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Invocation::new(program, args).with_env(&self.env)
    }

    /// Build a package-manager invocation.
    pub fn brew<I, S>(&self, args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command(&self.brew, args)
    }

    pub fn env(&self) -> &[(String, String)] {
        &self.env
    }

    /// Set or replace one environment variable for later invocations.
    pub fn set_env(&mut self, key: &str, value: &str) {
        self.env.retain(|(existing, _)| existing != key);
        self.env.push((key.to_string(), value.to_string()));
    }

    /// Point at a located package manager and put its bin directory first on
    /// `PATH`, so formulae installed during this run (`mas`, `dockutil`,
    /// `dotnet`) resolve for later steps.
    pub fn use_brew_at(&mut self, brew: &Path) {
        self.brew = brew.display().to_string();
        let Some(bin_dir) = brew.parent() else {
            return;
        };
        let mut dirs = vec![bin_dir.to_path_buf()];
        if let Some(path) = env::var_os("PATH") {
            dirs.extend(env::split_paths(&path).filter(|dir| dir.as_path() != bin_dir));
        }
        match env::join_paths(dirs) {
            Ok(joined) => self.set_env("PATH", &joined.to_string_lossy()),
            Err(err) => tracing::warn!(error = %err, "cannot extend PATH with brew directory"),
        }
    }
}

/// Find the package manager on `PATH` or at a well-known install prefix.
pub fn locate_brew() -> Option<PathBuf> {
    if let Ok(found) = which::which(BREW) {
        return Some(found);
    }
    BREW_PREFIXES
        .iter()
        .map(PathBuf::from)
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_toolchain_uses_bare_brew() {
        let toolchain = Toolchain::default();
        let invocation = toolchain.brew(["install", "git"]);
        assert_eq!(invocation.display(), "brew install git");
        assert!(invocation.env.is_empty());
    }

    #[test]
    fn set_env_replaces_existing_value() {
        let mut toolchain = Toolchain::default();
        toolchain.set_env("HOMEBREW_NO_INSTALL_CLEANUP", "0");
        toolchain.set_env("HOMEBREW_NO_INSTALL_CLEANUP", "1");
        assert_eq!(
            toolchain.env(),
            &[("HOMEBREW_NO_INSTALL_CLEANUP".to_string(), "1".to_string())]
        );
        let invocation = toolchain.command("mas", ["install", "1"]);
        assert_eq!(invocation.env, toolchain.env());
    }

    #[test]
    fn located_brew_leads_path() {
        let mut toolchain = Toolchain::default();
        toolchain.use_brew_at(Path::new("/opt/homebrew/bin/brew"));
        assert_eq!(toolchain.brew(["--version"]).program, "/opt/homebrew/bin/brew");
        let (_, path) = toolchain
            .env()
            .iter()
            .find(|(key, _)| key == "PATH")
            .expect("PATH override");
        assert!(path.starts_with("/opt/homebrew/bin"));
    }
}
