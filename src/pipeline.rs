//! The fixed provisioning pipeline.
//!
//! Steps run strictly in order and are failure-isolated: whatever a step
//! reports, the next one runs. Only a confirmed restart ends the run early.
use crate::command::CommandOutcome;
use crate::config::DesiredState;
use crate::keepalive::{credential_probe, KeepAlive, KEEPALIVE_INTERVAL};
use crate::steps::{apps, homebrew, identity, settings, system, Flow, Session};
use crate::toolchain::locate_brew;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepId {
    RefreshCredentials,
    StartKeepAlive,
    UpdateMacos,
    InstallRosetta,
    InstallHomebrew,
    SetupHomebrewEnv,
    CheckHomebrew,
    InstallFormulae,
    InstallCasks,
    InstallAppStoreApps,
    InstallDotnet,
    ConfigureDefaultSettings,
    ConfigureDock,
    SetupGitIdentity,
    Cleanup,
    FinishAndRestart,
}

pub const PIPELINE: [StepId; 16] = [
    StepId::RefreshCredentials,
    StepId::StartKeepAlive,
    StepId::UpdateMacos,
    StepId::InstallRosetta,
    StepId::InstallHomebrew,
    StepId::SetupHomebrewEnv,
    StepId::CheckHomebrew,
    StepId::InstallFormulae,
    StepId::InstallCasks,
    StepId::InstallAppStoreApps,
    StepId::InstallDotnet,
    StepId::ConfigureDefaultSettings,
    StepId::ConfigureDock,
    StepId::SetupGitIdentity,
    StepId::Cleanup,
    StepId::FinishAndRestart,
];

impl StepId {
    pub fn name(self) -> &'static str {
        match self {
            StepId::RefreshCredentials => "refresh_credentials",
            StepId::StartKeepAlive => "start_keepalive",
            StepId::UpdateMacos => "update_macos",
            StepId::InstallRosetta => "install_rosetta",
            StepId::InstallHomebrew => "install_homebrew",
            StepId::SetupHomebrewEnv => "setup_homebrew_env",
            StepId::CheckHomebrew => "check_homebrew",
            StepId::InstallFormulae => "install_formulae",
            StepId::InstallCasks => "install_casks",
            StepId::InstallAppStoreApps => "install_app_store_apps",
            StepId::InstallDotnet => "install_dotnet",
            StepId::ConfigureDefaultSettings => "configure_default_settings",
            StepId::ConfigureDock => "configure_dock",
            StepId::SetupGitIdentity => "setup_git_identity",
            StepId::Cleanup => "cleanup",
            StepId::FinishAndRestart => "finish_and_restart",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub keepalive_interval: Duration,
    /// Look for an installed `brew` outside `PATH` before and after bootstrap.
    pub locate_brew: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            keepalive_interval: KEEPALIVE_INTERVAL,
            locate_brew: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    Completed,
    /// The operator confirmed a restart and the restart command was issued.
    Restarting(CommandOutcome),
}

pub struct Pipeline<'a> {
    session: Session<'a>,
    options: PipelineOptions,
    keepalive: Option<KeepAlive>,
}

impl<'a> Pipeline<'a> {
    pub fn new(session: Session<'a>, options: PipelineOptions) -> Self {
        Self {
            session,
            options,
            keepalive: None,
        }
    }

    /// Run every step against `config`. The keep-alive worker lives until
    /// this returns.
    pub fn run(mut self, config: &DesiredState) -> PipelineOutcome {
        system::print_start_banner(&mut self.session);
        let outcome = self.run_steps(config);
        if let Some(keepalive) = self.keepalive.take() {
            keepalive.stop();
        }
        outcome
    }

    fn run_steps(&mut self, config: &DesiredState) -> PipelineOutcome {
        for step in PIPELINE {
            let span = tracing::info_span!("step", name = step.name());
            let _entered = span.enter();
            tracing::debug!("step started");
            if let Flow::Restart(outcome) = self.run_step(step, config) {
                tracing::info!(outcome = %outcome, "restart requested");
                return PipelineOutcome::Restarting(outcome);
            }
        }
        PipelineOutcome::Completed
    }

    fn run_step(&mut self, step: StepId, config: &DesiredState) -> Flow {
        let summary = match step {
            StepId::RefreshCredentials => {
                if system::refresh_credentials(&mut self.session) {
                    "refreshed".to_string()
                } else {
                    "not refreshed".to_string()
                }
            }
            StepId::StartKeepAlive => {
                if self.start_keepalive() {
                    "running".to_string()
                } else {
                    "not running".to_string()
                }
            }
            StepId::UpdateMacos => system::update_macos(&mut self.session).to_string(),
            StepId::InstallRosetta => system::install_rosetta(&mut self.session).to_string(),
            StepId::InstallHomebrew => {
                self.refresh_toolchain();
                let outcome = homebrew::install_homebrew(&mut self.session);
                self.refresh_toolchain();
                outcome.to_string()
            }
            StepId::SetupHomebrewEnv => optional_summary(
                homebrew::setup_homebrew_env(&mut self.session),
                "no profile",
            ),
            StepId::CheckHomebrew => sequence_summary(homebrew::check_homebrew(&mut self.session)),
            StepId::InstallFormulae => {
                homebrew::install_formulae(&mut self.session, &config.formulae).to_string()
            }
            StepId::InstallCasks => {
                homebrew::install_casks(&mut self.session, &config.casks).to_string()
            }
            StepId::InstallAppStoreApps => optional_summary(
                apps::install_app_store_apps(&mut self.session, &config.app_store_items),
                "mas unavailable",
            ),
            StepId::InstallDotnet => apps::install_dotnet(&mut self.session).to_string(),
            StepId::ConfigureDefaultSettings => optional_summary(
                settings::configure_default_settings(
                    &mut self.session,
                    &config.default_setting_commands,
                ),
                "declined",
            ),
            StepId::ConfigureDock => {
                settings::configure_dock(&mut self.session, config).to_string()
            }
            StepId::SetupGitIdentity => identity::setup_git_identity(&mut self.session).to_string(),
            StepId::Cleanup => sequence_summary(homebrew::cleanup(&mut self.session)),
            StepId::FinishAndRestart => return system::finish_and_restart(&mut self.session),
        };
        tracing::info!(result = %summary, "step finished");
        Flow::Continue
    }

    fn start_keepalive(&mut self) -> bool {
        match KeepAlive::start(
            self.session.runner.clone(),
            credential_probe(),
            self.options.keepalive_interval,
        ) {
            Ok(handle) => {
                self.keepalive = Some(handle);
                true
            }
            Err(err) => {
                self.session
                    .term
                    .say(format!("Error starting sudo keep-alive: {err:#}"));
                false
            }
        }
    }

    fn refresh_toolchain(&mut self) {
        if !self.options.locate_brew {
            return;
        }
        if let Some(brew) = locate_brew() {
            self.session.toolchain.use_brew_at(&brew);
            tracing::debug!(
                brew = %brew.display(),
                env = ?self.session.toolchain.env(),
                "using located brew"
            );
        }
    }
}

fn optional_summary<T: fmt::Display>(value: Option<T>, missing: &str) -> String {
    value.map_or_else(|| missing.to_string(), |value| value.to_string())
}

fn sequence_summary(result: Result<(), CommandOutcome>) -> String {
    match result {
        Ok(()) => "ok".to_string(),
        Err(outcome) => format!("stopped: {outcome}"),
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
