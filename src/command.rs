//! External command invocation.
//!
//! Every side effect of a provisioning run is delegated to an external
//! program. A non-zero exit is an ordinary outcome, never an error: callers
//! decide whether to warn and continue.
use std::fmt;
use std::process::{Command, ExitStatus, Stdio};

/// A program, its argument vector, and environment overrides for the child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            env: Vec::new(),
        }
    }

    pub fn with_env(mut self, env: &[(String, String)]) -> Self {
        self.env.extend(env.iter().cloned());
        self
    }

    /// Shell-quoted rendering for logs and operator messages.
    pub fn display(&self) -> String {
        let mut words = Vec::with_capacity(self.args.len() + 1);
        words.push(self.program.as_str());
        words.extend(self.args.iter().map(String::as_str));
        shell_words::join(words)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// How a child process ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Success,
    /// Exited unsuccessfully; `None` when terminated by a signal.
    Failed { code: Option<i32> },
    /// The program could not be started at all.
    NotStarted { reason: String },
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        matches!(self, CommandOutcome::Success)
    }

    fn from_status(status: ExitStatus) -> Self {
        if status.success() {
            CommandOutcome::Success
        } else {
            CommandOutcome::Failed {
                code: status.code(),
            }
        }
    }
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandOutcome::Success => f.write_str("success"),
            CommandOutcome::Failed { code: Some(code) } => write!(f, "exit status {code}"),
            CommandOutcome::Failed { code: None } => f.write_str("terminated by signal"),
            CommandOutcome::NotStarted { reason } => write!(f, "could not start: {reason}"),
        }
    }
}

/// Seam between provisioning steps and the operating system.
///
/// All calls are synchronous and have no timeout.
pub trait CommandRunner: Send + Sync {
    /// Run with stdin, stdout and stderr connected to the operator's terminal.
    fn run(&self, invocation: &Invocation) -> CommandOutcome;

    /// Run silently; used for cheap presence checks.
    fn probe(&self, invocation: &Invocation) -> CommandOutcome;

    /// Run and return trimmed stdout when the command succeeds.
    fn capture(&self, invocation: &Invocation) -> Option<String>;
}

/// Runs invocations as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    fn command(invocation: &Invocation) -> Command {
        tracing::debug!(command = %invocation, "running external command");
        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args);
        command.envs(invocation.env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        command
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> CommandOutcome {
        let status = Self::command(invocation)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status();
        outcome_of(invocation, status)
    }

    fn probe(&self, invocation: &Invocation) -> CommandOutcome {
        let status = Self::command(invocation)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        outcome_of(invocation, status)
    }

    fn capture(&self, invocation: &Invocation) -> Option<String> {
        let output = Self::command(invocation)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output();
        match output {
            Ok(output) if output.status.success() => {
                Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
            }
            Ok(output) => {
                tracing::debug!(command = %invocation, status = %output.status, "capture failed");
                None
            }
            Err(err) => {
                tracing::debug!(command = %invocation, error = %err, "capture did not start");
                None
            }
        }
    }
}

fn outcome_of(invocation: &Invocation, status: std::io::Result<ExitStatus>) -> CommandOutcome {
    let outcome = match status {
        Ok(status) => CommandOutcome::from_status(status),
        Err(err) => CommandOutcome::NotStarted {
            reason: err.to_string(),
        },
    };
    if !outcome.success() {
        tracing::debug!(command = %invocation, outcome = %outcome, "external command failed");
    }
    outcome
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted runner double shared by step and pipeline tests.
    use super::{CommandOutcome, CommandRunner, Invocation};
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub(crate) struct ScriptedRunner {
        calls: Mutex<Vec<Invocation>>,
        failing: Vec<String>,
        outputs: HashMap<String, String>,
    }

    impl ScriptedRunner {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        /// Make every invocation whose words join to `command` fail.
        pub(crate) fn failing(mut self, command: &str) -> Self {
            self.failing.push(command.to_string());
            self
        }

        /// Make `capture` of `command` return `stdout`.
        pub(crate) fn with_output(mut self, command: &str, stdout: &str) -> Self {
            self.outputs.insert(command.to_string(), stdout.to_string());
            self
        }

        /// Space-joined words of every invocation seen, in order.
        pub(crate) fn calls(&self) -> Vec<String> {
            self.invocations().iter().map(key).collect()
        }

        pub(crate) fn invocations(&self) -> Vec<Invocation> {
            self.calls.lock().expect("calls lock").clone()
        }

        fn record(&self, invocation: &Invocation) -> CommandOutcome {
            self.calls
                .lock()
                .expect("calls lock")
                .push(invocation.clone());
            if self.failing.contains(&key(invocation)) {
                CommandOutcome::Failed { code: Some(1) }
            } else {
                CommandOutcome::Success
            }
        }
    }

    fn key(invocation: &Invocation) -> String {
        let mut words = vec![invocation.program.as_str()];
        words.extend(invocation.args.iter().map(String::as_str));
        words.join(" ")
    }

    impl CommandRunner for ScriptedRunner {
        fn run(&self, invocation: &Invocation) -> CommandOutcome {
            self.record(invocation)
        }

        fn probe(&self, invocation: &Invocation) -> CommandOutcome {
            self.record(invocation)
        }

        fn capture(&self, invocation: &Invocation) -> Option<String> {
            if !self.record(invocation).success() {
                return None;
            }
            Some(
                self.outputs
                    .get(&key(invocation))
                    .cloned()
                    .unwrap_or_default(),
            )
        }
    }
}
