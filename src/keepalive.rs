//! Background credential keep-alive.
//!
//! A single worker re-runs a silent probe at a fixed interval so long
//! installs never stall on a password prompt. Failures are logged and never
//! reach the pipeline.
use crate::command::{CommandRunner, Invocation};
use anyhow::{Context, Result};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(60);

/// Non-interactive sudo check; refreshes the cached credential timestamp.
pub fn credential_probe() -> Invocation {
    Invocation::new("sudo", ["-n", "true"])
}

/// Handle to the running keep-alive worker. Dropping it stops the loop.
pub struct KeepAlive {
    stop: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl KeepAlive {
    /// Spawn the worker. The first probe runs one interval after start.
    pub fn start(
        runner: Arc<dyn CommandRunner>,
        probe: Invocation,
        interval: Duration,
    ) -> Result<Self> {
        let (stop, stopped) = mpsc::channel::<()>();
        let worker = thread::Builder::new()
            .name("keepalive".to_string())
            .spawn(move || loop {
                match stopped.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {}
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
                let outcome = runner.probe(&probe);
                if !outcome.success() {
                    tracing::warn!(command = %probe, outcome = %outcome, "keep-alive probe failed");
                }
            })
            .context("spawn keep-alive worker")?;
        tracing::debug!(interval_secs = interval.as_secs_f64(), "keep-alive started");
        Ok(Self {
            stop: Some(stop),
            worker: Some(worker),
        })
    }

    /// Stop the loop and wait for an in-flight probe to finish.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(stop) = self.stop.take() {
            stop.send(()).ok();
        }
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::warn!("keep-alive worker panicked");
            }
        }
    }
}

impl Drop for KeepAlive {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::testing::ScriptedRunner;

    #[test]
    fn probes_repeatedly_until_stopped() {
        let runner = Arc::new(ScriptedRunner::new());
        let keepalive = KeepAlive::start(
            runner.clone(),
            credential_probe(),
            Duration::from_millis(5),
        )
        .expect("start keep-alive");
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while runner.calls().len() < 2 && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        keepalive.stop();

        let seen = runner.calls();
        assert!(seen.len() >= 2, "expected repeated probes, saw {seen:?}");
        assert!(seen.iter().all(|call| call == "sudo -n true"));

        thread::sleep(Duration::from_millis(30));
        assert_eq!(runner.calls().len(), seen.len());
    }

    #[test]
    fn failing_probe_does_not_end_the_loop() {
        let runner = Arc::new(ScriptedRunner::new().failing("sudo -n true"));
        let keepalive = KeepAlive::start(
            runner.clone(),
            credential_probe(),
            Duration::from_millis(5),
        )
        .expect("start keep-alive");
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while runner.calls().len() < 3 && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        drop(keepalive);
        assert!(runner.calls().len() >= 3);
    }

    #[test]
    fn stop_before_first_interval_runs_no_probe() {
        let runner = Arc::new(ScriptedRunner::new());
        let keepalive =
            KeepAlive::start(runner.clone(), credential_probe(), Duration::from_secs(60))
                .expect("start keep-alive");
        keepalive.stop();
        assert!(runner.calls().is_empty());
    }
}
