use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use log::debug;
use thiserror::Error;

use super::InputFiles;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Why a delegated render did not produce a report. Never fatal.
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Failed to start generator {}: {source}", script.display())]
    Spawn {
        script: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed waiting on generator {}: {source}", script.display())]
    Wait {
        script: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Generator {} timed out after {}s", script.display(), timeout.as_secs())]
    TimedOut { script: PathBuf, timeout: Duration },

    #[error("Generator {} exited with {status}", script.display())]
    Failed { script: PathBuf, status: ExitStatus },
}

/// A report script run as `<interpreter> <script> --terminals .. --fsts ..
/// --solution .. --output ..`.
#[derive(Debug, Clone)]
pub struct ExternalGenerator {
    interpreter: String,
    script: PathBuf,
    timeout: Duration,
    verbose: bool,
}

impl ExternalGenerator {
    pub fn new(interpreter: impl Into<String>, script: PathBuf, timeout: Duration) -> Self {
        Self {
            interpreter: interpreter.into(),
            script,
            timeout,
            verbose: false,
        }
    }

    /// Let the generator write to the terminal instead of discarding its output.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn script(&self) -> &Path {
        &self.script
    }

    pub fn is_available(&self) -> bool {
        self.script.is_file()
    }

    fn command(&self, inputs: &InputFiles, output: &Path) -> Command {
        let mut command = Command::new(&self.interpreter);
        command
            .arg(&self.script)
            .arg("--terminals")
            .arg(&inputs.terminals)
            .arg("--fsts")
            .arg(&inputs.fsts)
            .arg("--solution")
            .arg(&inputs.solution)
            .arg("--output")
            .arg(output)
            .stdin(Stdio::null());
        if !self.verbose {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }
        command
    }

    /// Run the script and wait at most the configured timeout for it.
    pub fn generate(&self, inputs: &InputFiles, output: &Path) -> Result<(), GeneratorError> {
        debug!(
            "Delegating report to {} {}",
            self.interpreter,
            self.script.display()
        );
        let mut child =
            self.command(inputs, output)
                .spawn()
                .map_err(|source| GeneratorError::Spawn {
                    script: self.script.clone(),
                    source,
                })?;

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            let polled = child.try_wait().map_err(|source| GeneratorError::Wait {
                script: self.script.clone(),
                source,
            })?;
            if let Some(status) = polled {
                break status;
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(GeneratorError::TimedOut {
                    script: self.script.clone(),
                    timeout: self.timeout,
                });
            }
            thread::sleep(POLL_INTERVAL);
        };

        if status.success() {
            Ok(())
        } else {
            Err(GeneratorError::Failed {
                script: self.script.clone(),
                status,
            })
        }
    }
}
