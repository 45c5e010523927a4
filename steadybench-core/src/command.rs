//! External Command Instance
//!
//! Times one spawn-and-wait of an external program. The dry run spawns a
//! trivial program the same way, so the baseline captures process launch
//! overhead and nothing else.

use crate::error::SampleError;
use crate::instance::Instance;
use crate::measure::Timer;
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;
use tracing::trace;

/// Program spawned by the default dry run
pub const DEFAULT_DRY_PROGRAM: &str = "true";

/// Failure of one timed command
#[derive(Debug, Error)]
pub enum CommandError {
    /// The program could not be started
    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        /// Program name
        program: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The program ran but reported failure
    #[error("'{program}' exited with {status}")]
    Exit {
        /// Program name
        program: String,
        /// Exit status
        status: ExitStatus,
    },
}

/// Benchmarks an external command
#[derive(Debug, Clone)]
pub struct CommandInstance {
    name: String,
    argv: Vec<String>,
    dry_argv: Vec<String>,
    show_output: bool,
}

impl CommandInstance {
    /// Command from an argument vector; the first element is the program.
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        Self {
            name: argv.join(" "),
            argv,
            dry_argv: vec![DEFAULT_DRY_PROGRAM.to_string()],
            show_output: false,
        }
    }

    /// Command run through `sh -c`. The dry run starts the same shell with
    /// an empty script.
    pub fn shell(script: impl Into<String>) -> Self {
        let script = script.into();
        Self {
            name: script.clone(),
            argv: vec!["sh".to_string(), "-c".to_string(), script],
            dry_argv: vec!["sh".to_string(), "-c".to_string(), ":".to_string()],
            show_output: false,
        }
    }

    /// Override the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Override the program used for dry runs
    pub fn with_dry_command<I, S>(mut self, argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dry_argv = argv.into_iter().map(Into::into).collect();
        self
    }

    /// Let the child write to our stdout/stderr instead of discarding it
    pub fn with_output(mut self, show_output: bool) -> Self {
        self.show_output = show_output;
        self
    }

    /// Program and arguments of the measured command
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    fn spawn_timed(&self, argv: &[String]) -> Result<f64, CommandError> {
        let (program, args) = argv.split_first().ok_or_else(|| CommandError::Spawn {
            program: String::new(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
        })?;

        let mut command = Command::new(program);
        command.args(args).stdin(Stdio::null());
        if !self.show_output {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }

        let timer = Timer::start();
        let status = command.status().map_err(|source| CommandError::Spawn {
            program: program.clone(),
            source,
        })?;
        let elapsed = timer.stop_secs();
        trace!(program = %program, elapsed, code = ?status.code(), "command finished");

        if !status.success() {
            return Err(CommandError::Exit {
                program: program.clone(),
                status,
            });
        }
        Ok(elapsed)
    }
}

impl Instance for CommandInstance {
    fn name(&self) -> &str {
        &self.name
    }

    fn single_run(&mut self) -> Result<f64, SampleError> {
        Ok(self.spawn_timed(&self.argv)?)
    }

    fn single_dry_run(&mut self) -> Result<f64, SampleError> {
        Ok(self.spawn_timed(&self.dry_argv)?)
    }

    fn validate(&self) -> Result<(), String> {
        match self.argv.first() {
            None => Err("no command given".to_string()),
            Some(program) if program.trim().is_empty() => Err("empty program name".to_string()),
            Some(_) if self.dry_argv.is_empty() => Err("empty dry-run command".to_string()),
            Some(_) => Ok(()),
        }
    }

    fn fresh(&self) -> Box<dyn Instance> {
        Box::new(self.clone())
    }
}
