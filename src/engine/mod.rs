//! External engine process management (spawn, capture, launch failures).

use std::{fmt, process::Stdio};

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

use crate::args::EncodedArguments;

/// Operations understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineCommand {
    PrepareDocument,
    CalculateDigest,
    SignDocument,
    AddLtvInformation,
}

impl EngineCommand {
    /// Token the engine dispatches on.
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineCommand::PrepareDocument => "placeholder",
            EngineCommand::CalculateDigest => "digest",
            EngineCommand::SignDocument => "sign",
            EngineCommand::AddLtvInformation => "ltv",
        }
    }

    /// Human-facing operation name.
    pub fn name(&self) -> &'static str {
        match self {
            EngineCommand::PrepareDocument => "prepare-document",
            EngineCommand::CalculateDigest => "calculate-digest",
            EngineCommand::SignDocument => "sign-document",
            EngineCommand::AddLtvInformation => "add-ltv-information",
        }
    }
}

impl fmt::Display for EngineCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How to start the engine: a program plus the arguments that precede the command token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Engine {
    pub program: String,
    pub leading_args: Vec<String>,
}

impl Engine {
    /// Run an executable directly.
    pub fn executable(program: impl Into<String>) -> Self {
        Self { program: program.into(), leading_args: Vec::new() }
    }

    /// Run a jar through `java -jar`.
    pub fn jar(java: impl Into<String>, jar: impl Into<String>) -> Self {
        Self { program: java.into(), leading_args: vec!["-jar".into(), jar.into()] }
    }

    /// Shell-style rendering of a full invocation, for logs and diagnostics.
    pub fn command_line(&self, command: EngineCommand, args: &EncodedArguments) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.leading_args.iter().cloned());
        parts.push(command.as_str().to_string());
        if !args.is_empty() {
            parts.push(args.to_string());
        }
        parts.join(" ")
    }
}

/// Output of a completed engine process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOutput {
    /// stdout, or stderr when stdout was empty.
    pub text: String,
    pub exit_code: Option<i32>,
}

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to spawn engine `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("engine `{program}` was terminated without an exit code")]
    Terminated { program: String },
    #[error("engine `{program}` exited with code {code} without any output")]
    Silent { program: String, code: i32 },
}

/// Runs one engine process per call.
#[async_trait]
pub trait Invoker: Send + Sync {
    async fn invoke(
        &self,
        command: EngineCommand,
        args: &EncodedArguments,
    ) -> Result<RawOutput, LaunchError>;
}

/// Spawns the engine as a child process.
///
/// No timeout is applied: a hung engine blocks the call until the caller drops
/// the future, which kills the child.
#[derive(Debug, Clone)]
pub struct ProcessInvoker {
    engine: Engine,
}

impl ProcessInvoker {
    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }
}

#[async_trait]
impl Invoker for ProcessInvoker {
    async fn invoke(
        &self,
        command: EngineCommand,
        args: &EncodedArguments,
    ) -> Result<RawOutput, LaunchError> {
        let program = self.engine.program.clone();
        debug!(command = %self.engine.command_line(command, args), "spawning engine");

        let mut cmd = Command::new(&program);
        cmd.args(&self.engine.leading_args)
            .arg(command.as_str())
            .args(args.to_argv())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let out = cmd
            .output()
            .await
            .map_err(|source| LaunchError::Spawn { program: program.clone(), source })?;

        let stdout = String::from_utf8_lossy(&out.stdout);
        let text = if stdout.is_empty() {
            String::from_utf8_lossy(&out.stderr).into_owned()
        } else {
            stdout.into_owned()
        };
        let exit_code = out.status.code();
        debug!(?exit_code, bytes = text.len(), "engine finished");

        match exit_code {
            None => Err(LaunchError::Terminated { program }),
            Some(code) if code != 0 && text.trim().is_empty() => {
                Err(LaunchError::Silent { program, code })
            }
            _ => Ok(RawOutput { text, exit_code }),
        }
    }
}
