//! In-process invoker double for unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::{
    args::EncodedArguments,
    engine::{EngineCommand, Invoker, LaunchError, RawOutput},
};

type Call = (EngineCommand, Vec<String>);

/// Replies with a fixed response (or a spawn failure) and records every call.
#[derive(Debug, Clone)]
pub struct ScriptedInvoker {
    reply: Option<String>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl ScriptedInvoker {
    pub fn replying(text: &str) -> Self {
        Self { reply: Some(text.to_string()), calls: Arc::default() }
    }

    pub fn failing() -> Self {
        Self { reply: None, calls: Arc::default() }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Invoker for ScriptedInvoker {
    async fn invoke(
        &self,
        command: EngineCommand,
        args: &EncodedArguments,
    ) -> Result<RawOutput, LaunchError> {
        self.calls.lock().unwrap().push((command, args.to_argv()));
        match &self.reply {
            Some(text) => Ok(RawOutput { text: text.clone(), exit_code: Some(0) }),
            None => Err(LaunchError::Spawn {
                program: "scripted".into(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such engine"),
            }),
        }
    }
}
