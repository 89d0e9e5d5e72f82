//! Command gateway: encode → invoke → decode for one engine operation.

use tracing::{debug, warn};

use crate::{
    args::ParameterSet,
    engine::{EngineCommand, Invoker},
    error::{Error, Result},
    protocol::parse_response,
};

/// Stateless front door to the engine. Each call spawns exactly one process.
#[derive(Debug, Clone)]
pub struct Gateway<I> {
    invoker: I,
}

impl<I: Invoker> Gateway<I> {
    pub fn new(invoker: I) -> Self {
        Self { invoker }
    }

    pub fn invoker(&self) -> &I {
        &self.invoker
    }

    /// Run `command` and return the engine's `RESULT` on success.
    ///
    /// `Ok(None)` means the engine succeeded without a payload.
    pub async fn execute(&self, command: EngineCommand, params: &ParameterSet) -> Result<Option<String>> {
        let args = params.encode();
        debug!(command = command.name(), args = args.len(), "executing engine command");

        let raw = self.invoker.invoke(command, &args).await?;
        let record = parse_response(&raw.text)?;

        if record.is_success() {
            return Ok(record.result);
        }
        warn!(
            command = command.name(),
            status = record.status.as_deref().unwrap_or("<none>"),
            error_type = record.error_type.as_deref().unwrap_or("<none>"),
            "engine reported failure"
        );
        Err(Error::Engine { error_type: record.error_type, message: record.error_message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{engine::LaunchError, protocol::DecodeError, testing::ScriptedInvoker};

    #[tokio::test]
    async fn resolves_with_result_on_success() {
        let inv = ScriptedInvoker::replying("STATUS=SUCCESS\nRESULT=HELLO\n");
        let gw = Gateway::new(inv.clone());
        let params = ParameterSet::new().with("a", "b");

        let out = gw.execute(EngineCommand::CalculateDigest, &params).await.unwrap();
        assert_eq!(out.as_deref(), Some("HELLO"));

        let calls = inv.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, EngineCommand::CalculateDigest);
        assert_eq!(calls[0].1, vec!["--a", "b"]);
    }

    #[tokio::test]
    async fn success_without_payload() {
        let gw = Gateway::new(ScriptedInvoker::replying("STATUS=SUCCESS"));
        let out = gw.execute(EngineCommand::SignDocument, &ParameterSet::new()).await.unwrap();
        assert_eq!(out, None);
    }

    #[tokio::test]
    async fn engine_error_carries_type_and_message() {
        let gw = Gateway::new(ScriptedInvoker::replying(
            "STATUS=ERROR\nERROR_TYPE=DocumentException\nERROR_MESSAGE=Error\n",
        ));
        let err = gw.execute(EngineCommand::SignDocument, &ParameterSet::new()).await.unwrap_err();
        match err {
            Error::Engine { error_type, message } => {
                assert_eq!(error_type.as_deref(), Some("DocumentException"));
                assert_eq!(message.as_deref(), Some("Error"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_status_is_an_engine_error() {
        let gw = Gateway::new(ScriptedInvoker::replying("RESULT=orphan\n"));
        let err = gw.execute(EngineCommand::SignDocument, &ParameterSet::new()).await.unwrap_err();
        assert!(matches!(err, Error::Engine { error_type: None, message: None }));
    }

    #[tokio::test]
    async fn decode_errors_propagate_unchanged() {
        let gw = Gateway::new(ScriptedInvoker::replying("random string"));
        let err = gw.execute(EngineCommand::SignDocument, &ParameterSet::new()).await.unwrap_err();
        assert!(matches!(err, Error::Decode(DecodeError::MalformedLine(ref l)) if l == "random string"));

        let gw = Gateway::new(ScriptedInvoker::replying("UNSUPPORTED_KEY=value\n"));
        let err = gw.execute(EngineCommand::SignDocument, &ParameterSet::new()).await.unwrap_err();
        assert!(matches!(err, Error::Decode(DecodeError::UnsupportedKey(ref k)) if k == "UNSUPPORTED_KEY"));
    }

    #[tokio::test]
    async fn launch_errors_propagate_unchanged() {
        let gw = Gateway::new(ScriptedInvoker::failing());
        let err = gw.execute(EngineCommand::SignDocument, &ParameterSet::new()).await.unwrap_err();
        assert!(matches!(err, Error::Launch(LaunchError::Spawn { .. })));
    }
}
