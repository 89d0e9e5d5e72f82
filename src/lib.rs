//! Bridge to the external PDF signatures engine.
//!
//! Parameters are encoded into `--name "value"` arguments, the engine runs as a
//! child process, and its `KEY=value` response is decoded into a typed result.

pub mod args;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod pdf;
pub mod protocol;

#[cfg(test)]
mod testing;

pub use args::{EncodedArguments, ParamValue, ParameterSet};
pub use engine::{Engine, EngineCommand, Invoker, LaunchError, ProcessInvoker, RawOutput};
pub use error::{Error, Result};
pub use gateway::Gateway;
pub use pdf::{
    CertificationLevel, DigestRequest, HashAlgorithm, LtvRequest, PdfSigner, PrepareRequest, SignRequest,
};
pub use protocol::{parse_response, DecodeError, ProtocolKey, ResultRecord, Status};
