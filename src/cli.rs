use clap::{Args, Parser, Subcommand};

use crate::{
    logging::LogFormat,
    pdf::{CertificationLevel, DigestRequest, HashAlgorithm, LtvRequest, PrepareRequest, SignRequest},
};

#[derive(Parser, Debug, Clone)]
#[command(name = "pdfsig", about = "Drive the PDF signatures engine from the command line", version)]
pub struct Cli {
    /// Engine executable to run directly (overrides PDFSIG_ENGINE).
    #[arg(long, global = true)]
    pub engine: Option<String>,

    /// Java runtime used to start the engine jar (overrides PDFSIG_JAVA).
    #[arg(long, global = true)]
    pub java: Option<String>,

    /// Path to the engine jar (overrides PDFSIG_JAR).
    #[arg(long, global = true)]
    pub jar: Option<String>,

    /// Give up after this many seconds and kill the engine.
    #[arg(long, global = true, value_parser = clap::value_parser!(u64))]
    pub timeout: Option<u64>,

    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[arg(long = "log-format", global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Print the result as a JSON object.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub operation: Operation,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Operation {
    /// Add a signature placeholder and print the document digest.
    #[command(name = "prepare-document")]
    Prepare(PrepareArgs),
    /// Print the document digest, signatures excluded.
    #[command(name = "calculate-digest")]
    Digest(DigestArgs),
    /// Embed an external signature and print the signed document path.
    #[command(name = "sign-document")]
    Sign(SignArgs),
    /// Embed CRL/OCSP validation data and print the new document path.
    #[command(name = "add-ltv-information")]
    Ltv(LtvArgs),
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Prepare(_) => "prepare-document",
            Operation::Digest(_) => "calculate-digest",
            Operation::Sign(_) => "sign-document",
            Operation::Ltv(_) => "add-ltv-information",
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct PrepareArgs {
    /// Path to the document.
    #[arg(long)]
    pub file: String,
    /// Where to write the prepared document.
    #[arg(long)]
    pub out: String,
    /// Bytes reserved for the signature (engine default 30000).
    #[arg(long = "estimated-size")]
    pub estimated_size: Option<u32>,
    /// 0 not certified, 1 no changes, 2 form filling, 3 form filling and annotations.
    #[arg(long = "cert-level")]
    pub cert_level: Option<CertificationLevel>,
    #[arg(long)]
    pub password: Option<String>,
    /// SHA-256, SHA-384 or SHA-512 (engine default SHA-512).
    #[arg(long)]
    pub algorithm: Option<HashAlgorithm>,
    #[arg(long)]
    pub reason: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub contact: Option<String>,
    /// Signing time, ISO 8601.
    #[arg(long)]
    pub date: Option<String>,
}

impl From<PrepareArgs> for PrepareRequest {
    fn from(a: PrepareArgs) -> Self {
        PrepareRequest {
            file: Some(a.file),
            out: Some(a.out),
            estimated_size: a.estimated_size,
            cert_level: a.cert_level,
            password: a.password,
            algorithm: a.algorithm,
            reason: a.reason,
            location: a.location,
            contact: a.contact,
            date: a.date,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct DigestArgs {
    #[arg(long)]
    pub file: String,
    #[arg(long)]
    pub password: Option<String>,
    #[arg(long)]
    pub algorithm: Option<HashAlgorithm>,
}

impl From<DigestArgs> for DigestRequest {
    fn from(a: DigestArgs) -> Self {
        DigestRequest { file: Some(a.file), password: a.password, algorithm: a.algorithm }
    }
}

#[derive(Args, Debug, Clone)]
pub struct SignArgs {
    #[arg(long)]
    pub file: String,
    #[arg(long)]
    pub out: String,
    /// Base64-encoded external signature.
    #[arg(long)]
    pub signature: String,
    #[arg(long)]
    pub password: Option<String>,
}

impl From<SignArgs> for SignRequest {
    fn from(a: SignArgs) -> Self {
        SignRequest {
            file: Some(a.file),
            out: Some(a.out),
            signature: Some(a.signature),
            password: a.password,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct LtvArgs {
    #[arg(long)]
    pub file: String,
    #[arg(long)]
    pub out: String,
    /// Base64-encoded CRL. Repeat for several.
    #[arg(long, action = clap::ArgAction::Append)]
    pub crl: Vec<String>,
    /// Base64-encoded OCSP response. Repeat for several.
    #[arg(long, action = clap::ArgAction::Append)]
    pub ocsp: Vec<String>,
    #[arg(long)]
    pub password: Option<String>,
}

impl From<LtvArgs> for LtvRequest {
    fn from(a: LtvArgs) -> Self {
        LtvRequest {
            file: Some(a.file),
            out: Some(a.out),
            crl: Some(a.crl),
            ocsp: Some(a.ocsp),
            password: a.password,
        }
    }
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ltv_with_repeated_flags() {
        let cli = <Cli as Parser>::try_parse_from([
            "pdfsig", "--jar", "/opt/e.jar", "add-ltv-information", "--file", "a.pdf", "--out", "b.pdf",
            "--crl", "c1", "--crl", "c2",
        ])
        .unwrap();
        assert_eq!(cli.jar.as_deref(), Some("/opt/e.jar"));
        let Operation::Ltv(args) = cli.operation else { panic!("expected ltv") };
        let req = LtvRequest::from(args);
        assert_eq!(req.crl, Some(vec!["c1".to_string(), "c2".to_string()]));
        assert_eq!(req.ocsp, Some(vec![]));
    }

    #[test]
    fn parses_prepare_typed_options() {
        let cli = <Cli as Parser>::try_parse_from([
            "pdfsig", "prepare-document", "--file", "a.pdf", "--out", "b.pdf", "--cert-level", "2",
            "--algorithm", "sha256", "--timeout", "5",
        ])
        .unwrap();
        assert_eq!(cli.timeout, Some(5));
        let Operation::Prepare(args) = cli.operation else { panic!("expected prepare") };
        assert_eq!(args.cert_level, Some(CertificationLevel::FormFilling));
        assert_eq!(args.algorithm, Some(HashAlgorithm::Sha256));
    }

    #[test]
    fn sign_requires_signature_flag() {
        assert!(<Cli as Parser>::try_parse_from([
            "pdfsig", "sign-document", "--file", "a.pdf", "--out", "b.pdf",
        ])
        .is_err());
    }
}
