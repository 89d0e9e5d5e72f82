//! PDF signing operations: parameter validation and delegation to the engine.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    args::ParameterSet,
    engine::{EngineCommand, Invoker},
    error::{Error, Result},
    gateway::Gateway,
};

/// Signature size the engine reserves when `estimatedsize` is not given.
pub const DEFAULT_ESTIMATED_SIZE: u32 = 30_000;
/// Digest algorithm the engine uses when `algorithm` is not given.
pub const DEFAULT_HASH_ALGORITHM: HashAlgorithm = HashAlgorithm::Sha512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CertificationLevel {
    #[default]
    NotCertified = 0,
    NoChangesAllowed = 1,
    FormFilling = 2,
    FormFillingAndAnnotations = 3,
}

impl TryFrom<u8> for CertificationLevel {
    type Error = String;

    fn try_from(v: u8) -> std::result::Result<Self, Self::Error> {
        match v {
            0 => Ok(Self::NotCertified),
            1 => Ok(Self::NoChangesAllowed),
            2 => Ok(Self::FormFilling),
            3 => Ok(Self::FormFillingAndAnnotations),
            other => Err(format!("certification level must be 0-3, got {}", other)),
        }
    }
}

impl From<CertificationLevel> for u8 {
    fn from(level: CertificationLevel) -> Self {
        level as u8
    }
}

impl FromStr for CertificationLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let n: u8 = s
            .trim()
            .parse()
            .map_err(|_| format!("certification level must be 0-3, got {}", s))?;
        Self::try_from(n)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashAlgorithm {
    #[serde(rename = "SHA-256")]
    Sha256,
    #[serde(rename = "SHA-384")]
    Sha384,
    #[serde(rename = "SHA-512")]
    Sha512,
}

impl HashAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "SHA-256",
            HashAlgorithm::Sha384 => "SHA-384",
            HashAlgorithm::Sha512 => "SHA-512",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = String;

    /// Accepts `SHA-512`, `sha512`, `Sha-384` and so on.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "").as_str() {
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            _ => Err(format!("unsupported hash algorithm: {} (expected SHA-256, SHA-384 or SHA-512)", s)),
        }
    }
}

/// Add a signature placeholder to a document and compute its digest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepareRequest {
    pub file: Option<String>,
    pub out: Option<String>,
    #[serde(default, alias = "estimatedsize")]
    pub estimated_size: Option<u32>,
    #[serde(default, alias = "certlevel")]
    pub cert_level: Option<CertificationLevel>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub algorithm: Option<HashAlgorithm>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    /// ISO 8601 signing time.
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestRequest {
    pub file: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub algorithm: Option<HashAlgorithm>,
}

/// Embed an externally produced (base64) signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignRequest {
    pub file: Option<String>,
    pub out: Option<String>,
    pub signature: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Embed long-term validation data (base64 CRLs and OCSP responses).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LtvRequest {
    pub file: Option<String>,
    pub out: Option<String>,
    pub crl: Option<Vec<String>>,
    pub ocsp: Option<Vec<String>>,
    #[serde(default)]
    pub password: Option<String>,
}

fn present(v: &Option<String>) -> bool {
    v.as_deref().is_some_and(|s| !s.is_empty())
}

/// Collect the names whose check failed, in declaration order.
fn require(checks: &[(&'static str, bool)]) -> Result<()> {
    let missing: Vec<&str> = checks.iter().filter(|(_, ok)| !ok).map(|(n, _)| *n).collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::missing(&missing))
    }
}

impl PrepareRequest {
    pub fn validate(&self) -> Result<()> {
        require(&[("file", present(&self.file)), ("out", present(&self.out))])
    }

    pub fn to_params(&self) -> ParameterSet {
        ParameterSet::new()
            .with("file", self.file.clone())
            .with("out", self.out.clone())
            .with("estimatedsize", self.estimated_size.map(|n| n.to_string()))
            .with("certlevel", self.cert_level.map(|l| u8::from(l).to_string()))
            .with("password", self.password.clone())
            .with("algorithm", self.algorithm.map(|a| a.as_str()))
            .with("reason", self.reason.clone())
            .with("location", self.location.clone())
            .with("contact", self.contact.clone())
            .with("date", self.date.clone())
    }
}

impl DigestRequest {
    pub fn validate(&self) -> Result<()> {
        require(&[("file", present(&self.file))])
    }

    pub fn to_params(&self) -> ParameterSet {
        ParameterSet::new()
            .with("file", self.file.clone())
            .with("password", self.password.clone())
            .with("algorithm", self.algorithm.map(|a| a.as_str()))
    }
}

impl SignRequest {
    pub fn validate(&self) -> Result<()> {
        require(&[
            ("file", present(&self.file)),
            ("out", present(&self.out)),
            ("signature", present(&self.signature)),
        ])
    }

    pub fn to_params(&self) -> ParameterSet {
        ParameterSet::new()
            .with("file", self.file.clone())
            .with("out", self.out.clone())
            .with("signature", self.signature.clone())
            .with("password", self.password.clone())
    }
}

impl LtvRequest {
    pub fn validate(&self) -> Result<()> {
        require(&[
            ("file", present(&self.file)),
            ("out", present(&self.out)),
            ("crl", self.crl.is_some()),
            ("ocsp", self.ocsp.is_some()),
        ])
    }

    pub fn to_params(&self) -> ParameterSet {
        ParameterSet::new()
            .with("file", self.file.clone())
            .with("out", self.out.clone())
            .with("crl", self.crl.clone())
            .with("ocsp", self.ocsp.clone())
            .with("password", self.password.clone())
    }
}

/// Entry points for the four engine operations.
///
/// Each validates its request first; an invalid request never reaches the engine.
/// A successful response without a `RESULT` line comes back as an empty string;
/// use [`Gateway::execute`] through [`PdfSigner::gateway`] to tell it apart from
/// an empty payload.
#[derive(Debug, Clone)]
pub struct PdfSigner<I> {
    gateway: Gateway<I>,
}

impl<I: Invoker> PdfSigner<I> {
    pub fn new(invoker: I) -> Self {
        Self { gateway: Gateway::new(invoker) }
    }

    pub fn gateway(&self) -> &Gateway<I> {
        &self.gateway
    }

    /// Returns the base64 digest of the prepared document.
    pub async fn prepare(&self, req: &PrepareRequest) -> Result<String> {
        req.validate()?;
        self.run(EngineCommand::PrepareDocument, req.to_params()).await
    }

    /// Returns the base64 digest of the document, signatures excluded.
    pub async fn digest(&self, req: &DigestRequest) -> Result<String> {
        req.validate()?;
        self.run(EngineCommand::CalculateDigest, req.to_params()).await
    }

    /// Returns the path of the signed document.
    pub async fn sign(&self, req: &SignRequest) -> Result<String> {
        req.validate()?;
        self.run(EngineCommand::SignDocument, req.to_params()).await
    }

    /// Returns the path of the document with validation data.
    pub async fn add_ltv(&self, req: &LtvRequest) -> Result<String> {
        req.validate()?;
        self.run(EngineCommand::AddLtvInformation, req.to_params()).await
    }

    /// Missing `RESULT` maps to `""`.
    async fn run(&self, command: EngineCommand, params: ParameterSet) -> Result<String> {
        let result = self.gateway.execute(command, &params).await?;
        Ok(result.unwrap_or_default())
    }
}
