use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use pdfsig::{
    cli::{Cli, Operation},
    config::Config,
    logging::init_logging,
    DigestRequest, LtvRequest, PdfSigner, PrepareRequest, ProcessInvoker, SignRequest,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let mut cfg = Config::load();
    if let Some(engine) = &args.engine {
        cfg.set("PDFSIG_ENGINE", engine.as_str());
    }
    if let Some(java) = &args.java {
        cfg.set("PDFSIG_JAVA", java.as_str());
    }
    if let Some(jar) = &args.jar {
        // An explicit jar beats a configured direct executable.
        cfg.set("PDFSIG_ENGINE", "");
        cfg.set("PDFSIG_JAR", jar.as_str());
    }

    let level = args.log_level.clone().unwrap_or_else(|| cfg.log_level());
    init_logging(&level, args.log_format);

    let engine = cfg.engine();
    info!(program = %engine.program, "using engine");
    let signer = PdfSigner::new(ProcessInvoker::new(engine));

    let name = args.operation.name();
    let run = async {
        match args.operation.clone() {
            Operation::Prepare(a) => signer.prepare(&PrepareRequest::from(a)).await,
            Operation::Digest(a) => signer.digest(&DigestRequest::from(a)).await,
            Operation::Sign(a) => signer.sign(&SignRequest::from(a)).await,
            Operation::Ltv(a) => signer.add_ltv(&LtvRequest::from(a)).await,
        }
    };

    let result = match args.timeout {
        Some(secs) => tokio::time::timeout(Duration::from_secs(secs), run)
            .await
            .map_err(|_| anyhow!("{} timed out after {}s", name, secs))?,
        None => run.await,
    }
    .with_context(|| format!("{} failed", name))?;

    if args.json {
        let value = serde_json::json!({ "operation": name, "result": result });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", result);
    }
    Ok(())
}
