use crate::cert::SerialNumber;
use crate::cli::args::*;
use crate::intake::{AddCertificateRequest, IntakeValidator};
use crate::lookup::LookupSource;
use crate::refresh::Refresher;
use crate::signer::{DigestSigner, ResponseSigner};
use crate::store::FileStore;
use crate::utils::errors::{OcspCacheError, Result};
use base64::{engine::general_purpose, Engine as _};
use chrono::Duration;
use std::io::{self, Read};
use std::sync::Arc;

pub async fn handle_command(cli: Cli) -> Result<()> {
    // Initialize logging - always to stderr
    if !cli.quiet {
        let log_level = match cli.verbose {
            0 => "ocsp_cache=warn",  // Default: warnings only
            1 => "ocsp_cache=info",  // -v: info level
            2 => "ocsp_cache=debug", // -vv: debug level
            _ => "ocsp_cache=trace", // -vvv+: trace level
        };

        tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_env_filter(log_level)
            .init();
    }

    let store = Arc::new(FileStore::open(&cli.store_dir)?);

    match cli.command {
        Commands::Add {
            ref file,
            no_initial_response,
            validity_secs,
        } => handle_add(store, file, no_initial_response, validity_secs).await,
        Commands::Refresh {
            poll_secs,
            validity_secs,
        } => handle_refresh(store, poll_secs, validity_secs).await,
        Commands::Respond {
            ref serial,
            ref aki,
        } => handle_respond(store, serial, aki).await,
    }
}

async fn handle_add(
    store: Arc<FileStore>,
    file: &str,
    no_initial_response: bool,
    validity_secs: u64,
) -> Result<()> {
    let content = if file == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(file)?
    };

    let request: AddCertificateRequest = serde_json::from_str(&content)
        .map_err(|e| OcspCacheError::InvalidRequest(format!("Malformed request document: {e}")))?;

    let signer: Option<Arc<dyn ResponseSigner>> = if no_initial_response {
        None
    } else {
        Some(Arc::new(DigestSigner::new(Duration::seconds(
            validity_secs as i64,
        ))))
    };

    IntakeValidator::new(store, signer).process(request).await?;

    // Empty success envelope
    println!("{{}}");
    Ok(())
}

async fn handle_refresh(store: Arc<FileStore>, poll_secs: u64, validity_secs: u64) -> Result<()> {
    let refresher = Refresher::new(
        store,
        Arc::new(DigestSigner::new(Duration::seconds(validity_secs as i64))),
        Duration::seconds(validity_secs as i64),
        std::time::Duration::from_secs(poll_secs),
    );

    let (mut handle, shutdown) = refresher.start();

    tokio::select! {
        // The loop only returns on its own when the store or signer failed.
        result = &mut handle => {
            return result
                .map_err(|e| OcspCacheError::Storage(format!("Refresher task failed: {e}")))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupt received");
            let _ = shutdown.send(()).await;
        }
    }

    handle
        .await
        .map_err(|e| OcspCacheError::Storage(format!("Refresher task failed: {e}")))?
}

async fn handle_respond(store: Arc<FileStore>, serial: &str, aki: &str) -> Result<()> {
    let parsed = SerialNumber::parse(serial).ok();
    let issuer_key_hash = hex::decode(aki)
        .map_err(|e| OcspCacheError::InvalidRequest(format!("aki is not hex-encoded: {e}")))?;

    let source = LookupSource::new(store);
    match source.respond(&issuer_key_hash, parsed.as_ref()).await {
        Some(body) => {
            println!("{}", general_purpose::STANDARD.encode(body));
            Ok(())
        }
        None => Err(OcspCacheError::CertNotFound(format!(
            "No response for serial {serial}"
        ))),
    }
}
