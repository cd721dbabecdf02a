use crate::cert::CertificateParser;
use crate::signer::{ResponseSigner, SignRequest};
use crate::store::Accessor;
use crate::utils::errors::Result;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Background task that keeps signed responses from going stale: on every
/// cycle it re-signs each response generation that is still valid, pushing
/// its expiry out to `now + validity_interval`.
///
/// Responses that are already stale are deliberately left alone; only the
/// intake path's initial signing puts an identity back into the refresh
/// set. The store and signer are correctness-critical here, so any failure
/// from either ends the loop with an error instead of degrading silently.
pub struct Refresher {
    store: Arc<dyn Accessor>,
    signer: Arc<dyn ResponseSigner>,
    validity_interval: Duration,
    poll_period: std::time::Duration,
}

impl Refresher {
    pub fn new(
        store: Arc<dyn Accessor>,
        signer: Arc<dyn ResponseSigner>,
        validity_interval: Duration,
        poll_period: std::time::Duration,
    ) -> Self {
        Self {
            store,
            signer,
            validity_interval,
            poll_period,
        }
    }

    /// Spawn the refresh loop. Dropping or sending on the returned channel
    /// stops the loop at the next cycle boundary.
    pub fn start(self) -> (JoinHandle<Result<()>>, mpsc::Sender<()>) {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
        let handle = tokio::spawn(async move { self.run(shutdown_rx).await });
        (handle, shutdown_tx)
    }

    /// Run cycles until shut down or until a store/signer failure.
    pub async fn run(&self, mut shutdown: mpsc::Receiver<()>) -> Result<()> {
        tracing::info!(
            "Refresher started (poll {:?}, validity {})",
            self.poll_period,
            self.validity_interval
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.poll_period) => {}
                _ = shutdown.recv() => {
                    tracing::info!("Refresher shutting down");
                    return Ok(());
                }
            }

            if let Err(e) = self.run_cycle().await {
                tracing::error!("Refresh cycle failed, stopping refresher: {}", e);
                return Err(e);
            }
        }
    }

    /// One refresh pass over every unexpired certificate. Separated from
    /// the sleep/shutdown plumbing so tests can drive cycles directly.
    pub async fn run_cycle(&self) -> Result<()> {
        let now = Utc::now();
        let certificates = self.store.get_unexpired_certificates().await?;
        tracing::debug!("Refresh cycle over {} certificates", certificates.len());

        let mut renewed = 0usize;
        for cert in certificates {
            // A record whose stored PEM no longer parses is skipped, never
            // fatal to the cycle.
            let parsed = match CertificateParser::parse_pem(&cert.raw_certificate) {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::warn!(
                        "Skipping certificate {} ({}): stored PEM no longer parses: {}",
                        cert.serial,
                        cert.authority_key_id,
                        e
                    );
                    continue;
                }
            };

            let records = self
                .store
                .get_ocsp(&cert.serial, &cert.authority_key_id)
                .await?;

            for record in records {
                // Stale generations are not renewed.
                if record.expiry <= now {
                    continue;
                }

                let signed = self
                    .signer
                    .sign(SignRequest {
                        certificate: parsed.clone(),
                        status: cert.status,
                        reason: cert.reason,
                        revoked_at: cert.revoked_at,
                    })
                    .await?;

                let new_expiry = Utc::now() + self.validity_interval;
                self.store
                    .upsert_ocsp(&cert.serial, &cert.authority_key_id, signed.body, new_expiry)
                    .await?;
                renewed += 1;
            }
        }

        if renewed > 0 {
            tracing::info!("Renewed {} OCSP responses", renewed);
        }
        Ok(())
    }
}
