//! Transcode worker binary.
//!
//! Scans a spool directory of staged uploads, enqueues each file on the
//! scheduler, and waits for the queue to drain, logging terminal states.

use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use chirp_media::HlsTranscoder;
use chirp_models::JobId;
use chirp_scheduler::{SchedulerConfig, TranscodeScheduler};
use chirp_store::MemoryStatusStore;

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("chirp=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(true).with_target(true))
            .with(env_filter)
            .init();
    }

    info!("Starting chirp-worker");

    let config = SchedulerConfig::from_env();
    info!("Scheduler config: {:?}", config);

    let transcoder = match HlsTranscoder::new() {
        Ok(t) => Arc::new(t),
        Err(e) => {
            error!("Failed to create transcoder: {}", e);
            std::process::exit(1);
        }
    };

    let store = Arc::new(MemoryStatusStore::new());
    let scheduler = TranscodeScheduler::new(config, store, transcoder);

    let spool_dir = std::env::var("CHIRP_SPOOL_DIR")
        .unwrap_or_else(|_| "/tmp/chirp/uploads".to_string());

    let mut entries = match tokio::fs::read_dir(&spool_dir).await {
        Ok(entries) => entries,
        Err(e) => {
            error!("Failed to read spool directory {}: {}", spool_dir, e);
            std::process::exit(1);
        }
    };

    let mut job_ids: Vec<JobId> = Vec::new();
    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => {
                let path = entry.path();
                let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
                if !is_file {
                    continue;
                }
                match scheduler.enqueue(&path).await {
                    Ok(id) => job_ids.push(id),
                    Err(e) => {
                        warn!(source = %path.display(), error = %e, "Skipping staged file");
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read spool entry: {}", e);
                break;
            }
        }
    }

    info!("Enqueued {} jobs from {}", job_ids.len(), spool_dir);
    scheduler.wait_until_idle().await;

    for id in &job_ids {
        match scheduler.get_status(id).await {
            Ok(Some(record)) => {
                info!(job_id = %id, state = %record.state, "Job finished");
            }
            Ok(None) => warn!(job_id = %id, "No status record found"),
            Err(e) => warn!(job_id = %id, error = %e, "Status lookup failed"),
        }
    }

    info!("Spool drained, exiting");
}
