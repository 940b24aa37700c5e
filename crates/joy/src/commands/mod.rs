pub mod preview;
pub mod serve;
pub mod upload;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use joy_processing::DEFAULT_COLLECTION;
use joy_store::{DocumentStore, FirestoreStore};

/// Emulator-only project used when no project id is given.
const EMULATOR_PROJECT: &str = "demo-joy";

#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Service-account key file
    #[arg(long, env = "JOY_CREDENTIALS", default_value = "service-account.json")]
    pub credentials: PathBuf,

    /// Firestore project; defaults to the key file's project
    #[arg(long, env = "JOY_PROJECT_ID")]
    pub project_id: Option<String>,

    /// Talk to a local emulator (`host:port`) instead of Firestore
    #[arg(long, env = "FIRESTORE_EMULATOR_HOST")]
    pub emulator_host: Option<String>,

    #[arg(long, default_value = DEFAULT_COLLECTION)]
    pub collection: String,
}

impl StoreArgs {
    pub fn connect(&self) -> Result<Arc<dyn DocumentStore>> {
        let store = match &self.emulator_host {
            Some(host) => {
                let project = self.project_id.as_deref().unwrap_or(EMULATOR_PROJECT);
                FirestoreStore::emulator(host, project)
                    .with_context(|| format!("connecting to emulator at {host}"))?
            }
            None => FirestoreStore::from_service_account(&self.credentials, self.project_id.clone())
                .with_context(|| {
                    format!("loading credentials from {}", self.credentials.display())
                })?,
        };
        Ok(Arc::new(store))
    }
}

#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// Directory holding Colors_Used.csv, Subject_Matter.csv and Episode_Dates.csv
    #[arg(long, default_value = ".")]
    pub data_dir: PathBuf,
}
