use anyhow::{Context, Result};
use joy_parser::load_source_tables;
use joy_processing::{prepare, PipelineConfig, UploadPipeline};

use super::{DataArgs, StoreArgs};

pub async fn handle_upload_command(data: &DataArgs, store: &StoreArgs) -> Result<()> {
    let tables = load_source_tables(&data.data_dir)
        .with_context(|| format!("loading source tables from {}", data.data_dir.display()))?;
    let batch = prepare(&tables);

    for failure in &batch.date_failures {
        println!("{failure}");
    }

    let pipeline = UploadPipeline::new(
        store.connect()?,
        PipelineConfig {
            collection: store.collection.clone(),
        },
    );
    let report = pipeline
        .upload(&batch, |id| println!("Uploaded: {id}"))
        .await
        .context("uploading episodes")?;

    println!("{report}");
    Ok(())
}
