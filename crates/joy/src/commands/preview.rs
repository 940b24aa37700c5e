use anyhow::{Context, Result};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use joy_parser::load_source_tables;
use joy_processing::{prepare, Episode};

use super::DataArgs;

pub fn handle_preview_command(data: &DataArgs) -> Result<()> {
    let tables = load_source_tables(&data.data_dir)
        .with_context(|| format!("loading source tables from {}", data.data_dir.display()))?;
    let batch = prepare(&tables);

    println!("{}", episode_table(&batch.episodes));
    for failure in &batch.date_failures {
        println!("{failure}");
    }
    println!(
        "{} episodes joined; {} air dates could not be parsed.",
        batch.episodes.len(),
        batch.date_failures.len()
    );
    Ok(())
}

pub fn episode_table(episodes: &[Episode]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["ID", "Title", "Air date", "Colors", "Subjects"]);

    for episode in episodes {
        let air_date = episode
            .air_date
            .map(|date| date.to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            episode.id.to_string(),
            episode.title.clone(),
            air_date,
            episode.colors.len().to_string(),
            episode.subjects.join(", "),
        ]);
    }
    table
}
