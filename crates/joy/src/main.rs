use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
use commands::preview::handle_preview_command;
use commands::serve::handle_serve_command;
use commands::upload::handle_upload_command;
use commands::{DataArgs, StoreArgs};

/// Publishes Joy of Painting episode data to Firestore and serves it over HTTP.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Join the three CSV tables and write one document per episode
    Upload {
        #[command(flatten)]
        data: DataArgs,
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Join the CSV tables and print the result without touching the store
    Preview {
        #[command(flatten)]
        data: DataArgs,
    },
    /// Serve the episode query API
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,
    #[command(flatten)]
    store: StoreArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    match cli.command {
        Command::Upload { data, store } => handle_upload_command(&data, &store).await,
        Command::Preview { data } => handle_preview_command(&data),
        Command::Serve(args) => handle_serve_command(args.port, &args.store).await,
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use chrono::NaiveDate;
    use joy_parser::EpisodeId;
    use joy_processing::Episode;

    use super::*;
    use crate::commands::preview::episode_table;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn upload_defaults() {
        let cli = Cli::try_parse_from(["joy", "upload", "--project-id", "bob-ross"]).unwrap();
        let Command::Upload { data, store } = cli.command else {
            panic!("expected upload");
        };
        assert_eq!(data.data_dir, Path::new("."));
        assert_eq!(store.collection, "episodes");
        assert_eq!(store.project_id.as_deref(), Some("bob-ross"));
    }

    #[test]
    fn serve_takes_a_port() {
        let cli = Cli::try_parse_from(["joy", "serve", "--port", "8080"]).unwrap();
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.port, 8080);
    }

    #[test]
    fn preview_table_has_a_row_per_episode() {
        let episodes = vec![
            Episode {
                id: EpisodeId::new("S01E01"),
                title: "A Walk in the Woods".into(),
                img_src: String::new(),
                youtube_src: String::new(),
                colors: vec!["Sap Green".into(), "Van Dyke Brown".into()],
                subjects: vec!["TREE".into()],
                air_date: NaiveDate::from_ymd_opt(1983, 1, 11),
                season: 1,
                episode: 1,
            },
            Episode {
                id: EpisodeId::new("S01E04"),
                title: "Winter Mist".into(),
                img_src: String::new(),
                youtube_src: String::new(),
                colors: Vec::new(),
                subjects: Vec::new(),
                air_date: None,
                season: 1,
                episode: 4,
            },
        ];
        let table = episode_table(&episodes);
        assert_eq!(table.row_iter().count(), 2);

        let rendered = table.to_string();
        assert!(rendered.contains("1983-01-11"));
        assert!(rendered.contains("Winter Mist"));
    }
}
