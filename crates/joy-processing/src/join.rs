use std::collections::HashMap;

use joy_parser::normalize::parse_color_list;
use joy_parser::{ColorRecord, DateLookup, EpisodeId};
use tracing::warn;

use crate::episode::Episode;

/// Builds one episode per distinct color-table id.
///
/// The color table drives the join: subject and date rows without a matching color row are
/// dropped. A repeated id keeps the position of its first row and the data of its last.
pub fn join_episodes(
    colors: &[ColorRecord],
    subjects: &HashMap<EpisodeId, Vec<String>>,
    dates: &DateLookup,
) -> Vec<Episode> {
    let mut episodes: Vec<Episode> = Vec::with_capacity(colors.len());
    let mut positions: HashMap<EpisodeId, usize> = HashMap::with_capacity(colors.len());

    for record in colors {
        let id = record.episode_id();
        let episode = Episode {
            id: id.clone(),
            title: record.painting_title.clone(),
            img_src: record.img_src.clone(),
            youtube_src: record.youtube_src.clone(),
            colors: parse_color_list(&record.colors),
            subjects: subjects.get(&id).cloned().unwrap_or_default(),
            air_date: dates.get(&record.painting_title),
            season: record.season,
            episode: record.episode,
        };

        match positions.get(&id) {
            Some(&index) => {
                warn!(
                    episode_id = %id,
                    replaced = %episodes[index].title,
                    title = %episode.title,
                    "duplicate episode id in colors table, keeping the later row"
                );
                episodes[index] = episode;
            }
            None => {
                positions.insert(id, episodes.len());
                episodes.push(episode);
            }
        }
    }

    episodes
}
