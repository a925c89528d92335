//! This module provides functionality for generating completion candidates for
//! the ids of artists and releases in the CLI.

use clap::builder::StyledStr;
use clap_complete::CompletionCandidate;
use waxlog_client::CatalogClient;
use waxlog_core::config::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletableTable {
    Artist,
    Release,
}

/// Generate completion candidates for records in the catalog.
/// Given the kind of record, returns a function that fetches them from the backend configured
/// in the default config file.
///
/// Completion never fails loudly, anything that goes wrong yields no candidates.
pub fn complete_things(table: CompletableTable) -> impl Fn() -> Vec<CompletionCandidate> {
    move || {
        let Ok(rt) = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        else {
            return vec![];
        };

        let client = match client() {
            Ok(client) => client,
            Err(e) => {
                eprintln!("Failed to set up the client: {e}");
                return vec![];
            }
        };

        let candidates = match table {
            CompletableTable::Artist => rt.block_on(artist_candidates(&client)),
            CompletableTable::Release => rt.block_on(release_candidates(&client)),
        };

        candidates
            .into_iter()
            .map(|(id, help)| CompletionCandidate::new(id).help(Some(help)))
            .collect::<Vec<_>>()
    }
}

fn client() -> anyhow::Result<CatalogClient> {
    let settings = Settings::init(Settings::get_config_path()?, None, None)?;
    Ok(CatalogClient::from_settings(&settings.client)?)
}

async fn artist_candidates(client: &CatalogClient) -> Vec<(String, StyledStr)> {
    match client.artists().await {
        Ok(artists) => artists
            .into_iter()
            .map(|artist| {
                (
                    artist.id.to_string(),
                    StyledStr::from(format!("\"{}\" ({})", artist.name, artist.genre)),
                )
            })
            .collect(),
        Err(e) => {
            eprintln!("Failed to fetch artists: {e}");
            vec![]
        }
    }
}

async fn release_candidates(client: &CatalogClient) -> Vec<(String, StyledStr)> {
    match client.releases_with_artists().await {
        Ok(releases) => releases
            .into_iter()
            .map(|release| {
                (
                    release.id.to_string(),
                    StyledStr::from(format!(
                        "\"{}\" (by: {}, {})",
                        release.title,
                        release.artist_name(),
                        release.year
                    )),
                )
            })
            .collect(),
        Err(e) => {
            eprintln!("Failed to fetch releases: {e}");
            vec![]
        }
    }
}
