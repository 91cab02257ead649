// Player and imported-rank CSV loading.
//
// players.csv columns: id, name, position, team, projected_points,
// reference_points, point_delta, vorp, tier, adp, news_count, bye_week.
// Every column after `position` may be blank. imported ranks use `name,rank`.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use super::model::{ImportedRanks, Player, Position};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawPlayer {
    id: String,
    name: String,
    position: String,
    #[serde(default)]
    team: Option<String>,
    #[serde(default)]
    projected_points: Option<f64>,
    #[serde(default)]
    reference_points: Option<f64>,
    #[serde(default)]
    point_delta: Option<f64>,
    #[serde(default)]
    vorp: Option<f64>,
    #[serde(default)]
    tier: Option<u32>,
    #[serde(default)]
    adp: Option<f64>,
    #[serde(default)]
    news_count: Option<u32>,
    #[serde(default)]
    bye_week: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct RawRank {
    name: String,
    rank: f64,
}

impl RawPlayer {
    fn into_player(self) -> Option<Player> {
        let id = self.id.trim().to_string();
        let name = self.name.trim().to_string();
        if id.is_empty() || name.is_empty() {
            warn!("skipping player row with blank id or name");
            return None;
        }

        let numbers = [
            self.projected_points,
            self.reference_points,
            self.point_delta,
            self.vorp,
            self.adp,
        ];
        if numbers.iter().flatten().any(|v| !v.is_finite()) {
            warn!("skipping player '{}': non-finite stat value", name);
            return None;
        }

        let bye_week = self.bye_week.filter(|w| (1..=18).contains(w));
        if self.bye_week.is_some() && bye_week.is_none() {
            warn!("ignoring out-of-range bye week for '{}'", name);
        }

        Some(Player {
            id,
            name,
            position: Position::from_str_pos(&self.position),
            team: self
                .team
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
            projected_points: self.projected_points,
            reference_points: self.reference_points,
            point_delta: self.point_delta,
            vorp: self.vorp,
            tier: self.tier.filter(|t| *t > 0),
            adp: self.adp,
            news_count: self.news_count,
            bye_week,
        })
    }
}

// ---------------------------------------------------------------------------
// Reader-based loaders
// ---------------------------------------------------------------------------

/// Parse players from any reader. Malformed rows are skipped with a warning;
/// when an id repeats, the first row wins.
pub fn load_players_from_reader<R: Read>(rdr: R) -> Result<Vec<Player>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);
    let mut seen = HashSet::new();
    let mut players = Vec::new();
    for result in reader.deserialize::<RawPlayer>() {
        match result {
            Ok(raw) => {
                let Some(player) = raw.into_player() else {
                    continue;
                };
                if !seen.insert(player.id.clone()) {
                    warn!("skipping duplicate player id '{}'", player.id);
                    continue;
                }
                players.push(player);
            }
            Err(e) => {
                warn!("skipping malformed player row: {}", e);
            }
        }
    }
    Ok(players)
}

/// Parse an imported-rank sheet. Later rows for the same name overwrite
/// earlier ones.
pub fn load_ranks_from_reader<R: Read>(rdr: R) -> Result<ImportedRanks, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);
    let mut ranks = ImportedRanks::new();
    for result in reader.deserialize::<RawRank>() {
        match result {
            Ok(raw) => {
                if !raw.rank.is_finite() {
                    warn!("skipping rank for '{}': non-finite value", raw.name);
                    continue;
                }
                ranks.insert(raw.name.trim().to_string(), raw.rank);
            }
            Err(e) => {
                warn!("skipping malformed rank row: {}", e);
            }
        }
    }
    Ok(ranks)
}

// ---------------------------------------------------------------------------
// File-based loaders
// ---------------------------------------------------------------------------

pub fn load_players(path: &Path) -> Result<Vec<Player>, LoadError> {
    let file = open(path)?;
    let players = load_players_from_reader(file).map_err(|source| LoadError::Csv {
        path: path.display().to_string(),
        source,
    })?;
    info!("Loaded {} players from {}", players.len(), path.display());
    Ok(players)
}

pub fn load_imported_ranks(path: &Path) -> Result<ImportedRanks, LoadError> {
    let file = open(path)?;
    let ranks = load_ranks_from_reader(file).map_err(|source| LoadError::Csv {
        path: path.display().to_string(),
        source,
    })?;
    info!("Loaded {} imported ranks from {}", ranks.len(), path.display());
    Ok(ranks)
}

fn open(path: &Path) -> Result<std::fs::File, LoadError> {
    std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
