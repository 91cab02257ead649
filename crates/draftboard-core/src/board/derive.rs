// Derived comparison fields: value vs. ADP and effective ADP.

use crate::players::{ImportedRanks, Player};

/// How a player's imported rank compares with the market ADP.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueVsAdp {
    /// `imported_rank - adp`. Positive means the market drafts the player
    /// later than the imported sheet ranks them.
    pub value: f64,
    pub is_value: bool,
    /// `value / adp * 100`, formatted with one decimal place.
    pub percentage: String,
}

/// A player augmented with the fields the board sorts and renders on top of
/// the raw record.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedPlayer {
    pub player: Player,
    pub value_vs_adp: Option<ValueVsAdp>,
    /// The imported rank when `value_vs_adp` was computed, else the raw ADP.
    pub effective_adp: Option<f64>,
}

impl DerivedPlayer {
    pub fn id(&self) -> &str {
        &self.player.id
    }

    /// Sort key for the derived field; players without a comparison count as 0.
    pub fn value_vs_adp_or_zero(&self) -> f64 {
        self.value_vs_adp.as_ref().map_or(0.0, |v| v.value)
    }
}

/// Compute the derived fields for one player.
///
/// The comparison is skipped entirely (never NaN) when the player has no
/// imported rank, no ADP, or an ADP that cannot be divided by.
pub fn derive(player: &Player, ranks: &ImportedRanks) -> DerivedPlayer {
    let usable_adp = player.adp.filter(|adp| adp.is_finite() && *adp != 0.0);

    match (ranks.get(&player.name), usable_adp) {
        (Some(&rank), Some(adp)) => {
            let difference = rank - adp;
            DerivedPlayer {
                player: player.clone(),
                value_vs_adp: Some(ValueVsAdp {
                    value: difference,
                    is_value: difference > 0.0,
                    percentage: format!("{:.1}", difference / adp * 100.0),
                }),
                effective_adp: Some(rank),
            }
        }
        _ => DerivedPlayer {
            player: player.clone(),
            value_vs_adp: None,
            effective_adp: player.adp,
        },
    }
}

/// Derive every player, preserving input order.
pub fn derive_all(players: &[Player], ranks: &ImportedRanks) -> Vec<DerivedPlayer> {
    players.iter().map(|p| derive(p, ranks)).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
