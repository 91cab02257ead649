// Memoized derive -> filter -> sort pipeline.
//
// Inputs are compared shallowly: players and ranks by `Arc` pointer
// identity, criteria and sort state by value. The cache keeps its input
// `Arc`s alive, so a matching pointer always means the same data.

use std::sync::Arc;

use tracing::debug;

use crate::players::{ImportedRanks, Player};

use super::derive::{derive_all, DerivedPlayer};
use super::filter::{self, FilterCriteria};
use super::sort::{self, SortState};

/// Filter then stable-sort an already derived list.
pub fn build_ordered(
    derived: &[DerivedPlayer],
    criteria: &FilterCriteria,
    sort_state: SortState,
) -> Vec<DerivedPlayer> {
    let mut rows = filter::filter(derived, criteria);
    sort::sort(&mut rows, sort_state);
    rows.into_iter().cloned().collect()
}

struct DerivedEntry {
    players: Arc<Vec<Player>>,
    ranks: Arc<ImportedRanks>,
    rows: Arc<Vec<DerivedPlayer>>,
}

struct OrderedEntry {
    source: Arc<Vec<DerivedPlayer>>,
    criteria: FilterCriteria,
    sort: SortState,
    rows: Arc<Vec<DerivedPlayer>>,
}

#[derive(Default)]
pub struct ViewCache {
    derived: Option<DerivedEntry>,
    ordered: Option<OrderedEntry>,
    derive_runs: usize,
    order_runs: usize,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn derived(
        &mut self,
        players: &Arc<Vec<Player>>,
        ranks: &Arc<ImportedRanks>,
    ) -> Arc<Vec<DerivedPlayer>> {
        if let Some(entry) = &self.derived {
            if Arc::ptr_eq(&entry.players, players) && Arc::ptr_eq(&entry.ranks, ranks) {
                return Arc::clone(&entry.rows);
            }
        }
        let rows = Arc::new(derive_all(players, ranks));
        self.derive_runs += 1;
        debug!("derived {} players", rows.len());
        self.derived = Some(DerivedEntry {
            players: Arc::clone(players),
            ranks: Arc::clone(ranks),
            rows: Arc::clone(&rows),
        });
        rows
    }

    pub fn ordered(
        &mut self,
        players: &Arc<Vec<Player>>,
        ranks: &Arc<ImportedRanks>,
        criteria: &FilterCriteria,
        sort_state: SortState,
    ) -> Arc<Vec<DerivedPlayer>> {
        let source = self.derived(players, ranks);
        if let Some(entry) = &self.ordered {
            if Arc::ptr_eq(&entry.source, &source)
                && entry.criteria == *criteria
                && entry.sort == sort_state
            {
                return Arc::clone(&entry.rows);
            }
        }
        let rows = Arc::new(build_ordered(&source, criteria, sort_state));
        self.order_runs += 1;
        debug!(
            "ordered view rebuilt: {} of {} players, sort {:?}",
            rows.len(),
            source.len(),
            sort_state
        );
        self.ordered = Some(OrderedEntry {
            source,
            criteria: criteria.clone(),
            sort: sort_state,
            rows: Arc::clone(&rows),
        });
        rows
    }

    /// Number of times derivation actually ran.
    pub fn derive_runs(&self) -> usize {
        self.derive_runs
    }

    /// Number of times filter + sort actually ran.
    pub fn order_runs(&self) -> usize {
        self.order_runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::filter::PositionFilter;
    use crate::board::sort::{SortDirection, SortField};
    use crate::players::Position;

    fn players() -> Arc<Vec<Player>> {
        let mut a = Player::new("a", "Amon-Ra St. Brown", Position::WideReceiver);
        a.projected_points = Some(300.0);
        let mut b = Player::new("b", "Bijan Robinson", Position::RunningBack);
        b.projected_points = Some(320.0);
        let mut c = Player::new("c", "CeeDee Lamb", Position::WideReceiver);
        c.projected_points = Some(310.0);
        Arc::new(vec![a, b, c])
    }

    #[test]
    fn pipeline_filters_then_sorts() {
        let mut cache = ViewCache::new();
        let criteria = FilterCriteria {
            position: PositionFilter::Only(Position::WideReceiver),
            search: String::new(),
        };
        let rows = cache.ordered(
            &players(),
            &Arc::new(ImportedRanks::new()),
            &criteria,
            SortState::default(),
        );
        let ids: Vec<_> = rows.iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec!["c", "a"]);
    }

    #[test]
    fn identical_inputs_hit_the_cache() {
        let mut cache = ViewCache::new();
        let players = players();
        let ranks = Arc::new(ImportedRanks::new());
        let criteria = FilterCriteria::default();

        let first = cache.ordered(&players, &ranks, &criteria, SortState::default());
        let second = cache.ordered(&players, &ranks, &criteria, SortState::default());
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.derive_runs(), 1);
        assert_eq!(cache.order_runs(), 1);
    }

    #[test]
    fn sort_change_reuses_derivation() {
        let mut cache = ViewCache::new();
        let players = players();
        let ranks = Arc::new(ImportedRanks::new());
        let criteria = FilterCriteria::default();

        cache.ordered(&players, &ranks, &criteria, SortState::default());
        let asc = SortState {
            field: SortField::ProjectedPoints,
            direction: SortDirection::Ascending,
        };
        let rows = cache.ordered(&players, &ranks, &criteria, asc);
        assert_eq!(rows[0].id(), "a");
        assert_eq!(cache.derive_runs(), 1);
        assert_eq!(cache.order_runs(), 2);
    }

    #[test]
    fn new_player_snapshot_recomputes_everything() {
        let mut cache = ViewCache::new();
        let ranks = Arc::new(ImportedRanks::new());
        let criteria = FilterCriteria::default();

        cache.ordered(&players(), &ranks, &criteria, SortState::default());
        // Equal content, different snapshot: identity decides.
        cache.ordered(&players(), &ranks, &criteria, SortState::default());
        assert_eq!(cache.derive_runs(), 2);
        assert_eq!(cache.order_runs(), 2);
    }
}
