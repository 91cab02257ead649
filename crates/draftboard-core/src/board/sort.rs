// Stable comparator dispatch over the sortable board columns.
//
// Missing values always sort last, in both directions. Ties keep their input
// order because `slice::sort_by` is stable.

use std::cmp::Ordering;

use super::derive::DerivedPlayer;

/// Every column the board can sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Name,
    Team,
    Position,
    ProjectedPoints,
    ReferencePoints,
    PointDelta,
    Vorp,
    Tier,
    Adp,
    EffectiveAdp,
    NewsCount,
    ByeWeek,
    /// Derived: imported rank minus ADP.
    ValueVsAdp,
}

/// Order used when cycling the sort column from the keyboard.
pub const SORT_FIELD_CYCLE: &[SortField] = &[
    SortField::ProjectedPoints,
    SortField::ReferencePoints,
    SortField::PointDelta,
    SortField::Vorp,
    SortField::Tier,
    SortField::Adp,
    SortField::EffectiveAdp,
    SortField::ValueVsAdp,
    SortField::NewsCount,
    SortField::ByeWeek,
    SortField::Name,
    SortField::Team,
    SortField::Position,
];

impl SortField {
    /// Parse the config-file spelling (snake_case).
    pub fn from_config_str(s: &str) -> Option<Self> {
        match s {
            "name" => Some(SortField::Name),
            "team" => Some(SortField::Team),
            "position" => Some(SortField::Position),
            "projected_points" => Some(SortField::ProjectedPoints),
            "reference_points" => Some(SortField::ReferencePoints),
            "point_delta" => Some(SortField::PointDelta),
            "vorp" => Some(SortField::Vorp),
            "tier" => Some(SortField::Tier),
            "adp" => Some(SortField::Adp),
            "effective_adp" => Some(SortField::EffectiveAdp),
            "news_count" => Some(SortField::NewsCount),
            "bye_week" => Some(SortField::ByeWeek),
            "value_vs_adp" => Some(SortField::ValueVsAdp),
            _ => None,
        }
    }

    /// Short column label.
    pub fn label(&self) -> &'static str {
        match self {
            SortField::Name => "Name",
            SortField::Team => "Team",
            SortField::Position => "Pos",
            SortField::ProjectedPoints => "Proj",
            SortField::ReferencePoints => "Ref",
            SortField::PointDelta => "Diff",
            SortField::Vorp => "VORP",
            SortField::Tier => "Tier",
            SortField::Adp => "ADP",
            SortField::EffectiveAdp => "eADP",
            SortField::NewsCount => "News",
            SortField::ByeWeek => "Bye",
            SortField::ValueVsAdp => "Val",
        }
    }

    /// The next field in `SORT_FIELD_CYCLE`, wrapping around.
    pub fn next(&self) -> SortField {
        let idx = SORT_FIELD_CYCLE.iter().position(|f| f == self).unwrap_or(0);
        SORT_FIELD_CYCLE[(idx + 1) % SORT_FIELD_CYCLE.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }

    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        SortState {
            field: SortField::ProjectedPoints,
            direction: SortDirection::Descending,
        }
    }
}

impl SortState {
    pub fn new(field: SortField) -> Self {
        SortState {
            field,
            direction: SortDirection::Descending,
        }
    }

    /// Column-header click: the active field flips direction, any other
    /// field becomes active with the default descending direction.
    pub fn toggle(&mut self, field: SortField) {
        if self.field == field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field;
            self.direction = SortDirection::Descending;
        }
    }
}

enum SortKey<'a> {
    Number(Option<f64>),
    Text(Option<&'a str>),
}

fn sort_key(p: &DerivedPlayer, field: SortField) -> SortKey<'_> {
    let player = &p.player;
    match field {
        SortField::Name => SortKey::Text(Some(&player.name)),
        SortField::Team => SortKey::Text(player.team.as_deref()),
        SortField::Position => SortKey::Text(Some(player.position.display_str())),
        SortField::ProjectedPoints => SortKey::Number(player.projected_points),
        SortField::ReferencePoints => SortKey::Number(player.reference_points),
        SortField::PointDelta => SortKey::Number(player.point_delta),
        SortField::Vorp => SortKey::Number(player.vorp),
        SortField::Tier => SortKey::Number(player.tier.map(f64::from)),
        SortField::Adp => SortKey::Number(player.adp),
        SortField::EffectiveAdp => SortKey::Number(p.effective_adp),
        SortField::NewsCount => SortKey::Number(player.news_count.map(f64::from)),
        SortField::ByeWeek => SortKey::Number(player.bye_week.map(f64::from)),
        SortField::ValueVsAdp => SortKey::Number(Some(p.value_vs_adp_or_zero())),
    }
}

/// Missing values compare greater than present ones regardless of direction.
fn missing_last<T>(
    a: Option<T>,
    b: Option<T>,
    direction: SortDirection,
    cmp: impl FnOnce(T, T) -> Ordering,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => direction.apply(cmp(a, b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn cmp_case_insensitive(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Compare two players on `field` in `direction`.
pub fn compare(
    a: &DerivedPlayer,
    b: &DerivedPlayer,
    field: SortField,
    direction: SortDirection,
) -> Ordering {
    match (sort_key(a, field), sort_key(b, field)) {
        (SortKey::Number(x), SortKey::Number(y)) => missing_last(x, y, direction, |x, y| x.total_cmp(&y)),
        (SortKey::Text(x), SortKey::Text(y)) => missing_last(x, y, direction, cmp_case_insensitive),
        // A field always maps to one key kind.
        _ => Ordering::Equal,
    }
}

/// Stable in-place sort.
pub fn sort(players: &mut [&DerivedPlayer], state: SortState) {
    players.sort_by(|a, b| compare(a, b, state.field, state.direction));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
