//! Core types for the Rehoboam timeline and tech tree.
//!
//! Predictions and tech tree nodes are immutable catalog data; the only
//! mutable record in the system is [`StateRecord`], an append-style log
//! entry for adoption status changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Forecasting domain.
///
/// The six domains are fixed for the lifetime of the system; several
/// aggregation paths divide by [`Domain::COUNT`] directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Domain {
    Individual,
    Social,
    Tech,
    Economic,
    Geopolitical,
    Governance,
}

impl Domain {
    /// Number of domains, used as the fixed divisor in unfiltered averages.
    pub const COUNT: usize = 6;

    /// All domains in canonical order.
    pub const ALL: [Domain; Domain::COUNT] = [
        Domain::Individual,
        Domain::Social,
        Domain::Tech,
        Domain::Economic,
        Domain::Geopolitical,
        Domain::Governance,
    ];

    /// Stable identifier matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Social => "social",
            Self::Tech => "tech",
            Self::Economic => "economic",
            Self::Geopolitical => "geopolitical",
            Self::Governance => "governance",
        }
    }

    /// Parse the stable identifier form.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|domain| domain.as_str() == s)
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Individual => "Individual",
            Self::Social => "Social",
            Self::Tech => "Technology",
            Self::Economic => "Economic",
            Self::Geopolitical => "Geopolitical",
            Self::Governance => "Governance",
        }
    }
}

/// Impact tier of a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Low,
    Medium,
    High,
}

/// Attribution for a prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionSource {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Source confidence in the claim, 0.0 - 1.0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// A single dated forecast event. Immutable once loaded from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub id: String,
    pub domain: Domain,
    /// Zero-based month (0 = January).
    pub month: u32,
    pub year: i32,
    /// Probability the prediction holds, 0.0 - 1.0.
    pub probability: f64,
    pub title: String,
    pub description: String,
    pub impact: Impact,
    pub sources: Vec<PredictionSource>,
}

/// A (year, month) point on the timeline, ordered lexicographically.
///
/// Months are zero-based throughout the system.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Linear month index (`year * 12 + month`), the single axis all
    /// temporal comparisons reduce to.
    pub fn index(&self) -> i64 {
        self.year as i64 * 12 + self.month as i64
    }

    /// Long-form label, e.g. "January 2026".
    pub fn label(&self) -> String {
        format!("{} {}", month_name_long(self.month), self.year)
    }
}

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const MONTH_NAMES_LONG: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Abbreviated month name for a zero-based month.
pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES.get(month as usize).copied().unwrap_or("???")
}

/// Full month name for a zero-based month.
pub fn month_name_long(month: u32) -> &'static str {
    MONTH_NAMES_LONG.get(month as usize).copied().unwrap_or("???")
}

/// Derived aggregate for one month of the timeline.
///
/// `probabilities` always carries all six domains; domains without a
/// matching prediction sit at the neutral prior of 0.5. Recomputed on
/// demand, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthData {
    pub year: i32,
    /// Zero-based month.
    pub month: u32,
    pub probabilities: std::collections::BTreeMap<Domain, f64>,
    pub predictions: Vec<Prediction>,
}

/// User-created target tied to a month on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub title: String,
    pub description: String,
    pub target_year: i32,
    /// Zero-based month.
    pub target_month: u32,
    pub domains: Vec<Domain>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    /// Create a new incomplete goal with a fresh id, stamped now.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        target_year: i32,
        target_month: u32,
        domains: Vec<Domain>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            description: description.into(),
            target_year,
            target_month,
            domains,
            completed: false,
            created_at: Utc::now(),
        }
    }
}

/// Tech tree category. Five fixed buckets, distinct from [`Domain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TechCategory {
    Individual,
    Society,
    Economy,
    Governance,
    Geopolitics,
}

impl TechCategory {
    /// All categories in display order.
    pub const ALL: [TechCategory; 5] = [
        TechCategory::Individual,
        TechCategory::Society,
        TechCategory::Economy,
        TechCategory::Governance,
        TechCategory::Geopolitics,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Individual => "Individual",
            Self::Society => "Society",
            Self::Economy => "Economy",
            Self::Governance => "Governance",
            Self::Geopolitics => "Geopolitics",
        }
    }
}

/// Life areas a tech tree node touches, used to rank narrative impacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LifeArea {
    Sleep,
    MorningPlanning,
    Meals,
    Work,
    IncomeModel,
    Education,
    Commute,
    Entertainment,
    SocialLife,
    Relationships,
    Family,
    Health,
    Privacy,
    Safety,
    Trust,
    Finance,
    Routines,
    Energy,
    Politics,
    Governance,
}

impl LifeArea {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sleep => "sleep",
            Self::MorningPlanning => "morning-planning",
            Self::Meals => "meals",
            Self::Work => "work",
            Self::IncomeModel => "income-model",
            Self::Education => "education",
            Self::Commute => "commute",
            Self::Entertainment => "entertainment",
            Self::SocialLife => "social-life",
            Self::Relationships => "relationships",
            Self::Family => "family",
            Self::Health => "health",
            Self::Privacy => "privacy",
            Self::Safety => "safety",
            Self::Trust => "trust",
            Self::Finance => "finance",
            Self::Routines => "routines",
            Self::Energy => "energy",
            Self::Politics => "politics",
            Self::Governance => "governance",
        }
    }
}

/// Immutable tech tree catalog entry with an inclusive activation window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechTreeNode {
    pub id: String,
    pub category: TechCategory,
    pub subcategory: String,
    pub title: String,
    pub window_start: YearMonth,
    pub window_end: YearMonth,
    /// Prerequisite node ids.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    /// Free-text signals that the node is materializing.
    pub indicators: Vec<String>,
    pub tags: Vec<LifeArea>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Adoption stage of a tech tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdoptionStatus {
    NotStarted,
    RAndD,
    Pilot,
    EarlyAdopters,
    MassMarket,
    Ubiquitous,
    Regulated,
}

impl AdoptionStatus {
    /// All stages in progression order.
    pub const ALL: [AdoptionStatus; 7] = [
        AdoptionStatus::NotStarted,
        AdoptionStatus::RAndD,
        AdoptionStatus::Pilot,
        AdoptionStatus::EarlyAdopters,
        AdoptionStatus::MassMarket,
        AdoptionStatus::Ubiquitous,
        AdoptionStatus::Regulated,
    ];

    /// Stable identifier matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not-started",
            Self::RAndD => "r-and-d",
            Self::Pilot => "pilot",
            Self::EarlyAdopters => "early-adopters",
            Self::MassMarket => "mass-market",
            Self::Ubiquitous => "ubiquitous",
            Self::Regulated => "regulated",
        }
    }

    /// Parse the stable identifier form.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|status| status.as_str() == s)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::RAndD => "R&D",
            Self::Pilot => "Pilot",
            Self::EarlyAdopters => "Early Adopters",
            Self::MassMarket => "Mass Market",
            Self::Ubiquitous => "Ubiquitous",
            Self::Regulated => "Regulated",
        }
    }
}

/// One entry in the adoption status log for a node.
///
/// Records are appended, never edited in place. A record with no
/// `effective` date is a floor fact: applicable to every query month but
/// dominated by any dated record at or before the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    pub node_id: String,
    pub status: AdoptionStatus,
    /// When this status became true. `None` means "since the dawn of time".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective: Option<YearMonth>,
    /// Wall-clock write time, used only for tie-breaking, never for
    /// domain meaning.
    pub updated_at: DateTime<Utc>,
}

impl StateRecord {
    /// Create a record effective at the given month, stamped now.
    pub fn effective_at(node_id: impl Into<String>, status: AdoptionStatus, at: YearMonth) -> Self {
        Self {
            node_id: node_id.into(),
            status,
            effective: Some(at),
            updated_at: Utc::now(),
        }
    }
}

/// Snapshot of the timeline viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineConfig {
    pub start_year: i32,
    pub end_year: i32,
    pub current_year: i32,
    /// Zero-based month.
    pub current_month: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&Domain::Geopolitical).unwrap(),
            "\"geopolitical\""
        );
        let parsed: Domain = serde_json::from_str("\"tech\"").unwrap();
        assert_eq!(parsed, Domain::Tech);
    }

    #[test]
    fn status_round_trips_through_stable_identifiers() {
        for status in AdoptionStatus::ALL {
            assert_eq!(AdoptionStatus::parse(status.as_str()), Some(status));
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn year_month_orders_lexicographically() {
        let a = YearMonth::new(2026, 11);
        let b = YearMonth::new(2027, 0);
        assert!(a < b);
        assert_eq!(b.index() - a.index(), 1);
    }

    #[test]
    fn month_names_cover_the_year() {
        assert_eq!(month_name(0), "Jan");
        assert_eq!(month_name(11), "Dec");
        assert_eq!(month_name_long(0), "January");
        assert_eq!(YearMonth::new(2026, 0).label(), "January 2026");
    }
}
