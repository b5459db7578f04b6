// ********* Input data structures ***********

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Display;

use crate::normalize::ShareValue;

/// A party or candidate code, as found in the booth records (`BJP`, `IND`, `OTHERS`, ...).
pub type PartyCode = String;

/// The code used by the records for independent candidates.
pub const INDEPENDENT: &str = "IND";

/// The catch-all bucket. It holds votes but never wins a booth.
pub const OTHERS: &str = "OTHERS";

/// Keys that look like candidates in the raw records but are not.
/// They are matched by prefix because the extracts suffix them per year (`VOTERS_2021`).
pub const NON_CANDIDATE_PREFIXES: [&str; 4] = ["VOTERS", "NOTA", "PS_NO", "POLLED"];

/// A vote share as it was found in a record.
///
/// Shares are normally fractions in [0, 1], but the editors sometimes store
/// placeholders such as `"NEW_BOOTH"` for booths without history.
#[derive(PartialEq, Debug, Clone)]
pub enum RawShare {
    Number(f64),
    Text(String),
    Missing,
}

/// Booth category, as assigned by the field team.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Category {
    A,
    B,
    C,
    D,
}

impl Category {
    pub const ALL: [Category; 4] = [Category::A, Category::B, Category::C, Category::D];

    pub fn parse(s: &str) -> Option<Category> {
        match s.trim().to_uppercase().as_str() {
            "A" => Some(Category::A),
            "B" => Some(Category::B),
            "C" => Some(Category::C),
            "D" => Some(Category::D),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::A => "A",
            Category::B => "B",
            Category::C => "C",
            Category::D => "D",
        }
    }
}

/// The result of one election at one booth.
///
/// The shares do not necessarily sum to 1: the data comes from extracts and surveys,
/// not from an authoritative tally.
#[derive(PartialEq, Debug, Clone)]
pub struct ElectionResult {
    pub year: u32,
    pub total_votes: u64,
    pub candidates: BTreeMap<PartyCode, RawShare>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct PollingStation {
    pub id: String,
    pub assembly_id: String,
    pub station_number: String,
    pub locality: String,
    pub station_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category: Option<Category>,
    /// Missing years are absent, not zeroed.
    pub results: BTreeMap<u32, ElectionResult>,
}

impl PollingStation {
    pub fn result(&self, year: u32) -> Option<&ElectionResult> {
        self.results.get(&year)
    }

    /// Votes polled at this booth for the given year, 0 when the year is missing.
    pub fn total_votes(&self, year: u32) -> u64 {
        self.result(year).map(|r| r.total_votes).unwrap_or(0)
    }

    /// The share of a party for a year, as a fraction. Missing data reads as 0.
    pub fn share(&self, party: &str, year: u32) -> f64 {
        self.result(year)
            .and_then(|r| r.candidates.get(party))
            .map(|v| v.parse_share())
            .unwrap_or(0.0)
    }

    /// The display name of the booth: the locality, or `PS <number>` when it is unknown.
    pub fn display_name(&self) -> String {
        if self.locality.is_empty() {
            format!("PS {}", self.station_number)
        } else {
            self.locality.clone()
        }
    }
}

/// What the assembly configuration says about the parties to display.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct PartyDisplayConfig {
    pub selected_parties: Vec<PartyCode>,
}

// ******** Output data structures *********

#[derive(PartialEq, Debug, Clone)]
pub struct PartyShare {
    pub party: PartyCode,
    pub raw_votes: u64,
    /// Percentage of the votes polled, rounded to one decimal.
    pub share_pct: f64,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CategoryCount {
    /// None is the "Unknown" category.
    pub category: Option<Category>,
    pub count: usize,
}

impl CategoryCount {
    pub fn label(&self) -> &'static str {
        self.category.map(|c| c.label()).unwrap_or("Unknown")
    }
}

/// Assembly-wide statistics for one election year.
#[derive(PartialEq, Debug, Clone)]
pub struct AggregateStat {
    pub year: u32,
    pub total_booths: usize,
    /// Estimated from the votes polled, never measured.
    pub total_voters: u64,
    pub total_polled: u64,
    pub turnout_pct: f64,
    /// Sorted by decreasing share.
    pub party_shares: Vec<PartyShare>,
    pub categories: Vec<CategoryCount>,
}

impl AggregateStat {
    pub fn is_empty(&self) -> bool {
        self.total_booths == 0
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct TrendShare {
    pub party: PartyCode,
    /// Rounded to two decimals.
    pub share_pct: f64,
    pub avg_votes_per_booth: u64,
}

/// The vote shares of the party roster for one year.
#[derive(PartialEq, Debug, Clone)]
pub struct YearTrend {
    pub year: u32,
    pub total_polled: u64,
    pub booth_count: usize,
    /// In roster order.
    pub shares: Vec<TrendShare>,
}

impl YearTrend {
    pub fn share_of(&self, party: &str) -> f64 {
        self.shares
            .iter()
            .find(|s| s.party == party)
            .map(|s| s.share_pct)
            .unwrap_or(0.0)
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct SwingEntry {
    pub party: PartyCode,
    /// Percentage points, positive when the party gained. Rounded to two decimals.
    pub delta_pct: f64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct YearSwing {
    pub from_year: u32,
    pub to_year: u32,
    pub entries: Vec<SwingEntry>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct TrendReport {
    pub years: Vec<YearTrend>,
    pub swings: Vec<YearSwing>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct WeakBooth {
    pub station_number: String,
    pub locality: String,
    /// Share of the party at this booth, in percent.
    pub score: f64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct Hotspot {
    pub station_number: String,
    pub locality: String,
    pub station_name: String,
    pub best_year: u32,
    /// Fraction of the votes for the independent candidate in `best_year`.
    pub best_performance: f64,
    /// The same share for every year of the analysis.
    pub performance_by_year: Vec<(u32, f64)>,
}

/// The outcome at one booth for one year.
#[derive(PartialEq, Debug, Clone)]
pub enum BoothWinner {
    NoData,
    Decided {
        winner: PartyCode,
        winner_pct: f64,
        runner_up: Option<PartyCode>,
        runner_up_pct: f64,
        /// Percentage points between the winner and the runner-up, rounded to one decimal.
        margin_pct: f64,
    },
}

impl BoothWinner {
    pub fn winner(&self) -> Option<&str> {
        match self {
            BoothWinner::NoData => None,
            BoothWinner::Decided { winner, .. } => Some(winner.as_str()),
        }
    }

    pub fn runner_up(&self) -> Option<&str> {
        match self {
            BoothWinner::Decided {
                runner_up: Some(r), ..
            } => Some(r.as_str()),
            _ => None,
        }
    }

    pub fn margin_pct(&self) -> Option<f64> {
        match self {
            BoothWinner::NoData => None,
            BoothWinner::Decided { margin_pct, .. } => Some(*margin_pct),
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct BoothWinners {
    pub station_number: String,
    pub locality: String,
    pub station_name: String,
    pub by_year: Vec<(u32, BoothWinner)>,
}

/// One booth of the candidate heatmap.
#[derive(PartialEq, Debug, Clone)]
pub struct BoothHeat {
    pub station_number: String,
    pub booth_name: String,
    pub station_name: String,
    pub winning_party: Option<PartyCode>,
    /// Percentage of the winning party.
    pub vote_share: f64,
    pub top_parties: Vec<(PartyCode, f64)>,
    pub total_votes: u64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct MapMarker {
    pub booth: BoothHeat,
    pub latitude: f64,
    pub longitude: f64,
    pub category: Option<Category>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct PartyHeatRow {
    pub station_number: String,
    pub booth_name: String,
    pub station_name: String,
    /// Percentages, in the order of the requested parties.
    pub shares: Vec<(PartyCode, f64)>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct LocalitySummary {
    pub locality: String,
    pub stations: usize,
    /// Average percentage over the booths that have a result for the year.
    pub average_shares: Vec<(PartyCode, f64)>,
}

/// Errors raised while assembling the booth records.
///
/// The statistics themselves never fail.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum StatsErrors {
    DuplicateStation(String),
    UnknownStation(String),
    InvalidRules(String),
    EmptyYears,
}

impl Error for StatsErrors {}

impl Display for StatsErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsErrors::DuplicateStation(id) => write!(f, "duplicate polling station {}", id),
            StatsErrors::UnknownStation(id) => write!(f, "unknown polling station {}", id),
            StatsErrors::InvalidRules(msg) => write!(f, "invalid rules: {}", msg),
            StatsErrors::EmptyYears => write!(f, "at least one election year is required"),
        }
    }
}

// ********* Configuration **********

#[derive(PartialEq, Debug, Clone, Copy)]
pub struct StatsRules {
    /// Scales the votes polled up to the estimated electorate.
    /// 1.25 assumes a turnout of 80%.
    pub turnout_factor: f64,
    /// Number of parties shown in the overview when no party selection is configured.
    pub top_parties: usize,
    /// Number of roster parties considered for the swings.
    pub swing_parties: usize,
    pub weak_booth_limit: usize,
    pub hotspot_limit: usize,
    /// Independents below this fraction are noise.
    pub hotspot_threshold: f64,
    /// Number of parties listed per booth in the heatmaps.
    pub heatmap_top_parties: usize,
}

impl StatsRules {
    pub const DEFAULT_RULES: StatsRules = StatsRules {
        turnout_factor: 1.25,
        top_parties: 5,
        swing_parties: 5,
        weak_booth_limit: 5,
        hotspot_limit: 6,
        hotspot_threshold: 0.05,
        heatmap_top_parties: 3,
    };

    pub fn validate(&self) -> Result<(), StatsErrors> {
        if !self.turnout_factor.is_finite() || self.turnout_factor <= 0.0 {
            return Err(StatsErrors::InvalidRules(format!(
                "turnout factor must be positive, got {}",
                self.turnout_factor
            )));
        }
        if !self.hotspot_threshold.is_finite() || self.hotspot_threshold < 0.0 {
            return Err(StatsErrors::InvalidRules(format!(
                "hotspot threshold must be a non-negative fraction, got {}",
                self.hotspot_threshold
            )));
        }
        Ok(())
    }
}

impl Default for StatsRules {
    fn default() -> Self {
        StatsRules::DEFAULT_RULES
    }
}
