use crate::report::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

pub const DEFAULT_YEARS: [u32; 3] = [2011, 2016, 2021];
pub const DEFAULT_TREND_PARTIES: [&str; 7] = ["NRC", "DMK", "AIADMK", "BJP", "PMK", "IND", "OTHERS"];
pub const DEFAULT_WEAK_BOOTH_PARTIES: [&str; 3] = ["BJP", "DMK", "AIADMK"];

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "assemblyName")]
    pub assembly_name: Option<String>,
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DataSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    /// Only for xlsx: the worksheets to read. All the worksheets named by a year otherwise.
    #[serde(rename = "excelWorksheetNames")]
    pub excel_worksheet_names: Option<Vec<String>>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartyConfig {
    #[serde(rename = "selectedParties")]
    pub selected_parties: Vec<String>,
}

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(rename = "turnoutFactor")]
    pub turnout_factor: Option<f64>,
    #[serde(rename = "topParties")]
    pub top_parties: Option<usize>,
    #[serde(rename = "swingParties")]
    pub swing_parties: Option<usize>,
    #[serde(rename = "weakBoothLimit")]
    pub weak_booth_limit: Option<usize>,
    #[serde(rename = "hotspotLimit")]
    pub hotspot_limit: Option<usize>,
    #[serde(rename = "hotspotThreshold")]
    pub hotspot_threshold: Option<f64>,
    #[serde(rename = "heatmapTopParties")]
    pub heatmap_top_parties: Option<usize>,
}

impl RulesConfig {
    pub fn stats_rules(&self) -> ReportResult<StatsRules> {
        let d = StatsRules::DEFAULT_RULES;
        let rules = StatsRules {
            turnout_factor: self.turnout_factor.unwrap_or(d.turnout_factor),
            top_parties: self.top_parties.unwrap_or(d.top_parties),
            swing_parties: self.swing_parties.unwrap_or(d.swing_parties),
            weak_booth_limit: self.weak_booth_limit.unwrap_or(d.weak_booth_limit),
            hotspot_limit: self.hotspot_limit.unwrap_or(d.hotspot_limit),
            hotspot_threshold: self.hotspot_threshold.unwrap_or(d.hotspot_threshold),
            heatmap_top_parties: self.heatmap_top_parties.unwrap_or(d.heatmap_top_parties),
        };
        rules.validate().context(StatsSnafu {})?;
        Ok(rules)
    }
}

/// Which sections go in the report. Everything is on by default, except the manual entries.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Sections {
    #[serde(default = "enabled")]
    pub overview: bool,
    #[serde(default = "enabled")]
    pub trends: bool,
    #[serde(rename = "weakBooths", default = "enabled")]
    pub weak_booths: bool,
    #[serde(rename = "independentHotspots", default = "enabled")]
    pub independent_hotspots: bool,
    #[serde(rename = "boothWinners", default = "enabled")]
    pub booth_winners: bool,
    #[serde(rename = "candidateHeatmap", default = "enabled")]
    pub candidate_heatmap: bool,
    #[serde(rename = "mapMarkers", default = "enabled")]
    pub map_markers: bool,
    #[serde(rename = "partyHeatmap", default = "enabled")]
    pub party_heatmap: bool,
    #[serde(default = "enabled")]
    pub localities: bool,
    #[serde(rename = "customCards", default = "enabled")]
    pub custom_cards: bool,
    #[serde(rename = "useManualWeakBooths", default)]
    pub use_manual_weak_booths: bool,
    #[serde(rename = "useManualHotspots", default)]
    pub use_manual_hotspots: bool,
}

fn enabled() -> bool {
    true
}

impl Default for Sections {
    fn default() -> Self {
        Sections {
            overview: true,
            trends: true,
            weak_booths: true,
            independent_hotspots: true,
            booth_winners: true,
            candidate_heatmap: true,
            map_markers: true,
            party_heatmap: true,
            localities: true,
            custom_cards: true,
            use_manual_weak_booths: false,
            use_manual_hotspots: false,
        }
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ManualWeakBooth {
    pub party: String,
    pub locality: String,
    pub score: f64,
    #[serde(default)]
    pub order: i64,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ManualHotspot {
    pub locality: String,
    #[serde(rename = "psName")]
    pub ps_name: Option<String>,
    #[serde(rename = "candidateName")]
    pub candidate_name: String,
    /// A fraction, as the computed hotspots.
    #[serde(rename = "bestPerformance")]
    pub best_performance: f64,
    #[serde(rename = "bestYear")]
    pub best_year: String,
    #[serde(rename = "perf2021")]
    pub perf_2021: Option<f64>,
    #[serde(rename = "perf2016")]
    pub perf_2016: Option<f64>,
    #[serde(rename = "perf2011")]
    pub perf_2011: Option<f64>,
    #[serde(default)]
    pub order: i64,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CustomCard {
    pub heading: String,
    pub content: String,
    #[serde(rename = "cardType", default = "text_card")]
    pub card_type: String,
    #[serde(default)]
    pub section: String,
    pub icon: Option<String>,
    #[serde(default)]
    pub order: i64,
}

fn text_card() -> String {
    "text".to_string()
}

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(rename = "dataSources", default)]
    pub data_sources: Vec<DataSource>,
    #[serde(rename = "assemblyId")]
    pub assembly_id: Option<String>,
    #[serde(default)]
    pub years: Vec<u32>,
    #[serde(rename = "selectedYear")]
    pub selected_year: Option<u32>,
    #[serde(rename = "partyConfig")]
    pub party_config: Option<PartyConfig>,
    #[serde(rename = "trendParties")]
    pub trend_parties: Option<Vec<String>>,
    #[serde(rename = "weakBoothParties")]
    pub weak_booth_parties: Option<Vec<String>>,
    /// The parties of the party heatmap and of the locality analysis. The trend parties otherwise.
    #[serde(rename = "heatmapParties")]
    pub heatmap_parties: Option<Vec<String>>,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub sections: Sections,
    #[serde(rename = "manualWeakBooths", default)]
    pub manual_weak_booths: Vec<ManualWeakBooth>,
    #[serde(rename = "manualHotspots", default)]
    pub manual_hotspots: Vec<ManualHotspot>,
    #[serde(rename = "customCards", default)]
    pub custom_cards: Vec<CustomCard>,
    /// Display names of the parties.
    #[serde(rename = "partyAliases")]
    pub party_aliases: Option<BTreeMap<String, String>>,
}

impl ReportConfig {
    /// The election years, in increasing order.
    pub fn election_years(&self) -> Vec<u32> {
        let mut years = if self.years.is_empty() {
            DEFAULT_YEARS.to_vec()
        } else {
            self.years.clone()
        };
        years.sort_unstable();
        years.dedup();
        years
    }

    pub fn trend_parties(&self) -> Vec<PartyCode> {
        self.trend_parties
            .clone()
            .unwrap_or_else(|| DEFAULT_TREND_PARTIES.iter().map(|s| s.to_string()).collect())
    }

    pub fn weak_booth_parties(&self) -> Vec<PartyCode> {
        self.weak_booth_parties
            .clone()
            .unwrap_or_else(|| DEFAULT_WEAK_BOOTH_PARTIES.iter().map(|s| s.to_string()).collect())
    }

    pub fn heatmap_parties(&self) -> Vec<PartyCode> {
        self.heatmap_parties.clone().unwrap_or_else(|| self.trend_parties())
    }

    pub fn party_aliases(&self) -> BTreeMap<String, String> {
        self.party_aliases.clone().unwrap_or_else(|| {
            [("NRC".to_string(), "NR Congress".to_string())]
                .into_iter()
                .collect()
        })
    }
}

pub fn read_config(path: &str) -> ReportResult<ReportConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: ReportConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

pub fn read_summary(path: &str) -> ReportResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(js)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_has_defaults() {
        let config: ReportConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.election_years(), vec![2011, 2016, 2021]);
        assert_eq!(config.trend_parties().len(), 7);
        assert_eq!(config.weak_booth_parties(), vec!["BJP", "DMK", "AIADMK"]);
        assert_eq!(config.heatmap_parties(), config.trend_parties());
        assert_eq!(config.party_aliases()["NRC"], "NR Congress");
        assert_eq!(config.sections, Sections::default());
        assert_eq!(config.rules.stats_rules().unwrap(), StatsRules::DEFAULT_RULES);
    }

    #[test]
    fn partial_sections_and_rules() {
        let config: ReportConfig = serde_json::from_str(
            r#"{
                "years": [2021, 2016],
                "sections": { "mapMarkers": false, "useManualHotspots": true },
                "rules": { "turnoutFactor": 1.5, "hotspotLimit": 3 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.election_years(), vec![2016, 2021]);
        assert!(!config.sections.map_markers);
        assert!(config.sections.overview);
        assert!(config.sections.use_manual_hotspots);
        assert!(!config.sections.use_manual_weak_booths);
        let rules = config.rules.stats_rules().unwrap();
        assert_eq!(rules.turnout_factor, 1.5);
        assert_eq!(rules.hotspot_limit, 3);
        assert_eq!(rules.weak_booth_limit, 5);
    }

    #[test]
    fn invalid_rules() {
        let rules = RulesConfig {
            turnout_factor: Some(-1.0),
            ..RulesConfig::default()
        };
        assert!(rules.stats_rules().is_err());
    }
}
