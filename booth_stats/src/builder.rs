pub use crate::config::*;
use crate::store::MemoryStore;

use std::collections::BTreeMap;

/// A builder for assembling booth records by hand.
///
/// ```
/// pub use booth_stats::builder::Builder;
/// pub use booth_stats::StatsRules;
/// # use booth_stats::StatsErrors;
/// use booth_stats::RecordStore;
///
/// let mut builder = Builder::new(&StatsRules::DEFAULT_RULES)?
///     .years(&[2016, 2021])?;
///
/// builder.add_station("24", "1", "POOVAM")?;
/// builder.add_result_simple("1", 2021, 812, &[("AINRC", 0.43), ("INC", 0.31)])?;
///
/// let store = builder.build();
/// assert_eq!(store.fetch_booths_for_assembly("24")?.len(), 1);
///
/// # Ok::<(), StatsErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: StatsRules,
    pub(crate) _years: Vec<u32>,
    pub(crate) _stations: Vec<PollingStation>,
    pub(crate) _party_configs: BTreeMap<String, PartyDisplayConfig>,
}

impl Builder {
    pub fn new(rules: &StatsRules) -> Result<Builder, StatsErrors> {
        rules.validate()?;
        Ok(Builder {
            _rules: *rules,
            _years: Vec::new(),
            _stations: Vec::new(),
            _party_configs: BTreeMap::new(),
        })
    }

    /// The election years of interest, in any order.
    pub fn years(self, years: &[u32]) -> Result<Builder, StatsErrors> {
        if years.is_empty() {
            return Err(StatsErrors::EmptyYears);
        }
        let mut ys = years.to_vec();
        ys.sort_unstable();
        ys.dedup();
        Ok(Builder {
            _years: ys,
            ..self
        })
    }

    /// Adds a booth with no results yet. The station number doubles as the identifier.
    pub fn add_station(
        &mut self,
        assembly_id: &str,
        station_number: &str,
        locality: &str,
    ) -> Result<(), StatsErrors> {
        self.add_station_2(PollingStation {
            id: format!("{}_{}", assembly_id, station_number),
            assembly_id: assembly_id.to_string(),
            station_number: station_number.to_string(),
            locality: locality.to_string(),
            station_name: String::new(),
            latitude: 0.0,
            longitude: 0.0,
            category: None,
            results: BTreeMap::new(),
        })
    }

    /// Adds a fully described booth.
    pub fn add_station_2(&mut self, station: PollingStation) -> Result<(), StatsErrors> {
        if self._stations.iter().any(|s| s.id == station.id) {
            return Err(StatsErrors::DuplicateStation(station.id));
        }
        self._stations.push(station);
        Ok(())
    }

    /// Sets the result of one year at a booth, replacing any previous result.
    ///
    /// `station` is either the identifier or the station number of a booth.
    pub fn add_result_simple(
        &mut self,
        station: &str,
        year: u32,
        total_votes: u64,
        shares: &[(&str, f64)],
    ) -> Result<(), StatsErrors> {
        let candidates: BTreeMap<PartyCode, RawShare> = shares
            .iter()
            .map(|(party, share)| (party.to_string(), RawShare::Number(*share)))
            .collect();
        self.add_result(
            station,
            ElectionResult {
                year,
                total_votes,
                candidates,
            },
        )
    }

    pub fn add_result(&mut self, station: &str, result: ElectionResult) -> Result<(), StatsErrors> {
        let st = self
            ._stations
            .iter_mut()
            .find(|s| s.id == station || s.station_number == station)
            .ok_or_else(|| StatsErrors::UnknownStation(station.to_string()))?;
        st.results.insert(result.year, result);
        Ok(())
    }

    pub fn party_config(&mut self, assembly_id: &str, selected_parties: &[PartyCode]) {
        self._party_configs.insert(
            assembly_id.to_string(),
            PartyDisplayConfig {
                selected_parties: selected_parties.to_vec(),
            },
        );
    }

    pub fn election_years(&self) -> &[u32] {
        &self._years
    }

    pub fn build(self) -> MemoryStore {
        MemoryStore {
            stations: self._stations,
            party_configs: self._party_configs,
        }
    }
}
