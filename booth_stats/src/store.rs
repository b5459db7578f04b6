use std::collections::BTreeMap;

use log::debug;

use crate::config::*;

/// The source of the booth records.
///
/// The statistics only work on records that were fully fetched: an implementation
/// returns all the booths of an assembly or an error, never a partial list.
pub trait RecordStore {
    /// The booths of an assembly, with all the election years that are known.
    ///
    /// An unknown assembly has no booths.
    fn fetch_booths_for_assembly(&self, assembly_id: &str) -> Result<Vec<PollingStation>, StatsErrors>;

    /// The parties to display for an assembly, if they were configured.
    fn fetch_party_display_config(
        &self,
        assembly_id: &str,
    ) -> Result<Option<PartyDisplayConfig>, StatsErrors>;
}

/// A record store that holds everything in memory.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct MemoryStore {
    pub(crate) stations: Vec<PollingStation>,
    pub(crate) party_configs: BTreeMap<String, PartyDisplayConfig>,
}

impl MemoryStore {
    pub fn new(stations: Vec<PollingStation>) -> MemoryStore {
        MemoryStore {
            stations,
            party_configs: BTreeMap::new(),
        }
    }

    pub fn set_party_config(&mut self, assembly_id: &str, config: PartyDisplayConfig) {
        self.party_configs.insert(assembly_id.to_string(), config);
    }
}

impl RecordStore for MemoryStore {
    fn fetch_booths_for_assembly(&self, assembly_id: &str) -> Result<Vec<PollingStation>, StatsErrors> {
        let res: Vec<PollingStation> = self
            .stations
            .iter()
            .filter(|s| s.assembly_id == assembly_id)
            .cloned()
            .collect();
        debug!(
            "fetch_booths_for_assembly: {}: {} booths",
            assembly_id,
            res.len()
        );
        Ok(res)
    }

    fn fetch_party_display_config(
        &self,
        assembly_id: &str,
    ) -> Result<Option<PartyDisplayConfig>, StatsErrors> {
        Ok(self.party_configs.get(assembly_id).cloned())
    }
}
