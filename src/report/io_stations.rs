// Reader for the structured booth records: one JSON object per booth, with one
// `electionYYYY` entry per election.

use crate::report::{io_common::*, *};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
struct StationRecord {
    id: Option<JSValue>,
    ac_id: Option<JSValue>,
    ps_no: Option<JSValue>,
    ps_name: Option<JSValue>,
    locality: Option<JSValue>,
    latitude: Option<JSValue>,
    longitude: Option<JSValue>,
    category: Option<JSValue>,
    #[serde(flatten)]
    others: BTreeMap<String, JSValue>,
}

#[derive(Debug, Clone, Deserialize)]
struct ElectionRecord {
    total_votes: Option<JSValue>,
    #[serde(default)]
    candidates: BTreeMap<String, JSValue>,
}

fn election_year(key: &str) -> Option<u32> {
    key.strip_prefix("election")
        .filter(|y| y.len() == 4)
        .and_then(|y| y.parse::<u32>().ok())
}

pub fn read_stations_json(path: &str) -> ReportResult<Vec<PollingStation>> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let records: Vec<StationRecord> =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;

    let mut res: Vec<PollingStation> = Vec::new();
    for (idx, rec) in records.into_iter().enumerate() {
        let assembly_id = js_label(rec.ac_id.as_ref()).unwrap_or_default();
        let station_number =
            js_label(rec.ps_no.as_ref()).unwrap_or_else(|| (idx + 1).to_string());
        let id = js_label(rec.id.as_ref())
            .unwrap_or_else(|| format!("{}_{}", assembly_id, station_number));

        let mut results: BTreeMap<u32, ElectionResult> = BTreeMap::new();
        for (key, value) in rec.others.into_iter() {
            let year = match election_year(&key) {
                Some(y) => y,
                None => continue,
            };
            // Booths without history sometimes carry null for a year.
            if value.is_null() {
                continue;
            }
            let er: ElectionRecord =
                serde_json::from_value(value).context(ParsingJsonSnafu { path })?;
            results.insert(
                year,
                ElectionResult {
                    year,
                    total_votes: js_count(er.total_votes.as_ref()),
                    candidates: er
                        .candidates
                        .iter()
                        .map(|(k, v)| (k.clone(), raw_share(v)))
                        .collect(),
                },
            );
        }
        debug!(
            "read_stations_json: booth {}: years {:?}",
            id,
            results.keys().collect::<Vec<_>>()
        );

        res.push(PollingStation {
            id,
            assembly_id,
            station_name: js_label(rec.ps_name.as_ref()).unwrap_or_default(),
            station_number,
            locality: js_label(rec.locality.as_ref()).unwrap_or_default(),
            latitude: js_number(rec.latitude.as_ref()),
            longitude: js_number(rec.longitude.as_ref()),
            category: js_label(rec.category.as_ref()).and_then(|c| Category::parse(&c)),
            results,
        });
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_fixture() {
        let path = format!("{}/tests/data/stations.json", env!("CARGO_MANIFEST_DIR"));
        let stations = read_stations_json(&path).unwrap();
        assert_eq!(stations.len(), 2);

        let s = &stations[0];
        assert_eq!(s.id, "7_1");
        assert_eq!(s.assembly_id, "7");
        assert_eq!(s.station_number, "1");
        assert_eq!(s.category, Some(Category::A));
        assert_eq!(s.total_votes(2016), 600);
        assert_eq!(s.share("AINRC", 2021), 0.5);
        // Stored as a string.
        assert_eq!(s.share("INC", 2021), 0.3);

        let s = &stations[1];
        assert_eq!(s.id, "ps-7-2");
        assert_eq!(s.category, None);
        assert!(s.result(2011).is_none());
        assert_eq!(s.share("IND", 2016), 0.0);
    }

    #[test]
    fn election_keys() {
        assert_eq!(election_year("election2021"), Some(2021));
        assert_eq!(election_year("election21"), None);
        assert_eq!(election_year("strongestParty"), None);
    }
}
