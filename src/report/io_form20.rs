// Reader for the flat Form 20 extracts.
//
// The file is a JSON object. Each `AC_<id>_FINAL` key holds the rows of one assembly,
// one row per booth, with columns such as `BJP_2021_pct`, `POLLED_2021` or `PS_NO_2021`.

use crate::report::{io_common::*, *};

/// The most recent year of the station numbers.
const STATION_NUMBER_YEAR: &str = "PS_NO_2021";

fn assembly_key(key: &str) -> Option<&str> {
    key.strip_prefix("AC_")
        .and_then(|k| k.strip_suffix("_FINAL"))
        .filter(|k| !k.is_empty())
}

fn year_suffix(s: &str) -> Option<u32> {
    if s.len() == 4 && s.chars().all(|c| c.is_ascii_digit()) {
        s.parse::<u32>().ok()
    } else {
        None
    }
}

// `BJP_2021_pct` -> (BJP, 2021)
fn share_column(column: &str) -> Option<(&str, u32)> {
    let (party, year) = column.strip_suffix("_pct")?.rsplit_once('_')?;
    let year = year_suffix(year)?;
    if party.is_empty() {
        None
    } else {
        Some((party, year))
    }
}

// `POLLED_2021` -> 2021
fn polled_column(column: &str) -> Option<u32> {
    column.strip_prefix("POLLED_").and_then(year_suffix)
}

fn station_number(row: &JSMap<String, JSValue>, index: usize) -> String {
    if let Some(n) = js_label(row.get(STATION_NUMBER_YEAR)) {
        return n;
    }
    // Older extracts only have the numbers of earlier years.
    let latest = row
        .iter()
        .filter_map(|(k, v)| {
            k.strip_prefix("PS_NO_")
                .and_then(year_suffix)
                .map(|y| (y, v))
        })
        .max_by_key(|(y, _)| *y);
    latest
        .and_then(|(_, v)| js_label(Some(v)))
        // Else the position of the row, counted from 1.
        .unwrap_or_else(|| (index + 1).to_string())
}

fn read_row(assembly_id: &str, index: usize, row: &JSMap<String, JSValue>) -> PollingStation {
    let mut results: BTreeMap<u32, ElectionResult> = BTreeMap::new();
    for (column, value) in row.iter() {
        if let Some((party, year)) = share_column(column) {
            if !is_candidate_key(party) {
                continue;
            }
            results
                .entry(year)
                .or_insert_with(|| ElectionResult {
                    year,
                    total_votes: 0,
                    candidates: BTreeMap::new(),
                })
                .candidates
                .insert(party.to_string(), raw_share(value));
        } else if let Some(year) = polled_column(column) {
            results
                .entry(year)
                .or_insert_with(|| ElectionResult {
                    year,
                    total_votes: 0,
                    candidates: BTreeMap::new(),
                })
                .total_votes = js_count(Some(value));
        }
    }

    let number = station_number(row, index);
    PollingStation {
        id: format!("{}_{}", assembly_id, number),
        assembly_id: assembly_id.to_string(),
        station_name: js_label(row.get("PS_NAME")).unwrap_or_else(|| format!("Station {}", number)),
        station_number: number,
        locality: js_label(row.get("LOCALITY_EXTRACTED")).unwrap_or_default(),
        latitude: js_number(row.get("Latitude")),
        longitude: js_number(row.get("Longitude")),
        category: js_label(row.get("TOP_SCORE_CATEGORY")).and_then(|c| Category::parse(&c)),
        results,
    }
}

/// Reads the booths of a Form 20 extract, only for the given assembly if one is given.
pub fn read_form20(path: &str, assembly: Option<&str>) -> ReportResult<Vec<PollingStation>> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    let obj = js.as_object().context(JsonStructureSnafu {
        path,
        message: "expected an object with AC_<id>_FINAL keys",
    })?;

    let mut res: Vec<PollingStation> = Vec::new();
    for (key, value) in obj.iter() {
        let assembly_id = match assembly_key(key) {
            Some(a) => a,
            None => {
                debug!("read_form20: skipping key {:?}", key);
                continue;
            }
        };
        if assembly.map(|a| a != assembly_id).unwrap_or(false) {
            continue;
        }
        let rows = value.as_array().context(JsonStructureSnafu {
            path,
            message: format!("{} is not a list of booths", key),
        })?;
        for (index, row) in rows.iter().enumerate() {
            match row.as_object() {
                Some(r) => res.push(read_row(assembly_id, index, r)),
                None => warn!("read_form20: {}: row {} is not an object", key, index),
            }
        }
        info!("read_form20: assembly {}: {} booths", assembly_id, rows.len());
    }
    Ok(res)
}
