// Reader for the Excel workbooks of raw vote counts, one worksheet per election year.

use calamine::{open_workbook, DataType, Range, Reader, Xlsx};

use crate::report::*;

/// Parties are spelled in many ways across the years.
fn normalize_party(name: &str) -> String {
    let name = name.trim().to_uppercase();
    let alias = match name.as_str() {
        "JANA SENA" | "JATIYA JANA SENA PARTY" | "JSP" => "JANASENA",
        "Y.S.R.C.P" => "YSRCP",
        "TELUGUDE SHAM PARTY" => "TDP",
        "CONGRESS" => "INC",
        "BAHUJAN SAMAJ PARTY" | "B.S.P" => "BSP",
        _ => return name,
    };
    alias.to_string()
}

/// The share of a count, rounded to 6 decimals.
fn share(votes: u64, total: u64) -> f64 {
    if total > 0 {
        round_to(votes as f64 / total as f64, 6)
    } else {
        0.0
    }
}

// "2021", "AE 2016" -> the year. Other worksheets are not election results.
fn sheet_year(name: &str) -> Option<u32> {
    let digits: String = name.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 4 {
        digits.parse::<u32>().ok()
    } else {
        None
    }
}

fn cell_label(cell: Option<&DataType>) -> Option<String> {
    match cell {
        Some(DataType::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(DataType::Int(i)) => Some(i.to_string()),
        Some(DataType::Float(f)) if f.fract() == 0.0 => Some(format!("{}", *f as i64)),
        Some(DataType::Float(f)) => Some(f.to_string()),
        _ => None,
    }
}

fn cell_count(cell: Option<&DataType>) -> u64 {
    let x = match cell {
        Some(DataType::Int(i)) => *i as f64,
        Some(DataType::Float(f)) => *f,
        Some(DataType::String(s)) => parse_share(s.as_str()),
        _ => 0.0,
    };
    if x > 0.0 {
        x.trunc() as u64
    } else {
        0
    }
}

struct SheetColumns {
    assembly: usize,
    station_number: usize,
    locality: Option<usize>,
    station_name: Option<usize>,
    total: Option<usize>,
    parties: Vec<(usize, PartyCode)>,
}

fn sheet_columns(header: &[DataType], sheet: &str) -> ReportResult<SheetColumns> {
    let names: Vec<String> = header
        .iter()
        .map(|c| cell_label(Some(c)).unwrap_or_default().to_uppercase())
        .collect();
    let find = |n: &str| names.iter().position(|x| x == n);

    let assembly = find("AC").context(MissingColumnSnafu { column: "AC", sheet })?;
    let station_number = find("PS_NO").context(MissingColumnSnafu {
        column: "PS_NO",
        sheet,
    })?;
    let locality = find("LOCALITY");
    let station_name = find("PS_NAME");
    let total = find("POLLED").or_else(|| names.iter().position(|x| x.contains("TOTAL")));

    let parties: Vec<(usize, PartyCode)> = names
        .iter()
        .enumerate()
        .filter(|(idx, n)| {
            !n.is_empty()
                && *idx != assembly
                && *idx != station_number
                && Some(*idx) != locality
                && Some(*idx) != station_name
                && Some(*idx) != total
        })
        .map(|(idx, n)| (idx, normalize_party(n)))
        .collect();
    debug!("sheet_columns: {}: parties {:?}", sheet, parties);

    Ok(SheetColumns {
        assembly,
        station_number,
        locality,
        station_name,
        total,
        parties,
    })
}

/// Adds the results of one worksheet to the booths, keyed by (assembly, station number).
fn read_sheet(
    range: &Range<DataType>,
    sheet: &str,
    year: u32,
    booths: &mut BTreeMap<(String, String), PollingStation>,
) -> ReportResult<()> {
    let mut rows = range.rows();
    let header = match rows.next() {
        Some(h) => h,
        None => {
            warn!("read_sheet: worksheet {} is empty", sheet);
            return Ok(());
        }
    };
    let cols = sheet_columns(header, sheet)?;

    for (idx, row) in rows.enumerate() {
        let assembly_id = cell_label(row.get(cols.assembly));
        let number = cell_label(row.get(cols.station_number));
        let (assembly_id, number) = match (assembly_id, number) {
            (Some(a), Some(n)) if n != "0" => (a, n),
            _ => {
                debug!("read_sheet: {}: skipping row {}", sheet, idx + 1);
                continue;
            }
        };

        let mut votes: BTreeMap<PartyCode, u64> = BTreeMap::new();
        for (col, party) in cols.parties.iter() {
            let v = cell_count(row.get(*col));
            if v > 0 {
                *votes.entry(party.clone()).or_insert(0) += v;
            }
        }
        let total = match cols.total.map(|c| cell_count(row.get(c))) {
            Some(t) if t > 0 => t,
            _ => votes.values().sum(),
        };
        if total == 0 {
            continue;
        }
        let candidates: BTreeMap<PartyCode, RawShare> = votes
            .iter()
            .map(|(p, v)| (p.clone(), RawShare::Number(share(*v, total))))
            .collect();

        let station = booths
            .entry((assembly_id.clone(), number.clone()))
            .or_insert_with(|| PollingStation {
                id: format!("{}_{}", assembly_id, number),
                assembly_id: assembly_id.clone(),
                station_number: number.clone(),
                locality: String::new(),
                station_name: String::new(),
                latitude: 0.0,
                longitude: 0.0,
                category: None,
                results: BTreeMap::new(),
            });
        if station.locality.is_empty() {
            if let Some(l) = cols.locality.and_then(|c| cell_label(row.get(c))) {
                station.locality = l;
            }
        }
        if station.station_name.is_empty() {
            if let Some(n) = cols.station_name.and_then(|c| cell_label(row.get(c))) {
                station.station_name = n;
            }
        }
        station.results.insert(
            year,
            ElectionResult {
                year,
                total_votes: total,
                candidates,
            },
        );
    }
    Ok(())
}

pub fn read_workbook(path: &str, ds: &DataSource) -> ReportResult<Vec<PollingStation>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let sheet_names: Vec<String> = match ds.excel_worksheet_names.clone() {
        Some(names) => names,
        None => workbook.sheet_names().to_vec(),
    };

    let mut booths: BTreeMap<(String, String), PollingStation> = BTreeMap::new();
    for name in sheet_names.iter() {
        let year = match sheet_year(name) {
            Some(y) => y,
            None => {
                warn!("read_workbook: {}: worksheet {} is not named by a year", path, name);
                continue;
            }
        };
        let range = workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { name, path })?
            .context(OpeningExcelSnafu { path })?;
        read_sheet(&range, name, year, &mut booths)?;
        info!("read_workbook: {}: worksheet {} read", path, name);
    }
    Ok(booths.into_values().collect())
}
