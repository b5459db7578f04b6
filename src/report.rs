use log::{debug, info, warn};

use booth_stats::builder::Builder;
use booth_stats::*;
use snafu::{prelude::*, Snafu};

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

pub mod config_reader;
pub mod io_common;
pub mod io_form20;
pub mod io_stations;
pub mod io_xlsx;

use crate::report::config_reader::*;

#[derive(Debug, Snafu)]
pub enum ReportError {
    #[snafu(display("Error opening file {path}: {source}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Worksheet {name} not found in {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("Missing column {column} in worksheet {sheet}"))]
    MissingColumn { column: String, sheet: String },
    #[snafu(display("Error opening file {path}: {source}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing file {path}: {source}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Unexpected content in {path}: {message}"))]
    JsonStructure { path: String, message: String },
    #[snafu(display("Error writing the report to {path}: {source}"))]
    WritingReport {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error serializing the report: {source}"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("No data source: pass --input or set dataSources in the configuration"))]
    MissingDataSource {},
    #[snafu(display("Several assemblies in the records ({found}), choose one with --assembly"))]
    AmbiguousAssembly { found: String },
    #[snafu(display("Unknown input type {provider}"))]
    UnknownProvider { provider: String },
    #[snafu(display("Invalid booth records: {source}"))]
    Stats { source: StatsErrors },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type ReportResult<T> = Result<T, ReportError>;

/// Command-line settings that take precedence over the configuration file.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ReportOverrides {
    pub input: Option<String>,
    pub input_type: Option<String>,
    pub assembly: Option<String>,
    pub year: Option<u32>,
    pub out: Option<String>,
}

fn apply_overrides(config: &mut ReportConfig, overrides: &ReportOverrides) {
    if let Some(input) = overrides.input.clone() {
        config.data_sources = vec![DataSource {
            provider: overrides
                .input_type
                .clone()
                .unwrap_or_else(|| "stations".to_string()),
            file_path: input,
            excel_worksheet_names: None,
        }];
    }
    if let Some(a) = overrides.assembly.clone() {
        config.assembly_id = Some(a);
    }
    if let Some(y) = overrides.year {
        config.selected_year = Some(y);
    }
    if let Some(out) = overrides.out.clone() {
        config.output_settings.output_path = Some(out);
    }
}

fn read_stations(
    config: &ReportConfig,
    root: Option<&Path>,
) -> ReportResult<Vec<PollingStation>> {
    ensure!(!config.data_sources.is_empty(), MissingDataSourceSnafu {});
    let mut res: Vec<PollingStation> = Vec::new();
    for ds in config.data_sources.iter() {
        let path = io_common::resolve_path(root, &ds.file_path);
        info!("Attempting to read {} file {:?}", ds.provider, path);
        let mut stations = match ds.provider.as_str() {
            "stations" => io_stations::read_stations_json(&path)?,
            "form20" => io_form20::read_form20(&path, config.assembly_id.as_deref())?,
            "xlsx" => io_xlsx::read_workbook(&path, ds)?,
            x => {
                return UnknownProviderSnafu { provider: x }.fail();
            }
        };
        debug!("read_stations: {}: {} booths", path, stations.len());
        res.append(&mut stations);
    }
    Ok(res)
}

// The assembly of the report: the configured one, or the only one found in the records.
fn pick_assembly(config: &ReportConfig, stations: &[PollingStation]) -> ReportResult<String> {
    if let Some(a) = config.assembly_id.clone() {
        return Ok(a);
    }
    let mut ids: Vec<&str> = stations.iter().map(|s| s.assembly_id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    match ids.as_slice() {
        [] => Ok(String::new()),
        [a] => Ok(a.to_string()),
        _ => AmbiguousAssemblySnafu {
            found: ids.join(", "),
        }
        .fail(),
    }
}

fn build_store(
    stations: Vec<PollingStation>,
    assembly_id: &str,
    config: &ReportConfig,
    rules: &StatsRules,
    years: &[u32],
) -> ReportResult<MemoryStore> {
    let mut builder = Builder::new(rules)
        .context(StatsSnafu {})?
        .years(years)
        .context(StatsSnafu {})?;
    // Extracts repeat station numbers: the repeats are kept under a suffixed id.
    let mut used: BTreeSet<String> = BTreeSet::new();
    for mut s in stations.into_iter().filter(|s| s.assembly_id == assembly_id) {
        if used.contains(&s.id) {
            let mut n = 2;
            while used.contains(&format!("{}#{}", s.id, n)) {
                n += 1;
            }
            let id = format!("{}#{}", s.id, n);
            warn!("build_store: duplicate polling station {}, kept as {}", s.id, id);
            s.id = id;
        }
        used.insert(s.id.clone());
        builder.add_station_2(s).context(StatsSnafu {})?;
    }
    if let Some(pc) = config.party_config.as_ref() {
        builder.party_config(assembly_id, &pc.selected_parties);
    }
    Ok(builder.build())
}

fn party_label(aliases: &BTreeMap<String, String>, party: &str) -> String {
    aliases
        .get(party)
        .cloned()
        .unwrap_or_else(|| party.to_string())
}

fn overview_js(stat: &AggregateStat, aliases: &BTreeMap<String, String>) -> JSValue {
    let party_shares: Vec<JSValue> = stat
        .party_shares
        .iter()
        .map(|ps| {
            json!({
                "party": ps.party,
                "label": party_label(aliases, &ps.party),
                "rawVotes": ps.raw_votes,
                "sharePct": ps.share_pct,
            })
        })
        .collect();
    let categories: Vec<JSValue> = stat
        .categories
        .iter()
        .map(|c| json!({"category": c.label(), "count": c.count}))
        .collect();
    json!({
        "year": stat.year,
        "totalBooths": stat.total_booths,
        "totalVoters": stat.total_voters,
        "totalPolled": stat.total_polled,
        "turnoutPct": round_to(stat.turnout_pct, 1),
        "partyShares": party_shares,
        "categories": categories,
    })
}

fn trends_js(report: &TrendReport, aliases: &BTreeMap<String, String>) -> JSValue {
    let years: Vec<JSValue> = report
        .years
        .iter()
        .map(|yt| {
            let shares: Vec<JSValue> = yt
                .shares
                .iter()
                .map(|s| {
                    json!({
                        "party": s.party,
                        "label": party_label(aliases, &s.party),
                        "sharePct": s.share_pct,
                        "avgVotesPerBooth": s.avg_votes_per_booth,
                    })
                })
                .collect();
            json!({
                "year": yt.year,
                "totalPolled": yt.total_polled,
                "boothCount": yt.booth_count,
                "shares": shares,
            })
        })
        .collect();
    let swings: Vec<JSValue> = report
        .swings
        .iter()
        .map(|sw| {
            let entries: Vec<JSValue> = sw
                .entries
                .iter()
                .map(|e| {
                    json!({
                        "party": e.party,
                        "label": party_label(aliases, &e.party),
                        "deltaPct": e.delta_pct,
                    })
                })
                .collect();
            json!({
                "fromYear": sw.from_year,
                "toYear": sw.to_year,
                "period": format!("{}-{}", sw.from_year, sw.to_year),
                "entries": entries,
            })
        })
        .collect();
    json!({ "years": years, "swings": swings })
}

fn weak_booths_js(
    config: &ReportConfig,
    booths: &[PollingStation],
    year: u32,
    rules: &StatsRules,
    aliases: &BTreeMap<String, String>,
) -> JSValue {
    let mut parties = config.weak_booth_parties();
    let groups: Vec<(String, Vec<JSValue>)> = if config.sections.use_manual_weak_booths {
        for m in config.manual_weak_booths.iter() {
            if !parties.contains(&m.party) {
                parties.push(m.party.clone());
            }
        }
        parties
            .iter()
            .map(|p| {
                let mut entries: Vec<&ManualWeakBooth> = config
                    .manual_weak_booths
                    .iter()
                    .filter(|m| &m.party == p)
                    .collect();
                entries.sort_by_key(|m| m.order);
                let js: Vec<JSValue> = entries
                    .iter()
                    .map(|m| json!({"locality": m.locality, "score": m.score, "order": m.order}))
                    .collect();
                (p.clone(), js)
            })
            .collect()
    } else {
        weak_booths_by_party(booths, &parties, year, rules)
            .into_iter()
            .map(|(p, wbs)| {
                let js: Vec<JSValue> = wbs
                    .iter()
                    .map(|wb| {
                        json!({
                            "stationNumber": wb.station_number,
                            "locality": wb.locality,
                            "score": round_to(wb.score, 2),
                        })
                    })
                    .collect();
                (p, js)
            })
            .collect()
    };
    let parties_js: Vec<JSValue> = groups
        .into_iter()
        .map(|(p, booths)| {
            json!({
                "label": party_label(aliases, &p),
                "party": p,
                "booths": booths,
            })
        })
        .collect();
    json!({
        "source": if config.sections.use_manual_weak_booths { "manual" } else { "computed" },
        "year": year,
        "parties": parties_js,
    })
}

fn hotspots_js(
    config: &ReportConfig,
    booths: &[PollingStation],
    year: u32,
    years: &[u32],
    rules: &StatsRules,
) -> JSValue {
    let hotspots: Vec<JSValue> = if config.sections.use_manual_hotspots {
        let mut manual: Vec<&ManualHotspot> = config.manual_hotspots.iter().collect();
        manual.sort_by_key(|m| m.order);
        manual
            .iter()
            .map(|m| {
                let mut performance: JSMap<String, JSValue> = JSMap::new();
                // Manual entries carry 2011, 2016 and 2021 only.
                for (y, perf) in [(2011, m.perf_2011), (2016, m.perf_2016), (2021, m.perf_2021)] {
                    match perf {
                        Some(x) if years.contains(&y) => {
                            performance.insert(y.to_string(), json!(x));
                        }
                        _ => {}
                    }
                }
                json!({
                    "locality": m.locality,
                    "psName": m.ps_name.clone().unwrap_or_default(),
                    "candidateName": m.candidate_name,
                    "bestPerformance": m.best_performance,
                    "bestYear": m.best_year,
                    "performance": performance,
                    "order": m.order,
                })
            })
            .collect()
    } else {
        independent_hotspots(booths, year, years, rules)
            .iter()
            .map(|h| {
                let performance: JSMap<String, JSValue> = h
                    .performance_by_year
                    .iter()
                    .map(|(y, p)| (y.to_string(), json!(p)))
                    .collect();
                json!({
                    "stationNumber": h.station_number,
                    "locality": h.locality,
                    "psName": h.station_name,
                    "candidateName": "Independent Candidate",
                    "bestPerformance": h.best_performance,
                    "bestYear": h.best_year.to_string(),
                    "performance": performance,
                })
            })
            .collect()
    };
    json!({
        "source": if config.sections.use_manual_hotspots { "manual" } else { "computed" },
        "hotspots": hotspots,
    })
}

fn booth_winners_js(
    booths: &[PollingStation],
    years: &[u32],
    aliases: &BTreeMap<String, String>,
) -> JSValue {
    let rows: Vec<JSValue> = booth_winners(booths, years)
        .iter()
        .map(|bw| {
            let by_year: JSMap<String, JSValue> = bw
                .by_year
                .iter()
                .map(|(y, w)| {
                    let js = match w {
                        BoothWinner::NoData => json!({"winner": "-", "runnerUp": "-", "margin": ""}),
                        BoothWinner::Decided {
                            winner,
                            winner_pct,
                            runner_up,
                            runner_up_pct,
                            margin_pct,
                        } => json!({
                            "winner": party_label(aliases, winner),
                            "winnerPct": round_to(*winner_pct, 1),
                            "runnerUp": runner_up
                                .as_ref()
                                .map(|r| party_label(aliases, r))
                                .unwrap_or_else(|| "-".to_string()),
                            "runnerUpPct": round_to(*runner_up_pct, 1),
                            "margin": margin_pct,
                        }),
                    };
                    (y.to_string(), js)
                })
                .collect();
            json!({
                "stationNumber": bw.station_number,
                "locality": bw.locality,
                "psName": bw.station_name,
                "years": by_year,
            })
        })
        .collect();
    JSValue::Array(rows)
}

fn booth_heat_js(bh: &BoothHeat, aliases: &BTreeMap<String, String>) -> JSMap<String, JSValue> {
    let top: Vec<JSValue> = bh
        .top_parties
        .iter()
        .map(|(p, s)| {
            json!({
                "party": p,
                "label": party_label(aliases, p),
                "sharePct": round_to(*s, 2),
            })
        })
        .collect();
    let mut m: JSMap<String, JSValue> = JSMap::new();
    m.insert("stationNumber".to_string(), json!(bh.station_number));
    m.insert("boothName".to_string(), json!(bh.booth_name));
    m.insert("psName".to_string(), json!(bh.station_name));
    m.insert(
        "winner".to_string(),
        json!(bh
            .winning_party
            .as_ref()
            .map(|p| party_label(aliases, p))
            .unwrap_or_else(|| "Unknown".to_string())),
    );
    m.insert("voteShare".to_string(), json!(round_to(bh.vote_share, 2)));
    m.insert("topParties".to_string(), JSValue::Array(top));
    m.insert("totalVotes".to_string(), json!(bh.total_votes));
    m
}

fn party_shares_js(shares: &[(PartyCode, f64)]) -> JSMap<String, JSValue> {
    shares
        .iter()
        .map(|(p, s)| (p.clone(), json!(round_to(*s, 2))))
        .collect()
}

/// Assembles the JSON report of one assembly.
pub fn build_report_js(
    config: &ReportConfig,
    assembly_id: &str,
    booths: &[PollingStation],
    party_config: &PartyDisplayConfig,
    rules: &StatsRules,
    years: &[u32],
    selected_year: u32,
) -> JSValue {
    let aliases = config.party_aliases();
    let sections = &config.sections;
    let mut report: JSMap<String, JSValue> = JSMap::new();

    report.insert(
        "config".to_string(),
        json!({
            "assembly": config
                .output_settings
                .assembly_name
                .clone()
                .unwrap_or_else(|| assembly_id.to_string()),
            "assemblyId": assembly_id,
            "years": years,
            "selectedYear": selected_year,
            "turnoutFactor": rules.turnout_factor,
        }),
    );
    report.insert("noData".to_string(), json!(booths.is_empty()));

    if sections.overview {
        let stat = assembly_overview(booths, selected_year, &party_config.selected_parties, rules);
        report.insert("overview".to_string(), overview_js(&stat, &aliases));
    }
    if sections.trends {
        let trends = electoral_trends(booths, years, &config.trend_parties(), rules);
        report.insert("trends".to_string(), trends_js(&trends, &aliases));
    }
    if sections.weak_booths {
        report.insert(
            "weakBooths".to_string(),
            weak_booths_js(config, booths, selected_year, rules, &aliases),
        );
    }
    if sections.independent_hotspots {
        report.insert(
            "independentHotspots".to_string(),
            hotspots_js(config, booths, selected_year, years, rules),
        );
    }
    if sections.booth_winners {
        report.insert(
            "boothWinners".to_string(),
            booth_winners_js(booths, years, &aliases),
        );
    }
    if sections.candidate_heatmap {
        let rows: Vec<JSValue> = candidate_heatmap(booths, selected_year, rules)
            .iter()
            .map(|bh| JSValue::Object(booth_heat_js(bh, &aliases)))
            .collect();
        report.insert("candidateHeatmap".to_string(), JSValue::Array(rows));
    }
    if sections.map_markers {
        let markers: Vec<JSValue> = map_markers(booths, selected_year, rules)
            .iter()
            .map(|mm| {
                let mut m = booth_heat_js(&mm.booth, &aliases);
                m.insert("lat".to_string(), json!(mm.latitude));
                m.insert("lng".to_string(), json!(mm.longitude));
                m.insert(
                    "category".to_string(),
                    json!(mm.category.map(|c| c.label())),
                );
                JSValue::Object(m)
            })
            .collect();
        report.insert("mapMarkers".to_string(), JSValue::Array(markers));
    }
    let heat_parties = config.heatmap_parties();
    if sections.party_heatmap {
        let rows: Vec<JSValue> = party_heatmap(booths, selected_year, &heat_parties)
            .iter()
            .map(|r| {
                json!({
                    "stationNumber": r.station_number,
                    "boothName": r.booth_name,
                    "psName": r.station_name,
                    "shares": party_shares_js(&r.shares),
                })
            })
            .collect();
        report.insert(
            "partyHeatmap".to_string(),
            json!({"parties": heat_parties, "rows": rows}),
        );
    }
    if sections.localities {
        let rows: Vec<JSValue> = locality_summaries(booths, selected_year, &heat_parties)
            .iter()
            .map(|l| {
                json!({
                    "locality": l.locality,
                    "stations": l.stations,
                    "averageShares": party_shares_js(&l.average_shares),
                })
            })
            .collect();
        report.insert("localities".to_string(), JSValue::Array(rows));
    }
    if sections.custom_cards {
        let mut cards: Vec<&CustomCard> = config.custom_cards.iter().collect();
        cards.sort_by_key(|c| c.order);
        report.insert("customCards".to_string(), json!(cards));
    }

    JSValue::Object(report)
}

/// Reads the records, then computes the report of the configured assembly.
pub fn compute_report(config: &ReportConfig, root: Option<&Path>) -> ReportResult<JSValue> {
    let rules = config.rules.stats_rules()?;
    let years = config.election_years();
    let selected_year = match config.selected_year.or_else(|| years.last().copied()) {
        Some(y) => y,
        None => whatever!("No election year configured"),
    };

    let stations = read_stations(config, root)?;
    let assembly_id = pick_assembly(config, &stations)?;
    info!(
        "compute_report: assembly {:?}, years {:?}, selected year {}",
        assembly_id, years, selected_year
    );
    let store = build_store(stations, &assembly_id, config, &rules, &years)?;

    let booths = store
        .fetch_booths_for_assembly(&assembly_id)
        .context(StatsSnafu {})?;
    if booths.is_empty() {
        warn!("No booth found for assembly {:?}", assembly_id);
    }
    let party_config = store
        .fetch_party_display_config(&assembly_id)
        .context(StatsSnafu {})?
        .unwrap_or_default();

    Ok(build_report_js(
        config,
        &assembly_id,
        &booths,
        &party_config,
        &rules,
        &years,
        selected_year,
    ))
}

fn write_report(out: Option<&str>, pretty_js: &str) -> ReportResult<()> {
    match out {
        None | Some("stdout") => {
            println!("{}", pretty_js);
        }
        Some("") => {}
        Some(path) => {
            fs::write(path, pretty_js).context(WritingReportSnafu { path })?;
            info!("Report written to {}", path);
        }
    }
    Ok(())
}

pub fn run_report(
    config_path: Option<String>,
    overrides: &ReportOverrides,
    check_summary_path: Option<String>,
) -> ReportResult<()> {
    let (mut config, root) = match config_path {
        Some(p) => {
            let config = read_config(&p)?;
            let root = Path::new(&p)
                .parent()
                .context(MissingParentDirSnafu {})?
                .to_path_buf();
            (config, Some(root))
        }
        None => (ReportConfig::default(), None),
    };
    apply_overrides(&mut config, overrides);
    debug!("config: {:?}", config);

    let report_js = compute_report(&config, root.as_deref())?;
    let pretty_js_report =
        serde_json::to_string_pretty(&report_js).context(SerializingJsonSnafu {})?;
    write_report(config.output_settings.output_path.as_deref(), &pretty_js_report)?;

    // The reference report, if provided for comparison
    if let Some(summary_p) = check_summary_path {
        let summary_ref = read_summary(&summary_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(SerializingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_report {
            warn!("Found differences with the reference report");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_report.as_ref(),
                "\n",
            );
            whatever!("Difference detected between the computed report and the reference report")
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_path(name: &str) -> String {
        format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), name)
    }

    fn form20_config() -> ReportConfig {
        let mut config = read_config(&data_path("poovam_config.json")).unwrap();
        config.data_sources[0].file_path = data_path("poovam_form20.json");
        config
    }

    #[test]
    fn form20_report() {
        let _ = env_logger::builder().is_test(true).try_init();
        let report = compute_report(&form20_config(), None).unwrap();

        assert_eq!(report["noData"], json!(false));
        assert_eq!(report["config"]["assembly"], json!("Poovam"));
        assert_eq!(report["config"]["assemblyId"], json!("24"));

        let overview = &report["overview"];
        assert_eq!(overview["totalBooths"], json!(4));
        assert_eq!(overview["totalPolled"], json!(3200));
        assert_eq!(overview["totalVoters"], json!(4000));
        assert_eq!(overview["turnoutPct"], json!(80.0));
        // Only the selected parties, in share order.
        let parties: Vec<&str> = overview["partyShares"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["party"].as_str().unwrap())
            .collect();
        assert_eq!(parties, vec!["NRC", "DMK"]);
        assert_eq!(overview["partyShares"][0]["label"], json!("NR Congress"));
        assert_eq!(overview["partyShares"][0]["sharePct"], json!(40.0));
    }

    #[test]
    fn config_file() {
        // The data file is found next to the configuration.
        let res = run_report(
            Some(data_path("poovam_config.json")),
            &ReportOverrides::default(),
            None,
        );
        assert!(res.is_ok());
    }

    #[test]
    fn form20_sections() {
        let report = compute_report(&form20_config(), None).unwrap();

        let years: Vec<u64> = report["trends"]["years"]
            .as_array()
            .unwrap()
            .iter()
            .map(|y| y["year"].as_u64().unwrap())
            .collect();
        assert_eq!(years, vec![2016, 2021]);
        assert_eq!(report["trends"]["swings"][0]["period"], json!("2016-2021"));

        // Manual weak booths are configured and switched on.
        assert_eq!(report["weakBooths"]["source"], json!("manual"));
        assert_eq!(report["weakBooths"]["parties"][0]["party"], json!("BJP"));
        assert_eq!(
            report["weakBooths"]["parties"][0]["booths"][0]["locality"],
            json!("KOTTUCHERRY")
        );

        // Booth 3 has an independent at 12%.
        let hotspots = report["independentHotspots"]["hotspots"].as_array().unwrap();
        assert_eq!(report["independentHotspots"]["source"], json!("computed"));
        assert_eq!(hotspots.len(), 1);
        assert_eq!(hotspots[0]["stationNumber"], json!("3"));
        assert_eq!(hotspots[0]["bestYear"], json!("2021"));

        let winners = report["boothWinners"].as_array().unwrap();
        assert_eq!(winners.len(), 4);
        assert_eq!(winners[0]["stationNumber"], json!("1"));
        assert_eq!(winners[0]["years"]["2021"]["winner"], json!("NR Congress"));
        assert_eq!(winners[3]["years"]["2016"]["winner"], json!("-"));
        assert_eq!(winners[3]["years"]["2016"]["margin"], json!(""));

        // The map markers are switched off.
        assert!(report.get("mapMarkers").is_none());
        assert_eq!(report["candidateHeatmap"].as_array().unwrap().len(), 4);

        let cards: Vec<&str> = report["customCards"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["heading"].as_str().unwrap())
            .collect();
        assert_eq!(cards, vec!["Key issues", "Field notes"]);
    }

    #[test]
    fn stations_input_from_the_command_line() {
        let overrides = ReportOverrides {
            input: Some(data_path("stations.json")),
            input_type: Some("stations".to_string()),
            year: Some(2016),
            ..ReportOverrides::default()
        };
        let mut config = ReportConfig::default();
        apply_overrides(&mut config, &overrides);
        let report = compute_report(&config, None).unwrap();
        assert_eq!(report["config"]["assemblyId"], json!("7"));
        assert_eq!(report["config"]["selectedYear"], json!(2016));
        assert_eq!(report["overview"]["totalBooths"], json!(2));
        assert_eq!(report["overview"]["totalPolled"], json!(1100));
        assert_eq!(report["localities"][0]["locality"], json!("ARIYUR"));
        assert_eq!(report["localities"][0]["stations"], json!(2));
    }

    #[test]
    fn empty_assembly_has_no_data() {
        let mut config = form20_config();
        config.assembly_id = Some("99".to_string());
        let report = compute_report(&config, None).unwrap();
        assert_eq!(report["noData"], json!(true));
        assert_eq!(report["overview"]["totalPolled"], json!(0));
        assert_eq!(report["overview"]["turnoutPct"], json!(0.0));
        assert!(report["candidateHeatmap"].as_array().unwrap().is_empty());
    }

    #[test]
    fn errors() {
        let config = ReportConfig::default();
        assert!(matches!(
            compute_report(&config, None),
            Err(ReportError::MissingDataSource {})
        ));

        let mut config = ReportConfig::default();
        apply_overrides(
            &mut config,
            &ReportOverrides {
                input: Some(data_path("stations.json")),
                input_type: Some("csv".to_string()),
                ..ReportOverrides::default()
            },
        );
        assert!(matches!(
            compute_report(&config, None),
            Err(ReportError::UnknownProvider { .. })
        ));

        let mut config = form20_config();
        config.assembly_id = None;
        assert!(matches!(
            compute_report(&config, None),
            Err(ReportError::AmbiguousAssembly { .. })
        ));
    }

    #[test]
    fn reference_check() {
        let overrides = ReportOverrides {
            input: Some(data_path("stations.json")),
            out: Some(String::new()),
            ..ReportOverrides::default()
        };
        let mut config = ReportConfig::default();
        apply_overrides(&mut config, &overrides);
        let report = compute_report(&config, None).unwrap();

        let dir = std::env::temp_dir();
        let good = dir.join("boothstats_reference_good.json");
        fs::write(&good, serde_json::to_string(&report).unwrap()).unwrap();
        let res = run_report(None, &overrides, Some(good.display().to_string()));
        assert!(res.is_ok());

        let mut changed = report.clone();
        changed["noData"] = json!(true);
        let bad = dir.join("boothstats_reference_bad.json");
        fs::write(&bad, serde_json::to_string(&changed).unwrap()).unwrap();
        let res = run_report(None, &overrides, Some(bad.display().to_string()));
        assert!(matches!(res, Err(ReportError::Whatever { .. })));
    }

    fn booth(id: &str, assembly_id: &str, number: &str) -> PollingStation {
        PollingStation {
            id: id.to_string(),
            assembly_id: assembly_id.to_string(),
            station_number: number.to_string(),
            locality: "POOVAM".to_string(),
            station_name: String::new(),
            latitude: 0.0,
            longitude: 0.0,
            category: None,
            results: BTreeMap::new(),
        }
    }

    #[test]
    fn store_keeps_repeated_ids() {
        let config = ReportConfig::default();
        let stations = vec![
            booth("24_5", "24", "5"),
            booth("24_5", "24", "5"),
            booth("24_5#2", "24", "7"),
            booth("24_5", "25", "5"),
        ];
        let store = build_store(
            stations,
            "24",
            &config,
            &StatsRules::DEFAULT_RULES,
            &[2016, 2021],
        )
        .unwrap();
        let ids: Vec<String> = store
            .fetch_booths_for_assembly("24")
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["24_5", "24_5#2", "24_5#2#2"]);
        // Other assemblies are not loaded.
        assert!(store.fetch_booths_for_assembly("25").unwrap().is_empty());
    }

    #[test]
    fn form20_repeated_station_numbers() {
        let path = std::env::temp_dir().join("boothstats_repeated_form20.json");
        let js = json!({"AC_24_FINAL": [
            {"PS_NO_2021": 5, "POLLED_2021": 100, "BJP_2021_pct": 0.5},
            {"PS_NO_2021": 5, "POLLED_2021": 300, "BJP_2021_pct": 0.2},
        ]});
        fs::write(&path, js.to_string()).unwrap();

        let mut config = ReportConfig::default();
        apply_overrides(
            &mut config,
            &ReportOverrides {
                input: Some(path.display().to_string()),
                input_type: Some("form20".to_string()),
                assembly: Some("24".to_string()),
                year: Some(2021),
                out: None,
            },
        );
        let report = compute_report(&config, None).unwrap();
        assert_eq!(report["overview"]["totalBooths"], json!(2));
        assert_eq!(report["overview"]["totalPolled"], json!(400));
    }

    #[test]
    fn stations_ids_shared_across_assemblies() {
        let path = std::env::temp_dir().join("boothstats_shared_ids.json");
        let js = json!([
            {"id": "PS-1", "ac_id": "24", "ps_no": "1", "locality": "POOVAM",
             "election2021": {"total_votes": 100, "candidates": {"BJP": 0.4}}},
            {"id": "PS-1", "ac_id": "25", "ps_no": "1", "locality": "ARIYUR",
             "election2021": {"total_votes": 250, "candidates": {"BJP": 0.1}}},
        ]);
        fs::write(&path, js.to_string()).unwrap();

        let mut config = ReportConfig::default();
        apply_overrides(
            &mut config,
            &ReportOverrides {
                input: Some(path.display().to_string()),
                assembly: Some("24".to_string()),
                year: Some(2021),
                ..ReportOverrides::default()
            },
        );
        let report = compute_report(&config, None).unwrap();
        assert_eq!(report["noData"], json!(false));
        assert_eq!(report["overview"]["totalBooths"], json!(1));
        assert_eq!(report["overview"]["totalPolled"], json!(100));
    }

    #[test]
    fn manual_hotspots_follow_years() {
        let mut config = form20_config();
        config.sections.use_manual_hotspots = true;
        config.manual_hotspots = vec![ManualHotspot {
            locality: "POOVAM".to_string(),
            ps_name: None,
            candidate_name: "R. Kumar".to_string(),
            best_performance: 0.2,
            best_year: "2016".to_string(),
            perf_2021: None,
            perf_2016: Some(0.2),
            perf_2011: Some(0.1),
            order: 1,
        }];
        let report = compute_report(&config, None).unwrap();
        let hotspots = &report["independentHotspots"];
        assert_eq!(hotspots["source"], json!("manual"));
        assert_eq!(hotspots["hotspots"][0]["performance"], json!({"2016": 0.2}));
    }
}
