use std::collections::BTreeMap;

use log::info;

use crate::*;

// The candidate shares of a booth as percentages, largest first.
fn ranked_percentages(station: &PollingStation, year: u32) -> Vec<(PartyCode, f64)> {
    let mut shares: Vec<(PartyCode, f64)> = match station.result(year) {
        Some(r) => normalize_candidates(&r.candidates)
            .into_iter()
            .map(|(party, share)| (party, share * 100.0))
            .collect(),
        None => vec![],
    };
    shares.sort_by(|(_, a), (_, b)| b.total_cmp(a));
    shares
}

fn booth_heat(station: &PollingStation, year: u32, shares: Vec<(PartyCode, f64)>, rules: &StatsRules) -> BoothHeat {
    let (winning_party, vote_share) = match shares.first() {
        Some((p, s)) => (Some(p.clone()), *s),
        None => (None, 0.0),
    };
    BoothHeat {
        station_number: station.station_number.clone(),
        booth_name: station.display_name(),
        station_name: station.station_name.clone(),
        winning_party,
        vote_share,
        top_parties: shares.into_iter().take(rules.heatmap_top_parties).collect(),
        total_votes: station.total_votes(year),
    }
}

/// The leading party of every booth, strongest booths first.
pub fn candidate_heatmap(stations: &[PollingStation], year: u32, rules: &StatsRules) -> Vec<BoothHeat> {
    info!("candidate_heatmap: {} booths, year {}", stations.len(), year);
    let mut res: Vec<BoothHeat> = stations
        .iter()
        .map(|s| booth_heat(s, year, ranked_percentages(s, year), rules))
        .collect();
    res.sort_by(|a, b| b.vote_share.total_cmp(&a.vote_share));
    res
}

/// The booths that can be placed on a map, with their leading party.
///
/// Parties with no share are not listed, and booths without coordinates are skipped.
pub fn map_markers(stations: &[PollingStation], year: u32, rules: &StatsRules) -> Vec<MapMarker> {
    stations
        .iter()
        .filter(|s| s.latitude != 0.0 && s.longitude != 0.0)
        .map(|s| {
            let shares: Vec<(PartyCode, f64)> = ranked_percentages(s, year)
                .into_iter()
                .filter(|(_, share)| *share > 0.0)
                .collect();
            MapMarker {
                booth: booth_heat(s, year, shares, rules),
                latitude: s.latitude,
                longitude: s.longitude,
                category: s.category,
            }
        })
        .collect()
}

/// The share of each of the given parties at every booth, in percent.
pub fn party_heatmap(stations: &[PollingStation], year: u32, parties: &[PartyCode]) -> Vec<PartyHeatRow> {
    stations
        .iter()
        .map(|s| PartyHeatRow {
            station_number: s.station_number.clone(),
            booth_name: s.display_name(),
            station_name: s.station_name.clone(),
            shares: parties
                .iter()
                .map(|p| (p.clone(), s.share(p, year) * 100.0))
                .collect(),
        })
        .collect()
}

/// Groups the booths by locality, with the average share of the given parties.
///
/// Localities with the most booths come first.
pub fn locality_summaries(
    stations: &[PollingStation],
    year: u32,
    parties: &[PartyCode],
) -> Vec<LocalitySummary> {
    // locality -> (number of booths, number of booths with a result, sum of the shares)
    let mut groups: BTreeMap<String, (usize, usize, Vec<f64>)> = BTreeMap::new();
    for s in stations.iter() {
        let entry = groups
            .entry(s.locality.clone())
            .or_insert_with(|| (0, 0, vec![0.0; parties.len()]));
        entry.0 += 1;
        if s.result(year).is_some() {
            entry.1 += 1;
            for (idx, p) in parties.iter().enumerate() {
                entry.2[idx] += s.share(p, year);
            }
        }
    }

    let mut res: Vec<LocalitySummary> = groups
        .into_iter()
        .map(|(locality, (count, with_result, sums))| LocalitySummary {
            locality,
            stations: count,
            average_shares: parties
                .iter()
                .zip(sums.iter())
                .map(|(p, sum)| {
                    let avg = if with_result > 0 {
                        round_to(sum / with_result as f64 * 100.0, 2)
                    } else {
                        0.0
                    };
                    (p.clone(), avg)
                })
                .collect(),
        })
        .collect();
    res.sort_by(|a, b| b.stations.cmp(&a.stations));
    res
}
