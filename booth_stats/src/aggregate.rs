use log::{debug, info};

use crate::*;

/// Estimates the electorate from the votes polled.
pub fn estimate_electorate(total_polled: u64, turnout_factor: f64) -> u64 {
    (total_polled as f64 * turnout_factor).round() as u64
}

/// Computes the assembly-wide statistics for one election year.
///
/// Arguments:
/// * `stations` the booths of one assembly
/// * `year` the election year
/// * `selected_parties` if not empty, only these parties are returned (in share order).
///   Otherwise the first `rules.top_parties` parties are returned.
///
/// An empty list of booths gives an all-zero result.
pub fn assembly_overview(
    stations: &[PollingStation],
    year: u32,
    selected_parties: &[PartyCode],
    rules: &StatsRules,
) -> AggregateStat {
    info!(
        "assembly_overview: {} booths for year {}, selected parties: {:?}",
        stations.len(),
        year,
        selected_parties
    );
    let total_polled = total_polled(stations, year);
    let total_voters = estimate_electorate(total_polled, rules.turnout_factor);
    let turnout_pct = if total_voters > 0 {
        total_polled as f64 * 100.0 / total_voters as f64
    } else {
        0.0
    };

    let tally = accumulate_party_votes(stations, year, PartyFilter::Candidates);
    debug!("assembly_overview: tally: {:?}", tally);

    // Only booths with votes are counted, so the tally is empty whenever total_polled is 0.
    let mut party_shares: Vec<PartyShare> = tally
        .into_iter()
        .map(|(party, votes)| PartyShare {
            party,
            raw_votes: votes.0.round() as u64,
            share_pct: round_to(votes.0 / total_polled as f64 * 100.0, 1),
        })
        .collect();
    party_shares.sort_by(|a, b| b.share_pct.total_cmp(&a.share_pct));

    if selected_parties.is_empty() {
        party_shares.truncate(rules.top_parties);
    } else {
        party_shares.retain(|ps| selected_parties.contains(&ps.party));
    }

    AggregateStat {
        year,
        total_booths: stations.len(),
        total_voters,
        total_polled,
        turnout_pct,
        party_shares,
        categories: category_distribution(stations),
    }
}

/// Counts the booths per category. Booths without a category are counted as unknown, last.
pub fn category_distribution(stations: &[PollingStation]) -> Vec<CategoryCount> {
    let mut res: Vec<CategoryCount> = Vec::new();
    for cat in Category::ALL {
        let count = stations
            .iter()
            .filter(|s| s.category == Some(cat))
            .count();
        if count > 0 {
            res.push(CategoryCount {
                category: Some(cat),
                count,
            });
        }
    }
    let unknown = stations.iter().filter(|s| s.category.is_none()).count();
    if unknown > 0 {
        res.push(CategoryCount {
            category: None,
            count: unknown,
        });
    }
    res
}
