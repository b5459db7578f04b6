use log::{debug, info};

use crate::*;

/// Computes the vote shares of a fixed party roster across several elections, and the
/// swings between consecutive elections.
///
/// The roster is fixed so that the charts keep the same parties from one year to the
/// next, even when a party did not run. Years are processed in increasing order.
pub fn electoral_trends(
    stations: &[PollingStation],
    years: &[u32],
    roster: &[PartyCode],
    rules: &StatsRules,
) -> TrendReport {
    let mut sorted_years: Vec<u32> = years.to_vec();
    sorted_years.sort_unstable();
    sorted_years.dedup();
    info!(
        "electoral_trends: {} booths, years {:?}, roster {:?}",
        stations.len(),
        sorted_years,
        roster
    );

    let year_trends: Vec<YearTrend> = sorted_years
        .iter()
        .map(|year| year_trend(stations, *year, roster))
        .collect();

    let swings: Vec<YearSwing> = year_trends
        .windows(2)
        .map(|w| swing_between(&w[0], &w[1], roster, rules))
        .collect();

    TrendReport {
        years: year_trends,
        swings,
    }
}

/// The shares of the roster parties for one year.
pub fn year_trend(stations: &[PollingStation], year: u32, roster: &[PartyCode]) -> YearTrend {
    let total_polled = total_polled(stations, year);
    let tally = accumulate_party_votes(stations, year, PartyFilter::Roster(roster));
    let shares: Vec<TrendShare> = roster
        .iter()
        .map(|party| {
            let votes = tally.get(party).copied().unwrap_or(PartyVotes::EMPTY);
            let share_pct = if total_polled > 0 {
                round_to(votes.0 / total_polled as f64 * 100.0, 2)
            } else {
                0.0
            };
            let avg_votes_per_booth = if stations.is_empty() {
                0
            } else {
                (votes.0 / stations.len() as f64).round() as u64
            };
            TrendShare {
                party: party.clone(),
                share_pct,
                avg_votes_per_booth,
            }
        })
        .collect();
    debug!("year_trend: {}: {:?}", year, shares);
    YearTrend {
        year,
        total_polled,
        booth_count: stations.len(),
        shares,
    }
}

/// The swing of the first `rules.swing_parties` parties of the roster between two years.
///
/// Swings that round to 0.00 are not worth charting and are left out.
pub fn swing_between(
    from: &YearTrend,
    to: &YearTrend,
    roster: &[PartyCode],
    rules: &StatsRules,
) -> YearSwing {
    let entries: Vec<SwingEntry> = roster
        .iter()
        .take(rules.swing_parties)
        .map(|party| SwingEntry {
            party: party.clone(),
            delta_pct: round_to(to.share_of(party) - from.share_of(party), 2),
        })
        .filter(|e| e.delta_pct != 0.0)
        .collect();
    YearSwing {
        from_year: from.year,
        to_year: to.year,
        entries,
    }
}
