mod aggregate;
pub mod builder;
mod config;
mod heatmap;
pub mod manual;
mod normalize;
mod ranking;
mod store;
mod trend;
mod winner;

use log::debug;

use std::{
    collections::BTreeMap,
    ops::{Add, AddAssign},
};

pub use crate::aggregate::*;
pub use crate::config::*;
pub use crate::heatmap::*;
pub use crate::normalize::*;
pub use crate::ranking::*;
pub use crate::store::*;
pub use crate::trend::*;
pub use crate::winner::*;

// **** Private structures ****

/// Votes attributed to a party. They are estimated from shares and are therefore fractional.
#[derive(PartialEq, Debug, Clone, Copy, PartialOrd)]
struct PartyVotes(f64);

impl PartyVotes {
    const EMPTY: PartyVotes = PartyVotes(0.0);
}

impl std::iter::Sum for PartyVotes {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        PartyVotes(iter.map(|pv| pv.0).sum())
    }
}

impl AddAssign for PartyVotes {
    fn add_assign(&mut self, rhs: PartyVotes) {
        self.0 += rhs.0;
    }
}

impl Add for PartyVotes {
    type Output = PartyVotes;
    fn add(self: PartyVotes, rhs: PartyVotes) -> PartyVotes {
        PartyVotes(self.0 + rhs.0)
    }
}

/// Which parties get their votes counted.
#[derive(Debug, Clone, Copy)]
enum PartyFilter<'a> {
    /// Every candidate key found in the records.
    Candidates,
    /// A fixed roster. Parties of the roster absent from the records get 0 votes.
    Roster(&'a [PartyCode]),
}

/// Turns the shares of every booth into votes and adds them up per party.
///
/// A booth with no recorded turnout contributes nothing, even if it has shares.
fn accumulate_party_votes(
    stations: &[PollingStation],
    year: u32,
    filter: PartyFilter,
) -> BTreeMap<PartyCode, PartyVotes> {
    let mut tally: BTreeMap<PartyCode, PartyVotes> = BTreeMap::new();
    if let PartyFilter::Roster(roster) = filter {
        for party in roster.iter() {
            tally.insert(party.clone(), PartyVotes::EMPTY);
        }
    }
    for station in stations.iter() {
        let result = match station.result(year) {
            Some(r) if r.total_votes > 0 => r,
            _ => {
                debug!(
                    "accumulate_party_votes: booth {} has no votes for {}",
                    station.id, year
                );
                continue;
            }
        };
        let polled = result.total_votes as f64;
        match filter {
            PartyFilter::Candidates => {
                for (party, share) in normalize_candidates(&result.candidates) {
                    *tally.entry(party).or_insert(PartyVotes::EMPTY) += PartyVotes(polled * share);
                }
            }
            PartyFilter::Roster(roster) => {
                for party in roster.iter() {
                    let share = station.share(party, year);
                    if let Some(pv) = tally.get_mut(party) {
                        *pv += PartyVotes(polled * share);
                    }
                }
            }
        }
    }
    tally
}

fn total_polled(stations: &[PollingStation], year: u32) -> u64 {
    stations.iter().map(|s| s.total_votes(year)).sum()
}

/// Rounds half away from zero to the given number of decimals.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Moves a share to the percentage scale.
///
/// Values up to 1 are taken as fractions. Larger values are assumed to be percentages
/// already: some historical records were written that way.
// TODO: remove once all the stored records use fractions.
pub fn to_percent_scale(share: f64) -> f64 {
    if share <= 1.0 {
        share * 100.0
    } else {
        share
    }
}


#[cfg(test)]
mod tests {
    use super::test_util::*;
    use super::*;

    #[test]
    fn zero_turnout_booth_contributes_nothing() {
        init();
        let stations = vec![
            station("1", "POOVAM", &[(2021, 0, &[("BJP", 0.9), ("DMK", 0.1)])]),
            station("2", "POOVAM", &[(2021, 100, &[("BJP", 0.5), ("DMK", 0.5)])]),
        ];
        let tally = accumulate_party_votes(&stations, 2021, PartyFilter::Candidates);
        assert_eq!(tally["BJP"], PartyVotes(50.0));
        assert_eq!(tally["DMK"], PartyVotes(50.0));
    }

    #[test]
    fn roster_parties_are_always_present() {
        init();
        let stations = vec![station("1", "POOVAM", &[(2016, 200, &[("DMK", 0.25)])])];
        let roster = parties(&["BJP", "DMK"]);
        let tally = accumulate_party_votes(&stations, 2016, PartyFilter::Roster(&roster));
        assert_eq!(tally.len(), 2);
        assert_eq!(tally["BJP"], PartyVotes::EMPTY);
        assert_eq!(tally["DMK"], PartyVotes(50.0));
    }

    #[test]
    fn percent_scale() {
        assert_eq!(to_percent_scale(0.45), 45.0);
        assert_eq!(to_percent_scale(1.0), 100.0);
        assert_eq!(to_percent_scale(45.0), 45.0);
        assert_eq!(round_to(12.345, 1), 12.3);
        assert_eq!(round_to(0.125, 2), 0.13);
    }
}
