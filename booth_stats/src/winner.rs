use std::cmp::Ordering;

use log::debug;

use crate::*;

/// Finds the winner and the runner-up of one booth election.
///
/// The catch-all `OTHERS` bucket is not a candidate and cannot win or come second.
/// Never fails: a missing or empty result is `BoothWinner::NoData`.
pub fn derive_winner(result: Option<&ElectionResult>) -> BoothWinner {
    let result = match result {
        Some(r) => r,
        None => return BoothWinner::NoData,
    };
    let mut sorted: Vec<(PartyCode, f64)> = normalize_candidates(&result.candidates)
        .into_iter()
        .filter(|(party, _)| party != OTHERS)
        .collect();
    // Ranked on the stored values, whatever their scale.
    sorted.sort_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(Ordering::Equal));

    let mut iter = sorted.into_iter();
    match iter.next() {
        None => BoothWinner::NoData,
        Some((winner, winner_share)) => {
            let (runner_up, runner_share) = match iter.next() {
                Some((p, s)) => (Some(p), s),
                None => (None, 0.0),
            };
            let winner_pct = to_percent_scale(winner_share);
            let runner_up_pct = to_percent_scale(runner_share);
            BoothWinner::Decided {
                winner,
                winner_pct,
                runner_up,
                runner_up_pct,
                margin_pct: round_to(winner_pct - runner_up_pct, 1),
            }
        }
    }
}

/// The winners of every booth for every year, ordered by station number.
pub fn booth_winners(stations: &[PollingStation], years: &[u32]) -> Vec<BoothWinners> {
    let mut sorted: Vec<&PollingStation> = stations.iter().collect();
    sorted.sort_by(|a, b| compare_station_numbers(&a.station_number, &b.station_number));
    sorted
        .into_iter()
        .map(|s| {
            let by_year: Vec<(u32, BoothWinner)> = years
                .iter()
                .map(|y| (*y, derive_winner(s.result(*y))))
                .collect();
            debug!("booth_winners: {}: {:?}", s.id, by_year);
            BoothWinners {
                station_number: s.station_number.clone(),
                locality: s.locality.clone(),
                station_name: s.station_name.clone(),
                by_year,
            }
        })
        .collect()
}

// Numeric station numbers first, in numeric order, then the others by name.
fn compare_station_numbers(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<u64>(), b.trim().parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use crate::test_util::*;
    use crate::*;
    use std::collections::BTreeMap;

    fn result(shares: &[(&str, f64)]) -> ElectionResult {
        ElectionResult {
            year: 2021,
            total_votes: 1000,
            candidates: shares
                .iter()
                .map(|(p, s)| (p.to_string(), RawShare::Number(*s)))
                .collect(),
        }
    }

    #[test]
    fn winner_and_runner_up() {
        init();
        let r = result(&[("BJP", 0.45), ("DMK", 0.30), ("OTHERS", 0.25)]);
        let w = derive_winner(Some(&r));
        assert_eq!(w.winner(), Some("BJP"));
        assert_eq!(w.runner_up(), Some("DMK"));
        assert_eq!(w.margin_pct(), Some(15.0));
    }

    #[test]
    fn others_cannot_place() {
        let r = result(&[("BJP", 0.40), ("OTHERS", 0.35), ("DMK", 0.25)]);
        let w = derive_winner(Some(&r));
        assert_eq!(w.winner(), Some("BJP"));
        assert_eq!(w.runner_up(), Some("DMK"));
        assert_eq!(w.margin_pct(), Some(15.0));
    }

    #[test]
    fn pseudo_keys_are_ignored() {
        let r = result(&[("POLLED", 950.0), ("NOTA", 0.6), ("INC", 0.3)]);
        let w = derive_winner(Some(&r));
        assert_eq!(w.winner(), Some("INC"));
        assert_eq!(w.runner_up(), None);
        assert_eq!(w.margin_pct(), Some(30.0));
    }

    #[test]
    fn percentage_scaled_records() {
        let r = result(&[("AINRC", 43.20), ("INC", 31.46), ("OTHERS", 4.37)]);
        let w = derive_winner(Some(&r));
        assert_eq!(w.winner(), Some("AINRC"));
        assert_eq!(w.margin_pct(), Some(11.7));
    }

    #[test]
    fn no_data() {
        assert_eq!(derive_winner(None), BoothWinner::NoData);
        let empty = ElectionResult {
            year: 2021,
            total_votes: 0,
            candidates: BTreeMap::new(),
        };
        assert_eq!(derive_winner(Some(&empty)), BoothWinner::NoData);
        let only_others = result(&[("OTHERS", 0.9), ("NOTA", 0.1)]);
        assert_eq!(derive_winner(Some(&only_others)), BoothWinner::NoData);
        assert_eq!(BoothWinner::NoData.margin_pct(), None);
    }

    #[test]
    fn ordered_by_station_number() {
        let stations = vec![
            station("10", "A", &[(2021, 100, &[("BJP", 0.6), ("DMK", 0.4)])]),
            station("9", "B", &[(2021, 100, &[("DMK", 0.7), ("BJP", 0.3)])]),
            station("2A", "C", &[]),
        ];
        let table = booth_winners(&stations, &[2021, 2016]);
        let nums: Vec<&str> = table.iter().map(|b| b.station_number.as_str()).collect();
        assert_eq!(nums, vec!["9", "10", "2A"]);
        assert_eq!(table[0].by_year[0].1.winner(), Some("DMK"));
        assert_eq!(table[0].by_year[1].1, BoothWinner::NoData);
        assert_eq!(table[2].by_year[0].1, BoothWinner::NoData);
    }
}
