use log::{debug, info};

use crate::*;

/// The booths where a party scored the lowest in a given year, weakest first.
///
/// Booths where the party has no share at all are left out: the records cannot tell
/// apart "no support" from "no data".
pub fn weak_booths(
    stations: &[PollingStation],
    party: &str,
    year: u32,
    rules: &StatsRules,
) -> Vec<WeakBooth> {
    let mut res: Vec<WeakBooth> = stations
        .iter()
        .map(|s| WeakBooth {
            station_number: s.station_number.clone(),
            locality: s.locality.clone(),
            score: s.share(party, year) * 100.0,
        })
        .filter(|wb| wb.score > 0.0)
        .collect();
    res.sort_by(|a, b| a.score.total_cmp(&b.score));
    res.truncate(rules.weak_booth_limit);
    debug!("weak_booths: {} {}: {:?}", party, year, res);
    res
}

/// Weak booths for each of the given parties, in the order of the parties.
pub fn weak_booths_by_party(
    stations: &[PollingStation],
    parties: &[PartyCode],
    year: u32,
    rules: &StatsRules,
) -> Vec<(PartyCode, Vec<WeakBooth>)> {
    info!(
        "weak_booths_by_party: {} booths, year {}, parties {:?}",
        stations.len(),
        year,
        parties
    );
    parties
        .iter()
        .map(|p| (p.clone(), weak_booths(stations, p, year, rules)))
        .collect()
}

/// The booths where the independent candidate did best in the given year.
///
/// Only booths above `rules.hotspot_threshold` are kept. Each hotspot also carries the
/// independent share for all the `years`, side by side.
pub fn independent_hotspots(
    stations: &[PollingStation],
    year: u32,
    years: &[u32],
    rules: &StatsRules,
) -> Vec<Hotspot> {
    info!(
        "independent_hotspots: {} booths, year {}, threshold {}",
        stations.len(),
        year,
        rules.hotspot_threshold
    );
    let mut res: Vec<Hotspot> = stations
        .iter()
        .filter(|s| s.share(INDEPENDENT, year) > rules.hotspot_threshold)
        .map(|s| Hotspot {
            station_number: s.station_number.clone(),
            locality: s.locality.clone(),
            station_name: s.station_name.clone(),
            best_year: year,
            best_performance: s.share(INDEPENDENT, year),
            performance_by_year: years
                .iter()
                .map(|y| (*y, s.share(INDEPENDENT, *y)))
                .collect(),
        })
        .collect();
    res.sort_by(|a, b| b.best_performance.total_cmp(&a.best_performance));
    res.truncate(rules.hotspot_limit);
    res
}

#[cfg(test)]
mod tests {
    use crate::test_util::*;
    use crate::*;

    fn sample() -> Vec<PollingStation> {
        (1..=8)
            .map(|i| {
                let share = i as f64 / 100.0;
                station(
                    &i.to_string(),
                    &format!("LOC{}", i),
                    &[
                        (2021, 500, &[("BJP", share), ("IND", share)]),
                        (2016, 500, &[("BJP", 0.2), ("IND", 0.5 - share)]),
                    ],
                )
            })
            .collect()
    }

    #[test]
    fn weakest_first() {
        init();
        let mut stations = sample();
        // No BJP data at this booth: not a weak booth.
        stations.push(station("9", "LOC9", &[(2021, 500, &[("DMK", 0.5)])]));
        let weak = weak_booths(&stations, "BJP", 2021, &StatsRules::DEFAULT_RULES);
        let locs: Vec<&str> = weak.iter().map(|w| w.locality.as_str()).collect();
        assert_eq!(locs, vec!["LOC1", "LOC2", "LOC3", "LOC4", "LOC5"]);
        assert!(weak.iter().all(|w| w.score > 0.0));
        for w in weak.windows(2) {
            assert!(w[0].score <= w[1].score);
        }
        assert_eq!(weak[0].score, 1.0);
    }

    #[test]
    fn weak_booths_per_party() {
        let stations = sample();
        let res = weak_booths_by_party(
            &stations,
            &parties(&["BJP", "AIADMK"]),
            2021,
            &StatsRules::DEFAULT_RULES,
        );
        assert_eq!(res.len(), 2);
        assert_eq!(res[0].1.len(), 5);
        assert!(res[1].1.is_empty());
    }

    #[test]
    fn hotspots_above_threshold() {
        init();
        let stations = sample();
        let hs = independent_hotspots(&stations, 2021, &[2021, 2016, 2011], &StatsRules::DEFAULT_RULES);
        // Only 6, 7 and 8 are above 5%.
        let nums: Vec<&str> = hs.iter().map(|h| h.station_number.as_str()).collect();
        assert_eq!(nums, vec!["8", "7", "6"]);
        assert_eq!(hs[0].best_year, 2021);
        assert_eq!(hs[0].best_performance, 0.08);
        assert_eq!(hs[0].performance_by_year, vec![(2021, 0.08), (2016, 0.5 - 0.08), (2011, 0.0)]);
    }

    #[test]
    fn hotspots_are_bounded() {
        let stations = sample();
        let hs = independent_hotspots(&stations, 2016, &[2021, 2016], &StatsRules::DEFAULT_RULES);
        assert_eq!(hs.len(), 6);
        assert_eq!(hs[0].station_number, "1");
        for w in hs.windows(2) {
            assert!(w[0].best_performance >= w[1].best_performance);
        }
    }
}
