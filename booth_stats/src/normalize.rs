use std::collections::BTreeMap;

use log::debug;

use crate::config::*;

/// The cleaned-up mapping of a booth: candidate code -> fractional share.
pub type CandidateShares = BTreeMap<PartyCode, f64>;

/// Anything that can be read as a vote share.
///
/// Reading a share never fails: values that cannot be understood count as 0.
pub trait ShareValue {
    fn parse_share(&self) -> f64;
}

impl ShareValue for f64 {
    fn parse_share(&self) -> f64 {
        if self.is_nan() {
            0.0
        } else {
            *self
        }
    }
}

impl ShareValue for str {
    fn parse_share(&self) -> f64 {
        leading_decimal(self).unwrap_or(0.0)
    }
}

impl ShareValue for String {
    fn parse_share(&self) -> f64 {
        self.as_str().parse_share()
    }
}

impl ShareValue for RawShare {
    fn parse_share(&self) -> f64 {
        match self {
            RawShare::Number(x) => x.parse_share(),
            RawShare::Text(s) => s.parse_share(),
            RawShare::Missing => 0.0,
        }
    }
}

impl<T: ShareValue + ?Sized> ShareValue for &T {
    fn parse_share(&self) -> f64 {
        (**self).parse_share()
    }
}

/// Returns false for the pseudo-keys (voters, NOTA, station number, polled count), true otherwise.
///
/// This is a prefix test: `VOTERS_2021` and `POLLEDX` are both rejected.
pub fn is_candidate_key(key: &str) -> bool {
    !NON_CANDIDATE_PREFIXES
        .iter()
        .any(|prefix| key.starts_with(prefix))
}

pub fn parse_share<V: ShareValue + ?Sized>(value: &V) -> f64 {
    value.parse_share()
}

/// Keeps the candidate keys of a raw mapping and reads all their values as numbers.
pub fn normalize_candidates<V: ShareValue>(raw: &BTreeMap<PartyCode, V>) -> CandidateShares {
    let mut res = CandidateShares::new();
    for (key, value) in raw.iter() {
        if is_candidate_key(key) {
            res.insert(key.clone(), value.parse_share());
        } else {
            debug!("normalize_candidates: dropping pseudo-key {:?}", key);
        }
    }
    res
}

// Reads the longest decimal prefix of the string, the way spreadsheet
// exports are usually read ("12.5%" is 12.5).
fn leading_decimal(s: &str) -> Option<f64> {
    let t = s.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut seen_exp = false;
    let bytes = t.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        match c {
            b'+' | b'-' if i == 0 => {}
            b'0'..=b'9' => {
                seen_digit = true;
                end = i + 1;
            }
            b'.' if !seen_dot && !seen_exp => {
                seen_dot = true;
                if seen_digit {
                    end = i + 1;
                }
            }
            b'e' | b'E' if seen_digit && !seen_exp => {
                // Only accepted when followed by digits.
                let mut j = i + 1;
                if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
                    j += 1;
                }
                if j < bytes.len() && bytes[j].is_ascii_digit() {
                    seen_exp = true;
                    i = j;
                    continue;
                }
                break;
            }
            _ => break,
        }
        i += 1;
    }
    if !seen_digit {
        return None;
    }
    t[..end]
        .trim_end_matches('.')
        .parse::<f64>()
        .ok()
        .filter(|x| x.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(entries: &[(&str, RawShare)]) -> BTreeMap<PartyCode, RawShare> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn candidate_keys() {
        assert!(!is_candidate_key("POLLED_2021"));
        assert!(!is_candidate_key("POLLEDX"));
        assert!(!is_candidate_key("VOTERS"));
        assert!(!is_candidate_key("NOTA_2016"));
        assert!(!is_candidate_key("PS_NO_2011"));
        assert!(is_candidate_key("BJP_2021"));
        assert!(is_candidate_key("POLL"));
        assert!(is_candidate_key("PS"));
        assert!(is_candidate_key("IND"));
        assert!(is_candidate_key("OTHERS"));
        assert!(is_candidate_key(""));
    }

    #[test]
    fn shares_never_fail() {
        assert_eq!(parse_share(&0.42), 0.42);
        assert_eq!(parse_share(&f64::NAN), 0.0);
        assert_eq!(parse_share("0.3"), 0.3);
        assert_eq!(parse_share(" 12.5%"), 12.5);
        assert_eq!(parse_share("NEW_BOOTH"), 0.0);
        assert_eq!(parse_share(""), 0.0);
        assert_eq!(parse_share("-"), 0.0);
        assert_eq!(parse_share("1e-2"), 0.01);
        assert_eq!(parse_share("3e"), 3.0);
        assert_eq!(parse_share("7."), 7.0);
        assert_eq!(parse_share(&RawShare::Missing), 0.0);
        assert_eq!(parse_share(&RawShare::Text("0.25".to_string())), 0.25);
        assert_eq!(parse_share(&RawShare::Number(0.5)), 0.5);
    }

    #[test]
    fn normalize_drops_pseudo_keys() {
        let m = raw(&[
            ("BJP", RawShare::Number(0.4)),
            ("DMK", RawShare::Text("0.35".to_string())),
            ("NOTA", RawShare::Number(0.01)),
            ("VOTERS_2021", RawShare::Number(1200.0)),
            ("IND", RawShare::Text("NEW_BOOTH".to_string())),
            ("OTHERS", RawShare::Missing),
        ]);
        let n = normalize_candidates(&m);
        let keys: Vec<&str> = n.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["BJP", "DMK", "IND", "OTHERS"]);
        assert_eq!(n["DMK"], 0.35);
        assert_eq!(n["IND"], 0.0);
        assert_eq!(n["OTHERS"], 0.0);
    }

    #[test]
    fn normalize_is_idempotent() {
        let m = raw(&[
            ("AINRC", RawShare::Number(0.43)),
            ("POLLED", RawShare::Number(950.0)),
            ("INC", RawShare::Text("x".to_string())),
        ]);
        let once = normalize_candidates(&m);
        let twice = normalize_candidates(&once);
        assert_eq!(once, twice);
    }
}
