use std::path::{Path, PathBuf};

use booth_stats::{parse_share, RawShare};
use serde_json::Value as JSValue;

/// The path of a data file. Relative paths are taken from the directory of the configuration.
pub fn resolve_path(root: Option<&Path>, file_path: &str) -> String {
    match root {
        Some(r) if Path::new(file_path).is_relative() => {
            let p: PathBuf = [r, Path::new(file_path)].iter().collect();
            p.display().to_string()
        }
        _ => file_path.to_string(),
    }
}

/// A share as stored in JSON. Anything else than a number or a string is missing.
pub fn raw_share(v: &JSValue) -> RawShare {
    match v {
        JSValue::Number(n) => n.as_f64().map(RawShare::Number).unwrap_or(RawShare::Missing),
        JSValue::String(s) => RawShare::Text(s.clone()),
        _ => RawShare::Missing,
    }
}

/// A number stored as a number or a string. 0 when unreadable.
pub fn js_number(v: Option<&JSValue>) -> f64 {
    match v {
        Some(JSValue::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(JSValue::String(s)) => parse_share(s.as_str()),
        _ => 0.0,
    }
}

/// A vote count. Negative or unreadable counts are 0.
pub fn js_count(v: Option<&JSValue>) -> u64 {
    let x = js_number(v);
    if x > 0.0 {
        x.round() as u64
    } else {
        0
    }
}

/// A label stored as a string or a number. Empty strings and nulls are absent.
pub fn js_label(v: Option<&JSValue>) -> Option<String> {
    match v {
        Some(JSValue::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(JSValue::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers() {
        assert_eq!(js_number(Some(&json!(0.25))), 0.25);
        assert_eq!(js_number(Some(&json!("0.4"))), 0.4);
        assert_eq!(js_number(Some(&json!("NEW_BOOTH"))), 0.0);
        assert_eq!(js_number(Some(&json!(null))), 0.0);
        assert_eq!(js_number(None), 0.0);
        assert_eq!(js_count(Some(&json!(812.0))), 812);
        assert_eq!(js_count(Some(&json!(-3))), 0);
    }

    #[test]
    fn labels() {
        assert_eq!(js_label(Some(&json!(12))), Some("12".to_string()));
        assert_eq!(js_label(Some(&json!(" 12A "))), Some("12A".to_string()));
        assert_eq!(js_label(Some(&json!(""))), None);
        assert_eq!(js_label(None), None);
    }

    #[test]
    fn paths() {
        let root = Path::new("/data/reports");
        assert_eq!(resolve_path(Some(root), "booths.json"), "/data/reports/booths.json");
        assert_eq!(resolve_path(Some(root), "/tmp/booths.json"), "/tmp/booths.json");
        assert_eq!(resolve_path(None, "booths.json"), "booths.json");
    }
}
