use std::collections::BTreeMap;
use std::hash::Hasher;

use serde_json::{Map, Value};
use trek_game::{PacingConfig, TravelPace};
use twox_hash::XxHash64;

const SNAPSHOT_HASH: u64 = 0x9788_7258_d6f6_540f;

#[test]
fn pace_table_snapshot_stable() {
    let table = PacingConfig::shared();
    let mut snapshot = BTreeMap::new();
    for pace in TravelPace::ALL {
        let value = canonicalize_value(serde_json::to_value(table.profile(pace)).unwrap());
        snapshot.insert(pace.as_str().to_string(), value);
    }
    let canonical = serde_json::to_string_pretty(&snapshot).unwrap();
    let digest = snapshot_hash(canonical.as_bytes());
    assert_eq!(digest, SNAPSHOT_HASH, "pace table snapshot changed\n{canonical}");
}

#[test]
fn profiles_are_ordered_fast_to_slow() {
    let speeds: Vec<f64> = PacingConfig::shared()
        .profiles()
        .iter()
        .map(|p| p.speed_mph)
        .collect();
    assert_eq!(speeds, vec![4.0, 3.0, 2.0]);
}

fn canonicalize_value(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize_value).collect()),
        Value::Object(map) => {
            let mut result = Map::with_capacity(map.len());
            let mut entries: Vec<_> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            for (key, value) in entries {
                result.insert(key, canonicalize_value(value));
            }
            Value::Object(result)
        }
        other => other,
    }
}

fn snapshot_hash(bytes: &[u8]) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(bytes);
    hasher.finish()
}
