// Integration Test Utilities
//
// Helpers for writing harness-shaped datasets, environment directories and
// configuration files into a temporary directory.
#![allow(dead_code)] // not every test binary uses every helper

use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Two iterations of one test per mutant family.
///
/// Best rates: CoRR Mutations 3.0 (iteration 1), MP Coherency 0.25
/// (iteration 1), MP Barrier Variant 3.0 (iteration 0).
pub fn litmus_run() -> Value {
    json!({
        "randomSeed": "2718",
        "0": {
            "params": { "testingWorkgroups": 512, "memStressPct": 100 },
            "CoRR Mutations Default": { "weak": 10, "durationSeconds": 4.0 },
            "MP Coherency": { "weak": 0, "durationSeconds": 2.0 },
            "MP Barrier Variant": { "weak": 3, "durationSeconds": 1.0 }
        },
        "1": {
            "params": { "testingWorkgroups": 1024, "memStressPct": 0 },
            "CoRR Mutations Default": { "weak": 6, "durationSeconds": 2.0 },
            "MP Coherency": { "weak": 1, "durationSeconds": 4.0 },
            "MP Barrier Variant": { "weak": 1, "durationSeconds": 1.0 }
        }
    })
}

/// A dataset where every record lasts one second, so rate == weak count.
/// `iterations` is `[(iteration id, [(test, weak)])]`.
pub fn unit_duration_run(iterations: &[(&str, &[(&str, u64)])]) -> Value {
    let mut root = Map::new();
    root.insert("randomSeed".to_string(), json!("1"));
    for (id, tests) in iterations {
        let mut observed = Map::new();
        observed.insert("params".to_string(), json!({}));
        for (test, weak) in tests.iter() {
            observed.insert(
                test.to_string(),
                json!({ "weak": weak, "durationSeconds": 1.0 }),
            );
        }
        root.insert(id.to_string(), Value::Object(observed));
    }
    Value::Object(root)
}

/// Write `value` as `<dir>/<name>`
pub fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

/// Create `<root>/<environment>/<device>.json` for every device
pub fn write_environment(root: &Path, environment: &str, devices: &[(&str, Value)]) -> PathBuf {
    let dir = root.join(environment);
    fs::create_dir_all(&dir).unwrap();
    for (device, data) in devices {
        write_json(&dir, &format!("{}.json", device), data);
    }
    dir
}

/// Write a TOML configuration file
pub fn write_config(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("killscope.toml");
    fs::write(&path, body).unwrap();
    path
}
