//! Property tests for deps.json parsing.

use std::path::Path;

use proptest::prelude::*;
use serde_json::json;

use depsprobe::{AssetKind, DepsJsonReader};

fn library_name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Z][a-zA-Z]{0,8}(\\.[A-Z][a-zA-Z]{0,6}){0,2}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: malformed input is an error, never a panic.
    #[test]
    fn property_parse_never_panics(content in "\\PC{0,64}") {
        let reader = DepsJsonReader::new().with_rid("linux-x64");
        let _ = reader.parse(Path::new("fuzz.deps.json"), &content);
    }

    /// PROPERTY: every listed asset becomes exactly one entry, in file order.
    #[test]
    fn property_assets_map_one_to_one(
        names in proptest::collection::btree_set(library_name(), 1..6),
        with_rid in any::<bool>(),
    ) {
        let target = if with_rid {
            ".NETCoreApp,Version=v1.0/linux-x64"
        } else {
            ".NETCoreApp,Version=v1.0"
        };
        let mut libraries = serde_json::Map::new();
        let mut assets = serde_json::Map::new();
        for name in &names {
            let key = format!("{}/1.0.0", name);
            assets.insert(
                key.clone(),
                json!({ "runtime": { format!("lib/netstandard1.0/{}.dll", name): {} } }),
            );
            libraries.insert(key, json!({ "type": "package", "serviceable": false, "sha512": "" }));
        }
        let mut targets = serde_json::Map::new();
        targets.insert(target.to_string(), serde_json::Value::Object(assets));
        let doc = json!({
            "runtimeTarget": { "name": target },
            "targets": targets,
            "libraries": libraries,
        });

        let manifest = DepsJsonReader::new()
            .with_rid("linux-x64")
            .parse(Path::new("app.deps.json"), &doc.to_string())
            .unwrap();

        prop_assert_eq!(manifest.is_portable(), !with_rid);
        let parsed: Vec<&str> = manifest
            .entries(AssetKind::Runtime)
            .iter()
            .map(|e| e.library_name())
            .collect();
        let expected: Vec<&str> = names.iter().map(String::as_str).collect();
        prop_assert_eq!(parsed, expected);
        prop_assert!(manifest.entries(AssetKind::Native).is_empty());
    }
}
