//! Property tests for trusted platform assembly resolution.

use std::collections::BTreeSet;

use proptest::prelude::*;
use tempfile::TempDir;

use depsprobe::domain::value_objects::PATH_LIST_SEPARATOR;
use depsprobe::{
    AssetKind, DependencyEntry, DependencyManifest, DepsResolver, LocalFs, ResolverOptions,
};

const NAMES: [&str; 5] = ["Alpha", "Beta", "Gamma", "Delta", "Epsilon"];
const EXTENSIONS: [&str; 4] = [".ni.dll", ".dll", ".ni.exe", ".exe"];

fn simple_name(file_name: &str) -> &str {
    EXTENSIONS
        .iter()
        .find_map(|ext| {
            let cut = file_name.len().checked_sub(ext.len())?;
            file_name
                .get(cut..)
                .filter(|tail| tail.eq_ignore_ascii_case(ext))
                .map(|_| &file_name[..cut])
        })
        .unwrap_or(file_name)
}

fn files() -> impl Strategy<Value = Vec<(usize, usize)>> {
    proptest::collection::vec((0..NAMES.len(), 0..EXTENSIONS.len()), 0..8)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: the TPA holds one existing file per assembly name, and
    /// covers every managed file in the app directory.
    #[test]
    fn property_tpa_is_unique_and_complete(
        app_files in files(),
        probe_files in proptest::collection::vec(0..NAMES.len(), 0..5),
        listed in proptest::collection::vec(0..NAMES.len(), 0..5),
    ) {
        let root = TempDir::new().unwrap();
        let app_dir = root.path().join("app");
        let probe_dir = root.path().join("probe");
        std::fs::create_dir_all(&app_dir).unwrap();

        for (name, ext) in &app_files {
            std::fs::write(app_dir.join(format!("{}{}", NAMES[*name], EXTENSIONS[*ext])), "").unwrap();
        }
        for name in &probe_files {
            let dir = probe_dir.join(NAMES[*name]).join("1.0.0/lib");
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(dir.join(format!("{}.dll", NAMES[*name])), "").unwrap();
        }

        let mut manifest = DependencyManifest::new(false);
        for name in &listed {
            manifest.push_entry(DependencyEntry::new(
                AssetKind::Runtime,
                NAMES[*name],
                "1.0.0",
                format!("lib/{}.dll", NAMES[*name]),
            ));
        }

        let options = ResolverOptions::new(&app_dir).with_additional_probes(vec![probe_dir]);
        let resolver = DepsResolver::new(options, &manifest, None, LocalFs::new());
        let tpa = resolver.resolve_tpa_list();

        let mut seen = BTreeSet::new();
        for path in tpa.iter() {
            prop_assert!(path.is_file(), "{} does not exist", path.display());
            let file_name = path.file_name().unwrap().to_string_lossy().to_string();
            prop_assert!(seen.insert(simple_name(&file_name).to_string()), "duplicate {}", file_name);
        }

        for (name, _) in &app_files {
            prop_assert!(seen.contains(NAMES[*name]));
        }

        let joined = tpa.join();
        prop_assert_eq!(joined.is_empty(), tpa.is_empty());
        prop_assert!(tpa.is_empty() || joined.ends_with(PATH_LIST_SEPARATOR));
    }
}
