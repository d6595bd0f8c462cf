//! Property tests for version roll-forward over a package directory.

use proptest::prelude::*;

use depsprobe::domain::services::RollForwardResolver;
use depsprobe::infrastructure::LocalFs;
use depsprobe::FxVersion;
use tempfile::TempDir;

fn dir_name() -> impl Strategy<Value = String> {
    prop_oneof![
        (1u64..3, 0u64..3, 0u64..12).prop_map(|(a, b, c)| format!("{}.{}.{}", a, b, c)),
        (1u64..3, 0u64..3, 0u64..12, 1u8..4)
            .prop_map(|(a, b, c, n)| format!("{}.{}.{}-rc{}", a, b, c, n)),
        Just("not-a-version".to_string()),
    ]
}

fn start_version() -> impl Strategy<Value = FxVersion> {
    (1u64..3, 0u64..3, 0u64..12, proptest::option::of(1u8..4)).prop_map(|(a, b, c, rc)| {
        let version = FxVersion::new(a, b, c);
        match rc {
            Some(n) => version.with_pre(format!("rc{}", n)),
            None => version,
        }
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: roll-forward never goes below the requested version, never
    /// leaves its family, and only lands on directories that exist.
    #[test]
    fn property_roll_forward_stays_in_family(
        names in proptest::collection::vec(dir_name(), 0..8),
        start in start_version(),
    ) {
        let root = TempDir::new().unwrap();
        for name in &names {
            std::fs::create_dir_all(root.path().join(name)).unwrap();
        }

        let resolver = RollForwardResolver::new();
        let rolled = resolver.roll_forward(root.path(), &start, &LocalFs::new());

        prop_assert!(rolled >= start);
        prop_assert_eq!((rolled.major(), rolled.minor()), (start.major(), start.minor()));
        prop_assert_eq!(rolled.is_prerelease(), start.is_prerelease());
        if start.is_prerelease() {
            prop_assert_eq!(rolled.patch(), start.patch());
        }
        if rolled != start {
            prop_assert!(root.path().join(rolled.to_string()).is_dir());
        }
    }

    /// PROPERTY: a cached answer matches a fresh lookup.
    #[test]
    fn property_cached_lookup_is_stable(
        names in proptest::collection::vec(dir_name(), 0..8),
        start in start_version(),
    ) {
        let root = TempDir::new().unwrap();
        for name in &names {
            std::fs::create_dir_all(root.path().join(name)).unwrap();
        }

        let resolver = RollForwardResolver::new();
        let first = resolver.roll_forward(root.path(), &start, &LocalFs::new());
        let second = resolver.roll_forward(root.path(), &start, &LocalFs::new());
        prop_assert_eq!(first, second);
        prop_assert_eq!(resolver.cached_lookups(), 1);
    }
}
