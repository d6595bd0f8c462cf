//! Custom assertion macros for scenario and CLI tests.
//!
//! These macros provide descriptive failure messages to aid debugging.

/// Assert that a run's stdout or stderr contains a string.
///
/// # Example
/// ```ignore
/// assert_output_contains!(result, "Trusted platform assemblies (2):");
/// ```
#[macro_export]
macro_rules! assert_output_contains {
    ($result:expr, $needle:expr) => {
        let output = $result.combined_output();
        assert!(
            output.contains($needle),
            "Expected output to contain '{}'.\nOutput:\n{}",
            $needle,
            output
        );
    };
}

/// Assert that `earlier` appears before `later` in a list of paths.
///
/// # Example
/// ```ignore
/// assert_listed_before!(native, app_dir, fx_dir);
/// ```
#[macro_export]
macro_rules! assert_listed_before {
    ($list:expr, $earlier:expr, $later:expr) => {
        let list: &[String] = &$list;
        let earlier = list.iter().position(|p| *p == $earlier);
        let later = list.iter().position(|p| *p == $later);
        assert!(
            matches!((earlier, later), (Some(a), Some(b)) if a < b),
            "Expected '{}' before '{}' in:\n  {}",
            $earlier,
            $later,
            list.join("\n  ")
        );
    };
}

/// String entries of a JSON array field
pub fn json_strings(value: &serde_json::Value, field: &str) -> Vec<String> {
    value[field]
        .as_array()
        .unwrap_or_else(|| panic!("'{}' is not an array in {}", field, value))
        .iter()
        .map(|v| v.as_str().expect("string entry").to_string())
        .collect()
}
