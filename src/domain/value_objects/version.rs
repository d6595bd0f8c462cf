//! Framework/Package Version Value Object
//!
//! A semantic version as found in package-cache and servicing directory
//! names: `major.minor.patch[-prerelease][+build]`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Error when a version string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid version '{input}': {reason}")]
pub struct VersionParseError {
    pub input: String,
    pub reason: &'static str,
}

/// Parsed semantic version
///
/// Numeric components have no leading zeros, so `to_string()` reproduces
/// the directory name a version was parsed from.
///
/// Ordering: numeric triple first; at the same triple a release is greater
/// than any prerelease; prerelease labels compare lexicographically; build
/// metadata breaks remaining ties.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FxVersion {
    major: u64,
    minor: u64,
    patch: u64,
    pre: String,
    build: String,
}

impl FxVersion {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            pre: String::new(),
            build: String::new(),
        }
    }

    /// Attach a prerelease label (without the leading `-`)
    pub fn with_pre(mut self, pre: impl Into<String>) -> Self {
        self.pre = pre.into();
        self
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }

    /// Prerelease label without the leading `-`, empty for releases
    pub fn pre(&self) -> &str {
        &self.pre
    }

    pub fn is_prerelease(&self) -> bool {
        !self.pre.is_empty()
    }

    /// Directory glob matching every patch of this `major.minor`
    pub fn patch_glob(&self) -> String {
        format!("{}.{}.*", self.major, self.minor)
    }

    /// Directory glob matching every prerelease of this exact triple
    pub fn prerelease_glob(&self) -> String {
        format!("{}.{}.{}-*", self.major, self.minor, self.patch)
    }

    /// Parse a version, returning `None` instead of an error
    pub fn parse(input: &str) -> Option<Self> {
        input.parse().ok()
    }
}

fn parse_component(input: &str, part: &str) -> Result<u64, VersionParseError> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VersionParseError {
            input: input.to_string(),
            reason: "numeric component expected",
        });
    }
    if part.len() > 1 && part.starts_with('0') {
        return Err(VersionParseError {
            input: input.to_string(),
            reason: "leading zero in numeric component",
        });
    }
    part.parse().map_err(|_| VersionParseError {
        input: input.to_string(),
        reason: "numeric component out of range",
    })
}

impl FromStr for FxVersion {
    type Err = VersionParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (rest, build) = match input.split_once('+') {
            Some((rest, build)) => (rest, build),
            None => (input, ""),
        };
        let (triple, pre) = match rest.split_once('-') {
            Some((triple, pre)) => (triple, pre),
            None => (rest, ""),
        };

        if rest.ends_with('-') || (input.contains('+') && build.is_empty()) {
            return Err(VersionParseError {
                input: input.to_string(),
                reason: "empty label",
            });
        }

        let mut parts = triple.split('.');
        let (Some(major), Some(minor), Some(patch), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(VersionParseError {
                input: input.to_string(),
                reason: "expected major.minor.patch",
            });
        };

        Ok(Self {
            major: parse_component(input, major)?,
            minor: parse_component(input, minor)?,
            patch: parse_component(input, patch)?,
            pre: pre.to_string(),
            build: build.to_string(),
        })
    }
}

impl Ord for FxVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (self.pre.is_empty(), other.pre.is_empty()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => self.pre.cmp(&other.pre),
            })
            .then_with(|| self.build.cmp(&other.build))
    }
}

impl PartialOrd for FxVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for FxVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.pre.is_empty() {
            write!(f, "-{}", self.pre)?;
        }
        if !self.build.is_empty() {
            write!(f, "+{}", self.build)?;
        }
        Ok(())
    }
}
