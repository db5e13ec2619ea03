//! Package versions and version ranges.
//!
//! Ranges use interval notation: a bare version (`1.0`) means "at least 1.0",
//! `[1.0, 2.0)` is inclusive/exclusive, `[1.0]` is exact, and `*` or an empty
//! string allow anything. Only the minimum version takes part in package
//! identity; the rest is kept so ranges can be written back unchanged.

use std::fmt;
use std::str::FromStr;

use semver::{BuildMetadata, Prerelease, Version};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionRangeError {
    #[error("invalid version range `{0}`")]
    Invalid(String),

    #[error("invalid version `{version}` in range `{range}`")]
    InvalidVersion { range: String, version: String },

    #[error("minimum version is greater than maximum in range `{0}`")]
    Inverted(String),
}

/// Parse a version string, allowing for incomplete versions.
///
/// `1` and `1.2` are accepted as `1.0.0` and `1.2.0`. A fourth numeric
/// component is a revision, kept as numeric build metadata (`1.2.3.4` becomes
/// `1.2.3+4`); a zero revision is dropped, so `1.0.0.0` equals `1.0.0`.
pub fn parse_version_lenient(s: &str) -> Option<Version> {
    let s = s.trim();
    if let Ok(v) = s.parse() {
        return Some(v);
    }

    // Missing components may precede a pre-release tag: `1.2-beta`.
    let (core, pre) = match s.split_once('-') {
        Some((core, pre)) => (core, Some(pre)),
        None => (s, None),
    };
    let parts: Vec<&str> = core.split('.').collect();
    let padded = match parts.len() {
        1 => format!("{}.0.0", parts[0]),
        2 => format!("{}.{}.0", parts[0], parts[1]),
        4 => {
            let revision: u64 = parts[3].parse().ok()?;
            let mut version = parse_version_lenient(&format!("{}.{}.{}", parts[0], parts[1], parts[2]))?;
            if let Some(pre) = pre {
                version.pre = Prerelease::new(pre).ok()?;
            }
            if revision != 0 {
                version.build = BuildMetadata::new(&revision.to_string()).ok()?;
            }
            return Some(version);
        }
        _ => return None,
    };
    let full = match pre {
        Some(pre) => format!("{}-{}", padded, pre),
        None => padded,
    };
    full.parse().ok()
}

/// Display a version the way it was written, with a revision as the fourth
/// component.
pub fn display_version(version: &Version) -> DisplayVersion<'_> {
    DisplayVersion(version)
}

/// Serialize an optional version in its displayed form.
pub(crate) fn serialize_optional<S>(version: &Option<Version>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match version {
        Some(version) => serializer.collect_str(&display_version(version)),
        None => serializer.serialize_none(),
    }
}

/// See [`display_version`].
pub struct DisplayVersion<'a>(&'a Version);

impl fmt::Display for DisplayVersion<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        let build = v.build.as_str();
        if build.is_empty() || !build.bytes().all(|b| b.is_ascii_digit()) {
            return write!(f, "{}", v);
        }
        write!(f, "{}.{}.{}.{}", v.major, v.minor, v.patch, build)?;
        if !v.pre.is_empty() {
            write!(f, "-{}", v.pre)?;
        }
        Ok(())
    }
}

/// A range of acceptable versions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VersionRange {
    min: Option<Version>,
    min_inclusive: bool,
    max: Option<Version>,
    max_inclusive: bool,
}

impl VersionRange {
    /// A range that accepts every version.
    pub fn all() -> Self {
        VersionRange::default()
    }

    /// `>= version`
    pub fn at_least(version: Version) -> Self {
        VersionRange {
            min: Some(version),
            min_inclusive: true,
            max: None,
            max_inclusive: false,
        }
    }

    /// `[version]`
    pub fn exactly(version: Version) -> Self {
        VersionRange {
            min: Some(version.clone()),
            min_inclusive: true,
            max: Some(version),
            max_inclusive: true,
        }
    }

    /// The lower bound, if any.
    pub fn min_version(&self) -> Option<&Version> {
        self.min.as_ref()
    }

    pub fn max_version(&self) -> Option<&Version> {
        self.max.as_ref()
    }

    pub fn is_all(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Check whether a version falls inside the range.
    pub fn satisfies(&self, version: &Version) -> bool {
        let above_min = match &self.min {
            Some(min) if self.min_inclusive => version >= min,
            Some(min) => version > min,
            None => true,
        };
        let below_max = match &self.max {
            Some(max) if self.max_inclusive => version <= max,
            Some(max) => version < max,
            None => true,
        };
        above_min && below_max
    }

    fn parse_bound(range: &str, s: &str) -> Result<Option<Version>, VersionRangeError> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(None);
        }
        parse_version_lenient(s)
            .map(Some)
            .ok_or_else(|| VersionRangeError::InvalidVersion {
                range: range.to_string(),
                version: s.to_string(),
            })
    }

    fn parse_interval(s: &str) -> Result<Self, VersionRangeError> {
        let min_inclusive = s.starts_with('[');
        let max_inclusive = match s.chars().last() {
            Some(']') => true,
            Some(')') => false,
            _ => return Err(VersionRangeError::Invalid(s.to_string())),
        };
        let inner = &s[1..s.len() - 1];

        let range = match inner.split_once(',') {
            None => {
                // Only `[x]` is meaningful without a comma.
                if !(min_inclusive && max_inclusive) {
                    return Err(VersionRangeError::Invalid(s.to_string()));
                }
                let version = Self::parse_bound(s, inner)?
                    .ok_or_else(|| VersionRangeError::Invalid(s.to_string()))?;
                VersionRange::exactly(version)
            }
            Some((lower, upper)) => VersionRange {
                min: Self::parse_bound(s, lower)?,
                min_inclusive,
                max: Self::parse_bound(s, upper)?,
                max_inclusive,
            },
        };

        if let (Some(min), Some(max)) = (&range.min, &range.max) {
            let empty = min > max || (min == max && !(range.min_inclusive && range.max_inclusive));
            if empty {
                return Err(VersionRangeError::Inverted(s.to_string()));
            }
        }
        Ok(range)
    }
}

impl FromStr for VersionRange {
    type Err = VersionRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == "*" {
            return Ok(VersionRange::all());
        }
        if s.starts_with('[') || s.starts_with('(') {
            return VersionRange::parse_interval(s);
        }
        let version = Self::parse_bound(s, s)?.ok_or_else(|| VersionRangeError::Invalid(s.to_string()))?;
        Ok(VersionRange::at_least(version))
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.min, &self.max) {
            (None, None) => f.write_str("*"),
            (Some(min), None) if self.min_inclusive => write!(f, "{}", display_version(min)),
            (Some(min), Some(max)) if min == max => write!(f, "[{}]", display_version(min)),
            (min, max) => {
                f.write_str(if self.min_inclusive { "[" } else { "(" })?;
                if let Some(min) = min {
                    write!(f, "{}", display_version(min))?;
                }
                f.write_str(", ")?;
                if let Some(max) = max {
                    write!(f, "{}", display_version(max))?;
                }
                f.write_str(if self.max_inclusive { "]" } else { ")" })
            }
        }
    }
}

impl Serialize for VersionRange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VersionRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
