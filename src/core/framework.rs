//! Target frameworks and their precedence order.
//!
//! A target framework is the runtime/platform context dependencies are
//! declared under. Frameworks parse from short folder names (`net472`,
//! `netstandard2.0`, `net6.0-windows`) or the long form
//! (`.NETFramework,Version=v4.7.2`).
//!
//! The `Ord` impl is the precedence order used when one package is declared
//! under several frameworks: `any` first, then identifier, version, profile,
//! platform and platform version. It is a total order, so the pick never
//! depends on declaration order.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::util::name::{cmp_ignore_case, eq_ignore_case};

pub const ANY: &str = "Any";
pub const NET_FRAMEWORK: &str = ".NETFramework";
pub const NET_STANDARD: &str = ".NETStandard";
pub const NET_CORE_APP: &str = ".NETCoreApp";

/// Short identifiers that map onto well-known long identifiers.
const KNOWN_IDENTIFIERS: &[(&str, &str)] = &[
    ("netstandard", NET_STANDARD),
    ("netcoreapp", NET_CORE_APP),
    ("netcore", ".NETCore"),
    ("net", NET_FRAMEWORK),
    ("uap", "UAP"),
    ("monoandroid", "MonoAndroid"),
    ("xamarinios", "Xamarin.iOS"),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameworkParseError {
    #[error("invalid target framework `{0}`")]
    Invalid(String),

    #[error("invalid version `{version}` in target framework `{framework}`")]
    InvalidVersion { framework: String, version: String },
}

/// A framework version with up to four numeric components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameworkVersion([u32; 4]);

impl FrameworkVersion {
    pub fn new(major: u32, minor: u32, build: u32, revision: u32) -> Self {
        FrameworkVersion([major, minor, build, revision])
    }

    pub fn major(&self) -> u32 {
        self.0[0]
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0; 4]
    }

    /// Parse the version part of a framework name.
    ///
    /// Dotted forms are read component by component (`2.0`, `10.0.19041`).
    /// Undotted forms use one digit per component (`472` is 4.7.2), which is
    /// how .NET Framework folder names are written.
    fn parse(s: &str) -> Option<Self> {
        let s = s.strip_prefix(['v', 'V']).unwrap_or(s);
        if s.is_empty() {
            return Some(FrameworkVersion::default());
        }

        let mut parts = [0u32; 4];
        if s.contains('.') {
            let pieces: Vec<&str> = s.split('.').collect();
            if pieces.len() > 4 {
                return None;
            }
            for (slot, piece) in parts.iter_mut().zip(pieces) {
                *slot = piece.parse().ok()?;
            }
        } else {
            if s.len() > 4 || !s.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            for (slot, digit) in parts.iter_mut().zip(s.chars()) {
                *slot = digit.to_digit(10)?;
            }
        }
        Some(FrameworkVersion(parts))
    }

    /// Number of components worth printing, never fewer than `min`.
    fn significant(&self, min: usize) -> usize {
        let last = self.0.iter().rposition(|&c| c != 0).map_or(0, |i| i + 1);
        last.max(min)
    }

    fn dotted(&self, min: usize) -> String {
        self.0[..self.significant(min)]
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(".")
    }

    fn compact(&self) -> String {
        self.0[..self.significant(2)]
            .iter()
            .map(|c| c.to_string())
            .collect()
    }
}

impl fmt::Display for FrameworkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dotted(2))
    }
}

/// A parsed target framework.
#[derive(Debug, Clone)]
pub struct TargetFramework {
    identifier: String,
    version: FrameworkVersion,
    profile: Option<String>,
    platform: Option<String>,
    platform_version: FrameworkVersion,
}

impl TargetFramework {
    /// The framework every other framework is compatible with.
    pub fn any() -> Self {
        TargetFramework::new(ANY, FrameworkVersion::default())
    }

    pub fn new(identifier: impl Into<String>, version: FrameworkVersion) -> Self {
        TargetFramework {
            identifier: identifier.into(),
            version,
            profile: None,
            platform: None,
            platform_version: FrameworkVersion::default(),
        }
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>, version: FrameworkVersion) -> Self {
        self.platform = Some(platform.into());
        self.platform_version = version;
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn version(&self) -> FrameworkVersion {
        self.version
    }

    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    pub fn platform(&self) -> Option<&str> {
        self.platform.as_deref()
    }

    pub fn is_any(&self) -> bool {
        eq_ignore_case(&self.identifier, ANY)
    }

    /// Short folder name, e.g. `net472` or `net6.0-windows`.
    pub fn short_name(&self) -> String {
        let base = if self.is_any() {
            "any".to_string()
        } else if eq_ignore_case(&self.identifier, NET_FRAMEWORK) {
            format!("net{}", self.version.compact())
        } else if eq_ignore_case(&self.identifier, NET_CORE_APP) && self.version.major() >= 5 {
            format!("net{}", self.version.dotted(2))
        } else if let Some((short, _)) = KNOWN_IDENTIFIERS
            .iter()
            .find(|(_, long)| eq_ignore_case(long, &self.identifier))
        {
            format!("{}{}", short, self.version.dotted(2))
        } else if self.version.is_zero() {
            self.identifier.to_lowercase()
        } else {
            format!("{}{}", self.identifier.to_lowercase(), self.version.dotted(2))
        };

        let mut name = base;
        if let Some(profile) = &self.profile {
            name.push_str(&format!("-{}", profile.to_lowercase()));
        }
        if let Some(platform) = &self.platform {
            name.push('-');
            name.push_str(&platform.to_lowercase());
            if !self.platform_version.is_zero() {
                name.push_str(&self.platform_version.dotted(1));
            }
        }
        name
    }

    fn parse_long(s: &str) -> Result<Self, FrameworkParseError> {
        let mut parts = s.split(',').map(str::trim);
        let identifier = parts.next().filter(|p| !p.is_empty());
        let identifier = identifier.ok_or_else(|| FrameworkParseError::Invalid(s.to_string()))?;

        let mut framework = TargetFramework::new(identifier, FrameworkVersion::default());
        for part in parts {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| FrameworkParseError::Invalid(s.to_string()))?;
            match key.trim().to_ascii_lowercase().as_str() {
                "version" => {
                    framework.version = FrameworkVersion::parse(value.trim()).ok_or_else(|| {
                        FrameworkParseError::InvalidVersion {
                            framework: s.to_string(),
                            version: value.to_string(),
                        }
                    })?;
                }
                "profile" => framework.profile = Some(value.trim().to_string()),
                _ => return Err(FrameworkParseError::Invalid(s.to_string())),
            }
        }
        Ok(framework)
    }

    fn parse_short(s: &str) -> Result<Self, FrameworkParseError> {
        let (base, platform) = match s.split_once('-') {
            Some((base, platform)) => (base, Some(platform)),
            None => (s, None),
        };

        let split = base
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(base.len());
        let (short, version) = base.split_at(split);
        if short.is_empty() || !short.chars().all(|c| c.is_ascii_alphabetic() || c == '.') {
            return Err(FrameworkParseError::Invalid(s.to_string()));
        }

        let version = FrameworkVersion::parse(version).ok_or_else(|| {
            FrameworkParseError::InvalidVersion {
                framework: s.to_string(),
                version: version.to_string(),
            }
        })?;

        let identifier = if short.eq_ignore_ascii_case("net") && version.major() >= 5 {
            NET_CORE_APP.to_string()
        } else {
            KNOWN_IDENTIFIERS
                .iter()
                .find(|(known, _)| known.eq_ignore_ascii_case(short))
                .map(|(_, long)| long.to_string())
                .unwrap_or_else(|| short.to_string())
        };

        let mut framework = TargetFramework::new(identifier, version);
        if let Some(platform) = platform {
            let split = platform
                .find(|c: char| c.is_ascii_digit())
                .unwrap_or(platform.len());
            let (name, version) = platform.split_at(split);
            if name.is_empty() {
                return Err(FrameworkParseError::Invalid(s.to_string()));
            }
            let version = FrameworkVersion::parse(version).ok_or_else(|| {
                FrameworkParseError::InvalidVersion {
                    framework: s.to_string(),
                    version: version.to_string(),
                }
            })?;
            // .NET Framework profiles share the dash syntax with platforms.
            if framework.identifier == NET_FRAMEWORK && version.is_zero() {
                framework.profile = Some(name.to_string());
            } else {
                framework.platform = Some(name.to_string());
                framework.platform_version = version;
            }
        }
        Ok(framework)
    }
}

impl FromStr for TargetFramework {
    type Err = FrameworkParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("any") {
            return Ok(TargetFramework::any());
        }
        if s.contains(',') || s.starts_with('.') {
            TargetFramework::parse_long(s)
        } else {
            TargetFramework::parse_short(s)
        }
    }
}

fn cmp_opt(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => cmp_ignore_case(a, b),
    }
}

impl Ord for TargetFramework {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .is_any()
            .cmp(&self.is_any())
            .then_with(|| cmp_ignore_case(&self.identifier, &other.identifier))
            .then_with(|| self.version.cmp(&other.version))
            .then_with(|| cmp_opt(self.profile(), other.profile()))
            .then_with(|| cmp_opt(self.platform(), other.platform()))
            .then_with(|| self.platform_version.cmp(&other.platform_version))
    }
}

impl PartialOrd for TargetFramework {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for TargetFramework {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TargetFramework {}

impl Hash for TargetFramework {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identifier.to_lowercase().hash(state);
        self.version.hash(state);
        self.profile.as_ref().map(|p| p.to_lowercase()).hash(state);
        self.platform.as_ref().map(|p| p.to_lowercase()).hash(state);
        self.platform_version.hash(state);
    }
}

impl fmt::Display for TargetFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_name())
    }
}

impl Serialize for TargetFramework {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.short_name())
    }
}

impl<'de> Deserialize<'de> for TargetFramework {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tf(s: &str) -> TargetFramework {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_net_framework_short_names() {
        let net45 = tf("net45");
        assert_eq!(net45.identifier(), NET_FRAMEWORK);
        assert_eq!(net45.version(), FrameworkVersion::new(4, 5, 0, 0));

        let net472 = tf("net472");
        assert_eq!(net472.version(), FrameworkVersion::new(4, 7, 2, 0));
        assert_eq!(net472.short_name(), "net472");
    }

    #[test]
    fn test_parse_dotted_and_modern_names() {
        assert_eq!(tf("netstandard2.0").identifier(), NET_STANDARD);
        assert_eq!(tf("netcoreapp3.1").version(), FrameworkVersion::new(3, 1, 0, 0));

        let net6 = tf("net6.0-windows10.0.19041");
        assert_eq!(net6.identifier(), NET_CORE_APP);
        assert_eq!(net6.platform(), Some("windows"));
        assert_eq!(net6.short_name(), "net6.0-windows10.0.19041");
    }

    #[test]
    fn test_parse_long_form_matches_short_form() {
        let long = tf(".NETFramework,Version=v4.5,Profile=Client");
        assert_eq!(long.profile(), Some("Client"));
        assert_eq!(long, tf("net45-client"));
        assert_eq!(tf(".NETStandard,Version=v2.0"), tf("netstandard2.0"));
    }

    #[test]
    fn test_parse_any() {
        assert!(tf("any").is_any());
        assert!(tf("").is_any());
        assert_eq!(TargetFramework::any().short_name(), "any");
    }

    #[test]
    fn test_unknown_identifier_is_kept() {
        let custom = tf("tizen4.0");
        assert_eq!(custom.identifier(), "tizen");
        assert_eq!(custom.short_name(), "tizen4.0");
    }

    #[test]
    fn test_parse_errors() {
        assert!("4.5".parse::<TargetFramework>().is_err());
        assert!("net4x".parse::<TargetFramework>().is_err());
        assert!(".NETFramework,Flavor=x".parse::<TargetFramework>().is_err());
    }

    #[test]
    fn test_precedence_order() {
        let mut frameworks = vec![
            tf("netstandard2.0"),
            tf("net472"),
            tf("any"),
            tf("net45"),
            tf("net6.0"),
        ];
        frameworks.sort();
        let names: Vec<_> = frameworks.iter().map(|f| f.short_name()).collect();
        assert_eq!(names, vec!["any", "net6.0", "net45", "net472", "netstandard2.0"]);
    }

    #[test]
    fn test_equality_ignores_case() {
        assert_eq!(tf("NET472"), tf("net472"));
        assert_eq!(tf(".netframework,Version=v4.7.2"), tf("net472"));
    }
}
