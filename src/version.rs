//! Semantic version parsing for release tags.
//!
//! Release tags take the canonical shape `vMAJOR.MINOR.PATCH`. Anything that
//! does not decompose into exactly three unsigned decimal segments is a
//! [`ParseError`]; there is no zero-filled fallback, so malformed tags can
//! never collapse into the same lowest rank.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A release tag that does not parse as `vMAJOR.MINOR.PATCH`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid version tag \"{raw}\"; expected vMAJOR.MINOR.PATCH")]
pub struct ParseError {
    /// The rejected tag, exactly as supplied.
    pub raw: String,
}

impl ParseError {
    fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_owned(),
        }
    }
}

/// A parsed `(major, minor, patch)` release version.
///
/// Ordering compares `major`, then `minor`, then `patch`.
///
/// # Examples
///
/// ```
/// use release_catalog::version::SemanticVersion;
///
/// let version: SemanticVersion = "v1.30.2".parse().expect("valid tag");
/// assert_eq!((version.major, version.minor, version.patch), (1, 30, 2));
/// assert_eq!(version.to_string(), "v1.30.2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SemanticVersion {
    /// Major version component.
    pub major: u64,
    /// Minor version component.
    pub minor: u64,
    /// Patch version component.
    pub patch: u64,
}

impl SemanticVersion {
    /// Create a version from its three components.
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Return the `(major, minor)` pair identifying the minor line.
    #[must_use]
    pub const fn minor_line(self) -> (u64, u64) {
        (self.major, self.minor)
    }
}

/// Parse a release tag into a [`SemanticVersion`].
///
/// A single leading `v` is stripped. The remainder must be exactly three
/// `.`-separated segments of ASCII digits. Pre-release and build suffixes
/// such as `-beta.1` fail the whole parse rather than being truncated.
///
/// # Errors
///
/// Returns [`ParseError`] carrying the original tag for any malformation.
///
/// # Examples
///
/// ```
/// use release_catalog::version::parse;
///
/// assert!(parse("v1.2.3").is_ok());
/// assert!(parse("1.2.3").is_ok());
/// assert!(parse("v1.2").is_err());
/// assert!(parse("v1.2.3-beta.1").is_err());
/// ```
pub fn parse(tag: &str) -> Result<SemanticVersion, ParseError> {
    let body = tag.strip_prefix('v').unwrap_or(tag);
    let mut segments = body.split('.');

    let major = next_component(&mut segments).ok_or_else(|| ParseError::new(tag))?;
    let minor = next_component(&mut segments).ok_or_else(|| ParseError::new(tag))?;
    let patch = next_component(&mut segments).ok_or_else(|| ParseError::new(tag))?;

    if segments.next().is_some() {
        return Err(ParseError::new(tag));
    }

    Ok(SemanticVersion::new(major, minor, patch))
}

/// Pull one numeric segment; `u64::from_str` alone would accept a `+` sign.
fn next_component<'a>(segments: &mut impl Iterator<Item = &'a str>) -> Option<u64> {
    let segment = segments.next()?;
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

impl FromStr for SemanticVersion {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

impl TryFrom<&str> for SemanticVersion {
    type Error = ParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        parse(value)
    }
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
    }
}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}
