//! PAN-OS software version numbers
//!
//! A device version is only ever used as a selector key: wire schemas are
//! chosen by comparing the live device version against each schema's
//! minimum version.

use crate::error::PanosError;
use std::fmt;
use std::str::FromStr;

/// A PAN-OS software version such as `8.1.0` or `7.1.0-h3`.
///
/// Ordering is lexicographic over `(major, minor, patch, suffix)`, so a
/// hotfix or beta build orders after the bare release of the same number.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    /// Major release
    pub major: u32,
    /// Feature release
    pub minor: u32,
    /// Maintenance release
    pub patch: u32,
    /// Build suffix after `-`, e.g. `h3`; empty for a plain release
    pub suffix: String,
}

impl Version {
    /// Create a version without a suffix
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            suffix: String::new(),
        }
    }

    /// Returns true if this version is greater than or equal to `other`
    pub fn gte(&self, other: &Version) -> bool {
        self >= other
    }
}

impl FromStr for Version {
    type Err = PanosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (release, suffix) = match s.split_once('-') {
            Some((release, suffix)) => (release, suffix),
            None => (s, ""),
        };

        let parts: Vec<&str> = release.split('.').collect();
        if parts.len() != 3 {
            return Err(PanosError::InvalidVersion(format!(
                "expected major.minor.patch, got {:?}",
                s
            )));
        }

        let mut nums = [0u32; 3];
        for (slot, part) in nums.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| {
                PanosError::InvalidVersion(format!("non-numeric component {:?} in {:?}", part, s))
            })?;
        }

        Ok(Self {
            major: nums[0],
            minor: nums[1],
            patch: nums[2],
            suffix: suffix.to_string(),
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.suffix.is_empty() {
            write!(f, "-{}", self.suffix)?;
        }
        Ok(())
    }
}
