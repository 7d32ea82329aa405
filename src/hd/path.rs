//! Derivation-path text parsing.

use std::fmt;
use std::str::FromStr;

use super::derive::HARDENED_OFFSET;
use super::{DerivationError, DerivationResult};

/// An ordered list of 32-bit child indices; values at or above 2^31 are
/// hardened.
///
/// Textual form: slash-separated segments, an optional leading `m` (any
/// case, ignored), and an apostrophe suffix marking a hardened segment —
/// `m/42'/1/2`. An empty path addresses the root itself.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct DerivationPath(Vec<u32>);

impl DerivationPath {
    /// Build from raw indices (hardened bit already applied).
    #[must_use]
    pub fn from_indices(indices: Vec<u32>) -> Self {
        Self(indices)
    }

    /// The child indices, root first.
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.0
    }

    /// Number of derivation steps.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl FromStr for DerivationPath {
    type Err = DerivationError;

    fn from_str(s: &str) -> DerivationResult<Self> {
        let mut indices = Vec::new();
        for segment in s.split('/') {
            let segment = segment.trim();
            if segment.is_empty() || segment.eq_ignore_ascii_case("m") {
                continue;
            }

            let (digits, hardened) = match segment.strip_suffix('\'') {
                Some(digits) => (digits, true),
                None => (segment, false),
            };

            let raw: u32 = digits.parse().map_err(|_| {
                DerivationError::PathComponentOutOfRange(segment.to_string())
            })?;

            let index = if hardened {
                // Hardening shifts into the top half; the raw value must
                // leave room for it.
                raw.checked_add(HARDENED_OFFSET)
                    .filter(|_| raw < HARDENED_OFFSET)
                    .ok_or_else(|| {
                        DerivationError::PathComponentOutOfRange(segment.to_string())
                    })?
            } else {
                raw
            };
            indices.push(index);
        }
        Ok(Self(indices))
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for &index in &self.0 {
            if index >= HARDENED_OFFSET {
                write!(f, "/{}'", index - HARDENED_OFFSET)?;
            } else {
                write!(f, "/{index}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_path() {
        let path: DerivationPath = "m/42'/1/2".parse().unwrap();
        assert_eq!(path.indices(), &[42 + HARDENED_OFFSET, 1, 2]);
    }

    #[test]
    fn test_leading_m_is_optional() {
        let with_m: DerivationPath = "m/42'/1/2".parse().unwrap();
        let without: DerivationPath = "42'/1/2".parse().unwrap();
        assert_eq!(with_m, without);
        let upper: DerivationPath = "M/0".parse().unwrap();
        assert_eq!(upper.indices(), &[0]);
    }

    #[test]
    fn test_empty_path_is_root() {
        let path: DerivationPath = "".parse().unwrap();
        assert_eq!(path.depth(), 0);
        let just_m: DerivationPath = "m".parse().unwrap();
        assert_eq!(just_m.depth(), 0);
    }

    #[test]
    fn test_rejects_garbage_segments() {
        for bad in ["m/x", "m/1/two", "m/-1", "m/''"] {
            assert!(matches!(
                bad.parse::<DerivationPath>(),
                Err(DerivationError::PathComponentOutOfRange(_))
            ));
        }
    }

    #[test]
    fn test_rejects_overflowing_indices() {
        // 2^32 does not fit u32; 2^31 cannot be hardened again.
        for bad in ["m/4294967296", "m/2147483648'"] {
            assert!(matches!(
                bad.parse::<DerivationPath>(),
                Err(DerivationError::PathComponentOutOfRange(_))
            ));
        }
    }

    #[test]
    fn test_display_roundtrip() {
        let path: DerivationPath = "m/44'/43'/0/5".parse().unwrap();
        assert_eq!(path.to_string(), "m/44'/43'/0/5");
        let reparsed: DerivationPath = path.to_string().parse().unwrap();
        assert_eq!(path, reparsed);
    }
}
