//! Identifier types.

use std::fmt;
use std::num::NonZeroU64;

/// Row/column index of a graph adjacency matrix (0-based).
pub type VertexId = u64;

/// Row/column index of an automaton transition matrix (0-based).
pub type StateId = u64;

/// Sequential query number, starting at 1.
pub type QueryNumber = usize;

/// Identifier of one edge-label partition of the dataset.
///
/// Labels are 1-based: the dataset directory holds `1.txt ..= <count>.txt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label(NonZeroU64);

impl Label {
    /// Creates a label from its 1-based id. Returns `None` for zero.
    #[inline]
    #[must_use]
    pub const fn new(id: u64) -> Option<Self> {
        match NonZeroU64::new(id) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    /// Returns the raw 1-based id.
    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0.get()
    }

    /// Returns the 0-based slot index of this label.
    #[inline]
    #[must_use]
    pub const fn slot(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A label as declared in a query description.
///
/// A negative value marks an inverse edge. The absolute value names the
/// dataset partition; the signed value names the per-query transition file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignedLabel(i64);

impl SignedLabel {
    /// Creates a signed label. Returns `None` for zero.
    #[inline]
    #[must_use]
    pub const fn new(raw: i64) -> Option<Self> {
        if raw == 0 { None } else { Some(Self(raw)) }
    }

    /// Returns the raw signed value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Returns the dataset label this value refers to.
    #[inline]
    #[must_use]
    pub const fn label(self) -> Label {
        // Zero is rejected by the constructor.
        Label(match NonZeroU64::new(self.0.unsigned_abs()) {
            Some(id) => id,
            None => NonZeroU64::MIN,
        })
    }

    /// Whether edges of this label are traversed backwards.
    #[inline]
    #[must_use]
    pub const fn is_inverse(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for SignedLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_slot() {
        let label = Label::new(1).unwrap();
        assert_eq!(label.as_u64(), 1);
        assert_eq!(label.slot(), 0);
        assert_eq!(Label::new(7).unwrap().slot(), 6);
        assert!(Label::new(0).is_none());
    }

    #[test]
    fn test_signed_label_inverse() {
        let forward = SignedLabel::new(3).unwrap();
        assert!(!forward.is_inverse());
        assert_eq!(forward.label(), Label::new(3).unwrap());

        let inverse = SignedLabel::new(-3).unwrap();
        assert!(inverse.is_inverse());
        assert_eq!(inverse.label(), Label::new(3).unwrap());
        assert_eq!(inverse.to_string(), "-3");
    }

    #[test]
    fn test_signed_label_rejects_zero() {
        assert!(SignedLabel::new(0).is_none());
    }

    #[test]
    fn test_signed_label_extreme() {
        let label = SignedLabel::new(i64::MIN).unwrap();
        assert!(label.is_inverse());
        assert_eq!(label.label().as_u64(), 1u64 << 63);
    }
}
