#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// Represents segment orientation/strand
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub enum Orientation {
    Forward,
    Backward,
}

impl Orientation {
    /// Parse an orientation from a single-element, where + is
    /// Forward, - is Backward
    #[inline]
    pub fn from_bytes_plus_minus<T: AsRef<[u8]>>(bs: T) -> Option<Self> {
        match bs.as_ref() {
            b"+" => Some(Orientation::Forward),
            b"-" => Some(Orientation::Backward),
            _ => None,
        }
    }

    #[inline]
    pub fn is_reverse(&self) -> bool {
        matches!(self, Orientation::Backward)
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sym = match self {
            Self::Forward => '+',
            Self::Backward => '-',
        };
        write!(f, "{}", sym)
    }
}

/// Order the two ends of a link as (parent, child).
///
/// A link `a+ b+` and its reverse complement `b- a-` describe the same
/// adjacency; the latter is read backwards, so whenever either end is
/// on the reverse strand the ends swap places. Both forms then key to
/// `(a, b)`, whichever assembly's alignment recorded them.
pub fn parent_child<T>(
    (from, from_orient): (T, Orientation),
    (to, to_orient): (T, Orientation),
) -> (T, T) {
    if from_orient.is_reverse() || to_orient.is_reverse() {
        (to, from)
    } else {
        (from, to)
    }
}
