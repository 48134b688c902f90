//! Arena handles with a reserved "null" value.
//!
//! Forward links between skip list nodes are not pointers but handles into
//! the node arena. A reserved sentinel (`MAX` for the unsigned integers)
//! stands in for "no successor", which keeps each link the size of the
//! handle itself instead of an `Option`.

use core::fmt::Debug;

/// A copyable arena handle with a sentinel "none" value.
///
/// Smaller handle types shrink every forward link, at the cost of capping
/// how many nodes the arena can hold (`NONE` itself is never a valid slot).
///
/// # Example
///
/// ```
/// use nexus_skipmap::Handle;
///
/// let slot: u32 = 7;
/// assert!(slot.is_some());
/// assert!(u32::NONE.is_none());
/// assert_eq!(u32::from_index(7).index(), 7);
/// ```
pub trait Handle: Copy + Eq + Debug {
    /// Sentinel value meaning "no node".
    const NONE: Self;

    /// Converts an arena slot number into a handle.
    fn from_index(index: usize) -> Self;

    /// Returns the arena slot number this handle refers to.
    fn index(self) -> usize;

    /// Returns `true` if this is the sentinel value.
    #[inline]
    fn is_none(self) -> bool {
        self == Self::NONE
    }

    /// Returns `true` if this refers to a slot.
    #[inline]
    fn is_some(self) -> bool {
        !self.is_none()
    }

    /// Number of slots addressable by this handle type.
    #[inline]
    fn capacity() -> usize {
        Self::NONE.index()
    }
}

macro_rules! impl_handle_for_unsigned {
    ($($ty:ty),*) => {
        $(
            impl Handle for $ty {
                const NONE: Self = <$ty>::MAX;

                #[inline]
                fn from_index(index: usize) -> Self {
                    index as Self
                }

                #[inline]
                fn index(self) -> usize {
                    self as usize
                }
            }
        )*
    };
}

impl_handle_for_unsigned!(u16, u32, u64, usize);

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_handle_sentinel {
        ($($ty:ty => $name:ident),*) => {
            $(
                #[test]
                fn $name() {
                    assert!(<$ty>::NONE.is_none());
                    assert!(!<$ty>::NONE.is_some());
                    assert!(<$ty as Handle>::from_index(0).is_some());
                    assert!((<$ty>::MAX - 1).is_some());
                }
            )*
        };
    }

    test_handle_sentinel!(
        u16 => u16_sentinel,
        u32 => u32_sentinel,
        u64 => u64_sentinel,
        usize => usize_sentinel
    );

    #[test]
    fn index_roundtrip() {
        for i in [0usize, 1, 100, u16::MAX as usize - 1] {
            assert_eq!(u32::from_index(i).index(), i);
            assert_eq!(u16::from_index(i).index(), i);
        }
    }

    #[test]
    fn capacity_excludes_sentinel() {
        assert_eq!(u16::capacity(), u16::MAX as usize);
        assert_eq!(u32::capacity(), u32::MAX as usize);
    }
}
