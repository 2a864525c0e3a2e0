use std::fmt;

/// 1-based reference to a sequence of a [`Model`](crate::Model).
///
/// `Handle::INVALID` (0) never names a sequence.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Handle(u32);

impl Handle {
    pub const INVALID: Handle = Handle(0);

    #[inline]
    pub const fn new(raw: u32) -> Self {
        Handle(raw)
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Index into the model's sequences, `None` for the invalid handle.
    #[inline]
    pub(crate) fn index(self) -> Option<usize> {
        (self.0 as usize).checked_sub(1)
    }

    /// Handles `1..=count`.
    ///
    /// # Panics
    ///
    /// Panics if `count` exceeds `u32::MAX`.
    pub(crate) fn all(count: usize) -> impl Iterator<Item = Handle> {
        let count = u32::try_from(count)
            .unwrap_or_else(|_| panic!("model exceeds {} sequences", u32::MAX));
        (1..=count).map(Handle)
    }
}

impl From<u32> for Handle {
    fn from(raw: u32) -> Self {
        Handle(raw)
    }
}

impl From<Handle> for u32 {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
