//! Resolved sequences and the cursor-based iteration over them.
//!
//! A [`Model`] is produced once by the transformer and then only read, except
//! for the per-sequence cursor moved by [`Model::next`], [`Model::prev`] and
//! [`Model::reset`]. Sequences are addressed by 1-based [`Handle`]s in
//! declaration order; handle 0 is never valid.

mod handle;
mod sequence;


pub use handle::Handle;
pub use sequence::{Position, ResolvedSequence};

use rustc_hash::FxHashMap;
use rvs_diagnostic::{Error, Result};

/// Every resolved sequence of a context, with iteration state.
///
/// Only the sequences are serialized; the name index is rebuilt on
/// deserialization.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "ModelData")
)]
pub struct Model {
    sequences: Vec<ResolvedSequence>,
    #[cfg_attr(feature = "serde", serde(skip))]
    by_name: FxHashMap<String, Handle>,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct ModelData {
    sequences: Vec<ResolvedSequence>,
}

#[cfg(feature = "serde")]
impl From<ModelData> for Model {
    fn from(data: ModelData) -> Self {
        Model::new(data.sequences)
    }
}

impl Model {
    /// Build a model from sequences in declaration order.
    ///
    /// If a name repeats, `find` returns the first.
    pub fn new(sequences: Vec<ResolvedSequence>) -> Self {
        let mut by_name = FxHashMap::default();
        for (handle, sequence) in Handle::all(sequences.len()).zip(&sequences) {
            by_name.entry(sequence.name().to_string()).or_insert(handle);
        }
        Model { sequences, by_name }
    }

    /// Handle of the sequence named `name`.
    pub fn find(&self, name: &str) -> Result<Handle> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| Error::UndefinedReference(name.to_string()))
    }

    /// Step forward and return the value under the cursor.
    ///
    /// Once the last value is reached, further calls return it again.
    pub fn next(&mut self, handle: Handle) -> Result<u32> {
        self.sequence_mut(handle)?
            .step_forward()
            .ok_or(Error::EmptySequenceAccess(handle.get()))
    }

    /// Step backward and return the value under the cursor.
    ///
    /// Clamps at the first value, including from before the start.
    pub fn prev(&mut self, handle: Handle) -> Result<u32> {
        self.sequence_mut(handle)?
            .step_backward()
            .ok_or(Error::EmptySequenceAccess(handle.get()))
    }

    /// Whether the cursor sits on the last value (always true when empty).
    pub fn done(&self, handle: Handle) -> Result<bool> {
        Ok(self.sequence(handle)?.is_done())
    }

    /// Move the cursor back before the first value.
    pub fn reset(&mut self, handle: Handle) -> Result<()> {
        self.sequence_mut(handle)?.reset();
        Ok(())
    }

    /// Value under the cursor, `None` before the first step.
    pub fn current(&self, handle: Handle) -> Result<Option<u32>> {
        Ok(self.sequence(handle)?.current())
    }

    pub fn sequence(&self, handle: Handle) -> Result<&ResolvedSequence> {
        handle
            .index()
            .and_then(|index| self.sequences.get(index))
            .ok_or(Error::InvalidHandle(handle.get()))
    }

    fn sequence_mut(&mut self, handle: Handle) -> Result<&mut ResolvedSequence> {
        handle
            .index()
            .and_then(|index| self.sequences.get_mut(index))
            .ok_or(Error::InvalidHandle(handle.get()))
    }

    /// All valid handles, in declaration order.
    pub fn handles(&self) -> impl Iterator<Item = Handle> {
        Handle::all(self.sequences.len())
    }

    /// Sequence names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sequences.iter().map(ResolvedSequence::name)
    }

    pub fn sequences(&self) -> &[ResolvedSequence] {
        &self.sequences
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}
