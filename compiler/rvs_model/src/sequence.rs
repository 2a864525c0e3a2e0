/// Cursor position within a sequence.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Position {
    /// Nothing has been read yet.
    #[default]
    BeforeStart,
    /// On the value at this index.
    At(usize),
}

/// The fully expanded values of one identifier plus its cursor.
///
/// Deserialized sequences go through [`ResolvedSequence::new`]; a stored
/// position past the end is dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "SequenceData")
)]
pub struct ResolvedSequence {
    name: String,
    values: Vec<u32>,
    /// Components per row; 1 except for products.
    arity: usize,
    position: Position,
}

/// Serialized form of a [`ResolvedSequence`], checked on the way in.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct SequenceData {
    name: String,
    values: Vec<u32>,
    arity: usize,
    #[serde(default)]
    position: Position,
}

#[cfg(feature = "serde")]
impl From<SequenceData> for ResolvedSequence {
    fn from(data: SequenceData) -> Self {
        let mut sequence = ResolvedSequence::new(data.name, data.values, data.arity);
        if let Position::At(index) = data.position {
            if index < sequence.values.len() {
                sequence.position = data.position;
            }
        }
        sequence
    }
}

impl ResolvedSequence {
    /// A sequence with its cursor before the first value.
    ///
    /// An `arity` of zero is treated as 1.
    pub fn new(name: impl Into<String>, values: Vec<u32>, arity: usize) -> Self {
        ResolvedSequence {
            name: name.into(),
            values,
            arity: arity.max(1),
            position: Position::BeforeStart,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Number of `arity`-wide rows.
    pub fn rows(&self) -> usize {
        self.values.len() / self.arity
    }

    /// Rows as slices of `arity` values.
    pub fn iter_rows(&self) -> std::slice::ChunksExact<'_, u32> {
        self.values.chunks_exact(self.arity)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// On the last value, or empty.
    pub fn is_done(&self) -> bool {
        match self.position {
            _ if self.values.is_empty() => true,
            Position::At(index) => index + 1 == self.values.len(),
            Position::BeforeStart => false,
        }
    }

    pub fn current(&self) -> Option<u32> {
        match self.position {
            Position::At(index) => self.values.get(index).copied(),
            Position::BeforeStart => None,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.position = Position::BeforeStart;
    }

    /// `None` only when empty.
    pub(crate) fn step_forward(&mut self) -> Option<u32> {
        let last = self.values.len().checked_sub(1)?;
        let index = match self.position {
            Position::BeforeStart => 0,
            Position::At(index) => (index + 1).min(last),
        };
        self.position = Position::At(index);
        self.values.get(index).copied()
    }

    /// `None` only when empty.
    pub(crate) fn step_backward(&mut self) -> Option<u32> {
        let first = *self.values.first()?;
        let index = match self.position {
            Position::BeforeStart | Position::At(0) => 0,
            Position::At(index) => index - 1,
        };
        self.position = Position::At(index);
        Some(self.values.get(index).copied().unwrap_or(first))
    }
}
