pub mod twi;

/// Types implement this trait
/// to be used as indication of
/// a specific encoding scheme.
pub trait Encoding {
    /// The fundamental word of the
    /// encoding scheme.
    ///
    /// i.e. `u8` for a TWI frame.
    type Word: PartialEq + 'static;

    /// Words the transport keeps for itself.
    ///
    /// These may never be carried as data.
    const RESERVED: &'static [Self::Word];

    /// Whether `word` is one of the [`RESERVED`](Self::RESERVED) words.
    fn is_reserved(word: &Self::Word) -> bool {
        Self::RESERVED.contains(word)
    }
}
