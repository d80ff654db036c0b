//! Wire codec for the 8-byte TWI command frame.
//!
//! Every transaction on the bus is a single [`Frame`]: a command byte, a
//! sub-command byte, five payload bytes and a response flag. The two
//! transport sentinels (`0x00` and `0xFF`) never appear in the payload,
//! unused slots carry the blank symbol `_` instead.

#![no_std]

// lets the derive macros refer to this crate by name from inside it
extern crate self as twi_codec;

pub mod command;
pub mod encoding;
pub mod frame;
pub mod payload;

use encoding::{twi::Twi, Encoding};

pub use frame::{decode, encode, Frame, ResponseFlag, FRAME_LEN};
pub use payload::{AsciiNumber, Payload, PAYLOAD_LEN};

pub mod error {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct EndOfInput;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct Invalid;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum Error {
        /// The medium ran out before the value was complete.
        EndOfInput,
        /// A symbol that does not belong to the expected type.
        Invalid,
        /// A frame that is not exactly [`FRAME_LEN`](crate::FRAME_LEN) bytes.
        FrameLength(usize),
        /// A payload byte equal to one of the transport sentinels.
        PayloadSentinel(u8),
        /// Byte 7 is neither the true nor the false symbol.
        InvalidResponseFlag(u8),
        /// A numeric field holding something other than ASCII digits.
        MalformedNumeric,
        /// A number too wide for the five digit field.
        NumericOverflow(u32),
    }

    impl From<EndOfInput> for Error {
        fn from(_: EndOfInput) -> Self {
            Self::EndOfInput
        }
    }

    impl From<Invalid> for Error {
        fn from(_: Invalid) -> Self {
            Self::Invalid
        }
    }
}

/// Serialize a type to and from the words of
/// an encoding via iterators.
pub trait SerializeIter<E: Encoding = Twi>: Sized {
    /// Serialize the implementer type to a
    /// serialization medium via an iterator.
    fn serialize_iter<'a>(
        &self,
        dst: impl IntoIterator<Item = &'a mut E::Word>,
    ) -> Result<(), error::Error>
    where
        E::Word: 'a;

    /// Deserialize the implementer type from a
    /// serialization medium via an iterator.
    fn deserialize_iter<'a>(src: impl IntoIterator<Item = &'a E::Word>) -> Result<Self, error::Error>
    where
        E::Word: 'a;
}

/// Types with a fixed serialized width.
///
/// The width is known at compile time, which is what lets a [`Frame`] be
/// checked against [`FRAME_LEN`] before anything touches the bus.
pub trait SerializeBuf<E: Encoding = Twi>: SerializeIter<E> {
    /// Number of words in the serialized form.
    const SIZE: usize;

    /// The buffer holding the serialized form.
    type Serialized: AsRef<[E::Word]> + AsMut<[E::Word]> + Default;

    /// Serialize the implementer type into a fresh buffer.
    fn serialize_buf(&self) -> Result<Self::Serialized, error::Error> {
        let mut dst = Self::Serialized::default();

        self.serialize_iter(dst.as_mut().iter_mut())?;

        Ok(dst)
    }

    /// Deserialize the implementer type from a buffer.
    fn deserialize_buf(src: &Self::Serialized) -> Result<Self, error::Error> {
        Self::deserialize_iter(src.as_ref().iter())
    }
}
