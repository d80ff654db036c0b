//! The five data bytes of a frame.

use fill_array::fill;

use crate::{
    encoding::{
        twi::{bool_symbol, Twi, BLANK},
        Encoding,
    },
    error, SerializeBuf, SerializeIter,
};

/// Width of the payload in bytes.
pub const PAYLOAD_LEN: usize = 5;

/// The data carried in bytes 2 through 6 of a frame.
///
/// A `Payload` never holds a transport sentinel, which is checked once on
/// construction and again whenever one is read off the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Payload([u8; PAYLOAD_LEN]);

impl Payload {
    /// All slots blank.
    pub const BLANK: Self = Self([BLANK; PAYLOAD_LEN]);

    /// Wrap raw payload bytes.
    ///
    /// Fails with [`PayloadSentinel`](error::Error::PayloadSentinel) naming
    /// the first reserved byte found.
    pub fn new(bytes: [u8; PAYLOAD_LEN]) -> Result<Self, error::Error> {
        match bytes.iter().find(|byte| Twi::is_reserved(byte)) {
            Some(&byte) => Err(error::Error::PayloadSentinel(byte)),
            None => Ok(Self(bytes)),
        }
    }

    /// A boolean result in byte 0, the rest blank.
    pub const fn from_bool(value: bool) -> Self {
        let mut bytes = [BLANK; PAYLOAD_LEN];
        bytes[0] = bool_symbol(value);

        Self(bytes)
    }

    /// A number spread over all five bytes as zero-padded ASCII digits.
    pub fn from_number(value: u32) -> Result<Self, error::Error> {
        let mut bytes = [BLANK; PAYLOAD_LEN];

        AsciiNumber::new(value)?.serialize_iter(bytes.iter_mut())?;

        Ok(Self(bytes))
    }

    /// Read the boolean in byte 0.
    pub fn to_bool(&self) -> Result<bool, error::Error> {
        bool::deserialize_iter(self.0.iter())
    }

    /// Read all five bytes as a decimal number.
    pub fn to_number(&self) -> Result<u32, error::Error> {
        AsciiNumber::deserialize_iter(self.0.iter()).map(AsciiNumber::get)
    }

    #[inline]
    pub const fn as_bytes(&self) -> &[u8; PAYLOAD_LEN] {
        &self.0
    }

    #[inline]
    pub fn is_blank(&self) -> bool {
        *self == Self::BLANK
    }
}

impl Default for Payload {
    fn default() -> Self {
        Self::BLANK
    }
}

impl TryFrom<[u8; PAYLOAD_LEN]> for Payload {
    type Error = error::Error;

    fn try_from(bytes: [u8; PAYLOAD_LEN]) -> Result<Self, Self::Error> {
        Self::new(bytes)
    }
}

impl SerializeIter for Payload {
    fn serialize_iter<'a>(
        &self,
        dst: impl IntoIterator<Item = &'a mut <Twi as Encoding>::Word>,
    ) -> Result<(), error::Error>
    where
        <Twi as Encoding>::Word: 'a,
    {
        let mut dst = dst.into_iter();

        for byte in self.0 {
            *dst.next().ok_or(error::EndOfInput)? = byte;
        }

        Ok(())
    }

    fn deserialize_iter<'a>(
        src: impl IntoIterator<Item = &'a <Twi as Encoding>::Word>,
    ) -> Result<Self, error::Error>
    where
        <Twi as Encoding>::Word: 'a,
    {
        let mut src = src.into_iter();

        Self::new(fill![*src.next().ok_or(error::EndOfInput)?; 5])
    }
}

impl SerializeBuf for Payload {
    const SIZE: usize = PAYLOAD_LEN;
    type Serialized = [u8; PAYLOAD_LEN];
}

/// A decimal number written as five ASCII digits, most significant first.
///
/// This is the shape used by indexed sub-commands such as "play track N":
/// track 172 travels as `b"00172"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AsciiNumber(u32);

impl AsciiNumber {
    pub const DIGITS: usize = PAYLOAD_LEN;
    pub const MAX: u32 = 99_999;

    pub const fn new(value: u32) -> Result<Self, error::Error> {
        if value > Self::MAX {
            Err(error::Error::NumericOverflow(value))
        } else {
            Ok(Self(value))
        }
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl SerializeIter for AsciiNumber {
    fn serialize_iter<'a>(
        &self,
        dst: impl IntoIterator<Item = &'a mut <Twi as Encoding>::Word>,
    ) -> Result<(), error::Error>
    where
        <Twi as Encoding>::Word: 'a,
    {
        let mut dst = dst.into_iter();
        let mut place = 10_000;

        while place > 0 {
            // `self.0 <= MAX` so every digit fits in a byte
            let digit = (self.0 / place % 10) as u8;
            *dst.next().ok_or(error::EndOfInput)? = b'0' + digit;
            place /= 10;
        }

        Ok(())
    }

    fn deserialize_iter<'a>(
        src: impl IntoIterator<Item = &'a <Twi as Encoding>::Word>,
    ) -> Result<Self, error::Error>
    where
        <Twi as Encoding>::Word: 'a,
    {
        let mut src = src.into_iter();
        let mut value = 0;

        for _ in 0..Self::DIGITS {
            let byte = *src.next().ok_or(error::EndOfInput)?;

            if !byte.is_ascii_digit() {
                Err(error::Error::MalformedNumeric)?;
            }

            value = value * 10 + u32::from(byte - b'0');
        }

        Ok(Self(value))
    }
}

impl SerializeBuf for AsciiNumber {
    const SIZE: usize = AsciiNumber::DIGITS;
    type Serialized = [u8; PAYLOAD_LEN];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        encoding::twi::{FALSE, TRUE},
        error::Error,
    };

    mod payload {
        use super::*;

        #[test]
        fn sentinels_rejected() {
            for sentinel in [0x00, 0xff] {
                for position in 0..PAYLOAD_LEN {
                    let mut bytes = [BLANK; PAYLOAD_LEN];
                    bytes[position] = sentinel;

                    assert_eq!(Err(Error::PayloadSentinel(sentinel)), Payload::new(bytes));
                    assert_eq!(
                        Err(Error::PayloadSentinel(sentinel)),
                        Payload::deserialize_buf(&bytes)
                    );
                }
            }
        }

        #[test]
        fn blank() {
            assert_eq!(b"_____", Payload::BLANK.as_bytes());
            assert_eq!(Payload::BLANK, Payload::default());
            assert!(Payload::BLANK.is_blank());
            assert!(!Payload::from_bool(false).is_blank());
        }

        #[test]
        fn boolean_in_first_byte() {
            assert_eq!(&[TRUE, BLANK, BLANK, BLANK, BLANK], Payload::from_bool(true).as_bytes());
            assert_eq!(&[FALSE, BLANK, BLANK, BLANK, BLANK], Payload::from_bool(false).as_bytes());

            assert_eq!(Ok(true), Payload::from_bool(true).to_bool());
            assert_eq!(Ok(false), Payload::from_bool(false).to_bool());
            assert_eq!(Err(Error::Invalid), Payload::BLANK.to_bool());
        }

        #[test]
        fn arbitrary_bytes_survive() {
            let bytes = *b"a1\x7f?Z";
            let payload = Payload::new(bytes).unwrap();

            assert_eq!(bytes, payload.serialize_buf().unwrap());
            assert_eq!(payload, Payload::deserialize_buf(&bytes).unwrap());
        }
    }

    mod numeric {
        use super::*;

        #[test]
        fn track_172() {
            let payload = Payload::from_number(172).unwrap();

            assert_eq!(b"00172", payload.as_bytes());
            assert_eq!(Ok(172), payload.to_number());
        }

        #[test]
        fn bounds() {
            for value in [0, 9, 10, 99_999] {
                assert_eq!(Ok(value), Payload::from_number(value).unwrap().to_number());
            }

            assert_eq!(b"00000", Payload::from_number(0).unwrap().as_bytes());
            assert_eq!(b"99999", Payload::from_number(99_999).unwrap().as_bytes());
        }

        #[test]
        fn overflow() {
            assert_eq!(Err(Error::NumericOverflow(100_000)), Payload::from_number(100_000));
            assert_eq!(Err(Error::NumericOverflow(u32::MAX)), AsciiNumber::new(u32::MAX));
        }

        #[test]
        fn malformed() {
            for bytes in [b"0017a", b"_____", b" 1234", b"12.45"] {
                let payload = Payload::new(*bytes).unwrap();

                assert_eq!(Err(Error::MalformedNumeric), payload.to_number());
            }
        }
    }
}
