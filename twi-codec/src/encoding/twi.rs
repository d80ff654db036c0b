use super::Encoding;

use crate::{error, SerializeBuf, SerializeIter};

// export proc macro
pub use macros::{SerializeBuf, SerializeIter};

/// End of transmission, reserved by the transport.
pub const END_OF_TRANSMISSION: u8 = 0x00;
/// Read when a slave had nothing to send, reserved by the transport.
pub const NO_DATA: u8 = 0xff;

/// Boolean true on the wire.
pub const TRUE: u8 = b'T';
/// Boolean false on the wire.
pub const FALSE: u8 = b'F';
/// Filler for payload slots that carry nothing.
pub const BLANK: u8 = b'_';

/// The byte-oriented encoding spoken on the TWI bus.
///
/// Words are plain bytes, but `0x00` and `0xff` belong to the transport,
/// so booleans and empty slots use printable symbols instead.
pub struct Twi;
impl Encoding for Twi {
    type Word = u8;

    const RESERVED: &'static [u8] = &[END_OF_TRANSMISSION, NO_DATA];
}

/// The wire symbol for a boolean.
#[inline]
pub const fn bool_symbol(value: bool) -> u8 {
    if value {
        TRUE
    } else {
        FALSE
    }
}

// raw bytes: command and sub-command selectors take any value

impl SerializeIter for u8 {
    fn serialize_iter<'a>(
        &self,
        dst: impl IntoIterator<Item = &'a mut <Twi as Encoding>::Word>,
    ) -> Result<(), error::Error>
    where
        <Twi as Encoding>::Word: 'a,
    {
        *dst.into_iter().next().ok_or(error::EndOfInput)? = *self;

        Ok(())
    }

    fn deserialize_iter<'a>(
        src: impl IntoIterator<Item = &'a <Twi as Encoding>::Word>,
    ) -> Result<Self, error::Error>
    where
        <Twi as Encoding>::Word: 'a,
    {
        Ok(*src.into_iter().next().ok_or(error::EndOfInput)?)
    }
}

impl SerializeBuf for u8 {
    const SIZE: usize = 1;
    type Serialized = [u8; 1];
}

// booleans travel as symbols, never as 0/1

impl SerializeIter for bool {
    fn serialize_iter<'a>(
        &self,
        dst: impl IntoIterator<Item = &'a mut <Twi as Encoding>::Word>,
    ) -> Result<(), error::Error>
    where
        <Twi as Encoding>::Word: 'a,
    {
        *dst.into_iter().next().ok_or(error::EndOfInput)? = bool_symbol(*self);

        Ok(())
    }

    fn deserialize_iter<'a>(
        src: impl IntoIterator<Item = &'a <Twi as Encoding>::Word>,
    ) -> Result<Self, error::Error>
    where
        <Twi as Encoding>::Word: 'a,
    {
        match *src.into_iter().next().ok_or(error::EndOfInput)? {
            TRUE => Ok(true),
            FALSE => Ok(false),
            _ => Err(error::Invalid)?,
        }
    }
}

impl SerializeBuf for bool {
    const SIZE: usize = 1;
    type Serialized = [u8; 1];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn reserved_words() {
        assert!(Twi::is_reserved(&0x00));
        assert!(Twi::is_reserved(&0xff));

        for symbol in [TRUE, FALSE, BLANK] {
            assert!(!Twi::is_reserved(&symbol));
        }
    }

    mod primitives {
        use super::*;

        #[test]
        fn bytes_pass_through() {
            let mut buf = [0; 1];

            for byte in 0..=u8::MAX {
                byte.serialize_iter(buf.iter_mut()).unwrap();

                assert_eq!(byte, buf[0]);
                assert_eq!(byte, u8::deserialize_buf(&buf).unwrap());
            }
        }

        #[test]
        fn bool_symbols() {
            assert_eq!([TRUE], true.serialize_buf().unwrap());
            assert_eq!([FALSE], false.serialize_buf().unwrap());

            assert!(bool::deserialize_buf(&[TRUE]).unwrap());
            assert!(!bool::deserialize_buf(&[FALSE]).unwrap());
        }

        #[test]
        fn bool_rejects_other_bytes() {
            for byte in (0..=u8::MAX).filter(|&b| b != TRUE && b != FALSE) {
                assert_eq!(Err(Error::Invalid), bool::deserialize_buf(&[byte]));
            }
        }

        #[test]
        fn empty_medium() {
            let mut buf: [u8; 0] = [];

            assert_eq!(Err(Error::EndOfInput), 7u8.serialize_iter(buf.iter_mut()));
            assert_eq!(Err(Error::EndOfInput), bool::deserialize_iter(buf.iter()));
        }
    }
}
