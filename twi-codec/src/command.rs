//! Command bytes and the sub-commands of each board domain.
//!
//! New boards append a domain here without disturbing the existing ones.
//! Each domain owns the whole sub-command byte space below its command.

use crate::{encoding::twi, error, frame::ResponseFlag, payload::Payload, SerializeBuf};

/// Abort a long-running operation. Flat: no sub-commands, blank payload.
pub const CANCEL: u8 = b'X';
/// Sent back by a receiver that does not understand a command.
pub const UNKNOWN: u8 = b'?';
/// Remote control of the TVT board. No sub-commands are defined yet.
pub const TVT: u8 = b'A';
/// Remote control of the mp3 module.
pub const MP3: u8 = b'B';

/// What a payload is expected to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Shape {
    /// Every byte blank.
    Blank,
    /// A boolean symbol in byte 0, the rest blank.
    Boolean,
    /// Five ASCII digits.
    Number,
}

impl Shape {
    /// Check that `payload` has this shape.
    pub fn check(self, payload: &Payload) -> Result<(), error::Error> {
        match self {
            Self::Blank if payload.is_blank() => Ok(()),
            Self::Blank => Err(error::Error::Invalid),
            Self::Boolean => {
                let value = payload.to_bool()?;

                if *payload == Payload::from_bool(value) {
                    Ok(())
                } else {
                    Err(error::Error::Invalid)
                }
            }
            Self::Number => payload.to_number().map(|_| ()),
        }
    }
}

/// Sub-commands of the [`MP3`] domain, carried in byte 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, twi::SerializeIter, twi::SerializeBuf)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Mp3 {
    Rewind = b'A',
    Previous,
    PlayPause,
    Stop,
    Next,
    FastForward,
    VolumeUp,
    VolumeDown,
    /// Skip to the track number held in the payload.
    PlayTrack,
    /// Ask whether a track is playing. Expects a boolean reply.
    IsPlaying,
    SetVolume,
}

impl Mp3 {
    pub const ALL: [Self; 11] = [
        Self::Rewind,
        Self::Previous,
        Self::PlayPause,
        Self::Stop,
        Self::Next,
        Self::FastForward,
        Self::VolumeUp,
        Self::VolumeDown,
        Self::PlayTrack,
        Self::IsPlaying,
        Self::SetVolume,
    ];

    /// The sub-command byte.
    #[inline]
    pub const fn byte(self) -> u8 {
        self as u8
    }

    pub fn from_byte(byte: u8) -> Result<Self, error::Error> {
        Self::deserialize_buf(&[byte])
    }

    /// Shape of the payload a request carries.
    pub const fn request(self) -> Shape {
        match self {
            Self::PlayTrack => Shape::Number,
            _ => Shape::Blank,
        }
    }

    /// Shape of the payload in the distinct reply, for sub-commands that
    /// expect one.
    pub const fn reply(self) -> Option<Shape> {
        match self {
            Self::IsPlaying => Some(Shape::Boolean),
            _ => None,
        }
    }

    /// Check an incoming request for this sub-command.
    ///
    /// The payload must have the [`request`](Self::request) shape, and
    /// sub-commands that answer with data must be asked for a response.
    pub fn check_request(self, payload: &Payload, response: ResponseFlag) -> Result<(), error::Error> {
        self.request().check(payload)?;

        if self.reply().is_some() && !response.is_required() {
            Err(error::Error::Invalid)?
        }

        Ok(())
    }
}

impl From<Mp3> for u8 {
    fn from(subcommand: Mp3) -> Self {
        subcommand.byte()
    }
}

impl TryFrom<u8> for Mp3 {
    type Error = error::Error;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Self::from_byte(byte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::Error, frame::ResponseFlag, Frame};

    #[test]
    fn domains_are_distinct() {
        let commands = [CANCEL, UNKNOWN, TVT, MP3];

        for (i, a) in commands.iter().enumerate() {
            for b in &commands[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    mod mp3 {
        use super::*;

        #[test]
        fn bytes_count_up_from_a() {
            for (subcommand, byte) in Mp3::ALL.iter().zip(b'A'..) {
                assert_eq!(byte, subcommand.byte());
                assert_eq!([byte], subcommand.serialize_buf().unwrap());
                assert_eq!(Ok(*subcommand), Mp3::try_from(byte));
            }

            assert_eq!(b'I', u8::from(Mp3::PlayTrack));
            assert_eq!(b'J', u8::from(Mp3::IsPlaying));
        }

        #[test]
        fn unit_enum_is_one_tag_wide() {
            assert_eq!(1, <Mp3 as SerializeBuf>::SIZE);
            assert_eq!(1, core::mem::size_of::<<Mp3 as SerializeBuf>::Serialized>());
        }

        #[test]
        fn unknown_bytes() {
            assert_eq!(Err(Error::Invalid), Mp3::from_byte(b'L'));
            assert_eq!(Err(Error::Invalid), Mp3::from_byte(b'@'));
            assert_eq!(Err(Error::Invalid), Mp3::from_byte(b'_'));
        }

        #[test]
        fn play_track_frame() {
            let frame = Frame::new(
                MP3,
                Mp3::PlayTrack.byte(),
                Payload::from_number(172).unwrap(),
                ResponseFlag::NotRequired,
            );

            assert_eq!(*b"BI00172F", frame.to_bytes().unwrap());
            assert!(Mp3::PlayTrack.request().check(&frame.payload).is_ok());
        }

        #[test]
        fn request_checks() {
            let track = Payload::from_number(7).unwrap();

            assert!(Mp3::PlayTrack
                .check_request(&track, ResponseFlag::NotRequired)
                .is_ok());
            assert_eq!(
                Err(Error::MalformedNumeric),
                Mp3::PlayTrack.check_request(&Payload::BLANK, ResponseFlag::NotRequired)
            );

            assert!(Mp3::IsPlaying
                .check_request(&Payload::BLANK, ResponseFlag::Required)
                .is_ok());
            assert_eq!(
                Err(Error::Invalid),
                Mp3::IsPlaying.check_request(&Payload::BLANK, ResponseFlag::NotRequired)
            );

            assert!(Mp3::Stop
                .check_request(&Payload::BLANK, ResponseFlag::Required)
                .is_ok());
            assert_eq!(
                Err(Error::Invalid),
                Mp3::Stop.check_request(&track, ResponseFlag::NotRequired)
            );
        }

        #[test]
        fn is_playing_shapes() {
            assert_eq!(Shape::Blank, Mp3::IsPlaying.request());
            assert_eq!(Some(Shape::Boolean), Mp3::IsPlaying.reply());
            assert_eq!(None, Mp3::Stop.reply());
        }
    }

    mod shapes {
        use super::*;

        #[test]
        fn blank() {
            assert!(Shape::Blank.check(&Payload::BLANK).is_ok());
            assert_eq!(Err(Error::Invalid), Shape::Blank.check(&Payload::from_bool(true)));
        }

        #[test]
        fn boolean() {
            assert!(Shape::Boolean.check(&Payload::from_bool(false)).is_ok());
            assert_eq!(
                Err(Error::Invalid),
                Shape::Boolean.check(&Payload::new(*b"TT___").unwrap())
            );
            assert_eq!(Err(Error::Invalid), Shape::Boolean.check(&Payload::BLANK));
        }

        #[test]
        fn number() {
            assert!(Shape::Number.check(&Payload::from_number(42).unwrap()).is_ok());
            assert_eq!(Err(Error::MalformedNumeric), Shape::Number.check(&Payload::BLANK));
        }
    }
}
