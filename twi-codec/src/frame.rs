use crate::{
    command,
    encoding::{
        twi::{self, Twi, BLANK, FALSE, TRUE},
        Encoding,
    },
    error,
    payload::{Payload, PAYLOAD_LEN},
    SerializeBuf, SerializeIter,
};

/// Every frame on the bus is exactly this many bytes.
pub const FRAME_LEN: usize = 8;

/// Byte 7 of a frame.
///
/// Tells the receiver whether it owes the sender a distinct reply or only
/// the echo that acknowledges receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResponseFlag {
    /// Echo the request verbatim once the command has been carried out.
    #[default]
    NotRequired,
    /// Reply with a new frame carrying the handler's result.
    Required,
}

impl ResponseFlag {
    #[inline]
    pub const fn is_required(self) -> bool {
        matches!(self, Self::Required)
    }
}

impl From<bool> for ResponseFlag {
    fn from(required: bool) -> Self {
        if required {
            Self::Required
        } else {
            Self::NotRequired
        }
    }
}

impl SerializeIter for ResponseFlag {
    fn serialize_iter<'a>(
        &self,
        dst: impl IntoIterator<Item = &'a mut <Twi as Encoding>::Word>,
    ) -> Result<(), error::Error>
    where
        <Twi as Encoding>::Word: 'a,
    {
        self.is_required().serialize_iter(dst)
    }

    fn deserialize_iter<'a>(
        src: impl IntoIterator<Item = &'a <Twi as Encoding>::Word>,
    ) -> Result<Self, error::Error>
    where
        <Twi as Encoding>::Word: 'a,
    {
        match *src.into_iter().next().ok_or(error::EndOfInput)? {
            TRUE => Ok(Self::Required),
            FALSE => Ok(Self::NotRequired),
            other => Err(error::Error::InvalidResponseFlag(other)),
        }
    }
}

impl SerializeBuf for ResponseFlag {
    const SIZE: usize = 1;
    type Serialized = [u8; 1];
}

/// One command or reply, as laid out on the wire.
///
/// | byte | field |
/// |------|-------|
/// | 0    | `command` |
/// | 1    | `subcommand` |
/// | 2..7 | `payload` |
/// | 7    | `response` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, twi::SerializeIter, twi::SerializeBuf)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    pub command: u8,
    pub subcommand: u8,
    pub payload: Payload,
    pub response: ResponseFlag,
}

const _: () = assert!(<Frame as SerializeBuf>::SIZE == FRAME_LEN);

impl Frame {
    pub const fn new(command: u8, subcommand: u8, payload: Payload, response: ResponseFlag) -> Self {
        Self {
            command,
            subcommand,
            payload,
            response,
        }
    }

    /// The reply to any command the receiver does not know.
    pub const fn unknown() -> Self {
        Self::new(command::UNKNOWN, BLANK, Payload::BLANK, ResponseFlag::NotRequired)
    }

    /// Abort whatever long-running operation the receiver is busy with.
    pub const fn cancel() -> Self {
        Self::new(command::CANCEL, BLANK, Payload::BLANK, ResponseFlag::NotRequired)
    }

    #[inline]
    pub const fn is_cancel(&self) -> bool {
        self.command == command::CANCEL
    }

    #[inline]
    pub const fn is_unknown(&self) -> bool {
        self.command == command::UNKNOWN
    }

    /// Build the distinct reply to this frame.
    ///
    /// The reply keeps the command and sub-command and never asks for a
    /// response of its own.
    pub const fn reply(&self, payload: Payload) -> Self {
        Self::new(self.command, self.subcommand, payload, ResponseFlag::NotRequired)
    }

    /// Render the frame to its wire bytes.
    pub fn to_bytes(&self) -> Result<[u8; FRAME_LEN], error::Error> {
        self.serialize_buf()
    }

    /// Parse wire bytes, which must be exactly [`FRAME_LEN`] long.
    pub fn from_bytes(src: &[u8]) -> Result<Self, error::Error> {
        if src.len() != FRAME_LEN {
            Err(error::Error::FrameLength(src.len()))?
        }

        Self::deserialize_iter(src)
    }
}

/// Encode the parts of a frame straight to wire bytes.
pub fn encode(
    command: u8,
    subcommand: u8,
    payload: [u8; PAYLOAD_LEN],
    response: ResponseFlag,
) -> Result<[u8; FRAME_LEN], error::Error> {
    Frame::new(command, subcommand, Payload::new(payload)?, response).to_bytes()
}

/// Decode wire bytes into a frame.
pub fn decode(src: &[u8]) -> Result<Frame, error::Error> {
    Frame::from_bytes(src)
}
