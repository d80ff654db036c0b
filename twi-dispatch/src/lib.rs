//! Command dispatch for TWI slaves.
//!
//! A [`DispatchTable`] maps the command (and sub-command) bytes of an
//! incoming frame to a board-specific [`Handler`], runs it and shapes the
//! single reply frame according to the request's response flag. Commands
//! nobody registered are answered with the unknown-command frame.
//!
//! ```
//! use twi_codec::{command::{self, Mp3}, Frame, Payload, ResponseFlag};
//! use twi_dispatch::{Cancellation, DispatchTable, HandlerError, Outcome, Reply};
//!
//! let mut stop = |_: &Payload, _: ResponseFlag, _: &Cancellation| -> Result<Outcome, HandlerError> {
//!     Ok(Outcome::Done)
//! };
//!
//! let cancel = Cancellation::new();
//! let mut table = DispatchTable::<'_, 8>::new();
//! table.register(command::MP3, Some(Mp3::Stop.byte()), &mut stop).unwrap();
//!
//! let request = Frame::new(command::MP3, Mp3::Stop.byte(), Payload::BLANK, ResponseFlag::NotRequired);
//! assert_eq!(Reply::Echo(request), table.dispatch(&request, &cancel));
//! ```

#![no_std]

// must come first so the logging macros are in scope everywhere
mod fmt;

pub mod cancel;
pub mod handler;
pub mod response;
pub mod table;

pub use cancel::Cancellation;
pub use error::HandlerError;
pub use handler::{Handler, Outcome};
pub use response::{verify, Acknowledgement, Reply, Transaction};
pub use table::DispatchTable;

pub mod error {
    /// Returned by [`Cancellation::checkpoint`](crate::Cancellation::checkpoint)
    /// once a cancel was signalled.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct Cancelled;

    /// Why a handler did not complete.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum HandlerError {
        /// The request payload did not decode, e.g. a track number with a
        /// non-digit in it.
        Codec(twi_codec::error::Error),
        /// The operation stopped at a checkpoint.
        Cancelled,
    }

    impl From<twi_codec::error::Error> for HandlerError {
        fn from(value: twi_codec::error::Error) -> Self {
            Self::Codec(value)
        }
    }

    impl From<Cancelled> for HandlerError {
        fn from(_: Cancelled) -> Self {
            Self::Cancelled
        }
    }

    /// Registration failures. The table is left unchanged.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum Register {
        /// Every slot of the table is taken.
        Full,
        /// The command byte is a protocol signal (cancel or unknown).
        Reserved(u8),
        /// Another handler already answers for this pair.
        Duplicate {
            command: u8,
            subcommand: Option<u8>,
        },
    }

    /// A reply the master cannot accept for the request it sent.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum Mismatch {
        /// The echo differs from the request.
        Echo,
        /// The distinct reply is for another command or sub-command.
        Reply,
        /// The reply itself asks for a response.
        Looping,
    }
}
