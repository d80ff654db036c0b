//! Drivers that put TWI frames on an actual bus.
//!
//! [`Master`] sends requests to a slave over an async I2C peripheral and
//! checks the reply. [`Slave`] reads frames from a byte port, dispatches them
//! through a [`DispatchTable`](twi_dispatch::DispatchTable) and writes the
//! reply back. [`address`] knows which board lives where.

#![no_std]

// must come first so the logging macros are in scope everywhere
mod fmt;

pub mod address;
pub mod frame_buffer;
pub mod master;
pub mod slave;

pub use address::{classify, Class, Registry};
pub use frame_buffer::FrameBuffer;
pub use master::{Config, Master};
pub use slave::Slave;

use twi_dispatch::error::Mismatch;

/// Anything that can go wrong while moving a frame across the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The peripheral or port failed.
    Bus(E),
    /// A frame could not be encoded or the reply could not be decoded.
    Codec(twi_codec::error::Error),
    /// No reply arrived within the configured timeout.
    Timeout,
    /// The reply does not belong to the request.
    Mismatch(Mismatch),
    /// The target is not a slave address.
    Address(u8),
    /// The port reached the end of its input.
    Closed,
}

impl<E> From<twi_codec::error::Error> for Error<E> {
    fn from(value: twi_codec::error::Error) -> Self {
        Self::Codec(value)
    }
}

impl<E> From<Mismatch> for Error<E> {
    fn from(value: Mismatch) -> Self {
        Self::Mismatch(value)
    }
}
