//! Bus addresses and how the address space is partitioned.
//!
//! | range   | boards |
//! |---------|--------|
//! | 1–10    | masters |
//! | 11–99   | fixed-function wired boards |
//! | 101–189 | wireless sensor and actuator boards |
//! | 190–253 | custom boards, allocated per deployment |
//!
//! 0, 100 and 254–255 are never assigned.

use core::ops::RangeInclusive;

pub mod error {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum Register {
        /// The address lies outside the custom range.
        OutOfRange(u8),
        /// Another board of this deployment already uses the address.
        AlreadyTaken(u8),
    }
}

pub const MASTERS: RangeInclusive<u8> = 1..=10;
pub const WIRED: RangeInclusive<u8> = 11..=99;
pub const WIRELESS: RangeInclusive<u8> = 101..=189;
pub const CUSTOM: RangeInclusive<u8> = 190..=253;

/// The default master.
pub const MASTER: u8 = 1;
/// The mp3 module board.
pub const MP3: u8 = 11;
/// The TVT board on its wired address.
pub const TVT: u8 = 12;
/// Wireless motor control module.
pub const WIRELESS_MOTOR: u8 = 101;
/// Wireless sonic rangefinder module.
pub const WIRELESS_SONIC: u8 = 102;

/// Which part of the address space an address falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Class {
    Master,
    Wired,
    Wireless,
    Custom,
    /// A gap or reserved value that no board may use.
    Invalid,
}

impl Class {
    /// Whether a master may address a board of this class.
    #[inline]
    pub const fn is_slave(self) -> bool {
        matches!(self, Self::Wired | Self::Wireless | Self::Custom)
    }
}

/// Classify an address. Total over every byte value.
pub const fn classify(address: u8) -> Class {
    match address {
        1..=10 => Class::Master,
        11..=99 => Class::Wired,
        101..=189 => Class::Wireless,
        190..=253 => Class::Custom,
        _ => Class::Invalid,
    }
}

/// The custom addresses claimed by the boards of one deployment.
///
/// Append-only: an address, once registered, stays taken. The custom range
/// holds exactly 64 addresses, one bit each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Registry {
    taken: u64,
}

impl Registry {
    pub const fn new() -> Self {
        Self { taken: 0 }
    }

    const fn bit(address: u8) -> u64 {
        1 << (address - *CUSTOM.start())
    }

    /// Claim a custom address.
    pub fn register_custom(&mut self, address: u8) -> Result<(), error::Register> {
        if !matches!(classify(address), Class::Custom) {
            Err(error::Register::OutOfRange(address))?
        }

        if self.is_registered(address) {
            Err(error::Register::AlreadyTaken(address))?
        }

        self.taken |= Self::bit(address);
        debug!("registered custom address {}", address);

        Ok(())
    }

    pub fn is_registered(&self, address: u8) -> bool {
        matches!(classify(address), Class::Custom) && self.taken & Self::bit(address) != 0
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.taken.count_ones() as usize
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.taken == 0
    }

    /// Registered addresses in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        CUSTOM.filter(move |&address| self.is_registered(address))
    }
}
