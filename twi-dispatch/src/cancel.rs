//! Cooperative cancellation of long-running handlers.
//!
//! A cancel frame may arrive while a handler is still busy, typically
//! picked up by the receive interrupt. The interrupt raises the flag with
//! [`Cancellation::observe`] or [`Cancellation::signal_cancel`] and the
//! handler notices at its next [`checkpoint`](Cancellation::checkpoint).
//!
//! ```
//! use twi_dispatch::Cancellation;
//!
//! static CANCEL: Cancellation = Cancellation::new();
//!
//! CANCEL.signal_cancel();
//! assert!(CANCEL.checkpoint().is_err());
//! ```

use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};
use twi_codec::Frame;

use crate::error::Cancelled;

/// The process-wide cancel flag.
///
/// Written by whoever receives the cancel frame, read by the handler that
/// is currently executing.
pub struct Cancellation {
    signal: Signal<CriticalSectionRawMutex, ()>,
}

impl Cancellation {
    pub const fn new() -> Self {
        Self {
            signal: Signal::new(),
        }
    }

    /// Ask the running handler to stop at its next checkpoint.
    pub fn signal_cancel(&self) {
        trace!("cancel signalled");

        self.signal.signal(());
    }

    /// Raise the flag if `frame` is a cancel frame.
    ///
    /// Returns whether it was.
    pub fn observe(&self, frame: &Frame) -> bool {
        let cancel = frame.is_cancel();

        if cancel {
            self.signal_cancel();
        }

        cancel
    }

    /// Raise the flag if `bytes` hold a cancel frame.
    ///
    /// This is the hook for the receive interrupt: while a handler runs the
    /// slave's frame loop is busy, so the interrupt hands each completed bus
    /// write here before queueing it. Anything that does not decode is left
    /// to the frame loop.
    pub fn observe_bytes(&self, bytes: &[u8]) -> bool {
        Frame::from_bytes(bytes).map_or(false, |frame| self.observe(&frame))
    }

    pub fn is_cancelled(&self) -> bool {
        self.signal.signaled()
    }

    /// Lower the flag before a new request starts.
    pub fn reset(&self) {
        self.signal.reset();
    }

    /// Handlers call this between steps of a long operation.
    ///
    /// ```ignore
    /// for step in 0..steps {
    ///     cancel.checkpoint()?;
    ///     motor.step();
    /// }
    /// ```
    pub fn checkpoint(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            debug!("handler reached checkpoint after cancel");
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}

impl Default for Cancellation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use twi_codec::{Payload, ResponseFlag};

    #[test]
    fn starts_clear() {
        let cancel = Cancellation::new();

        assert!(!cancel.is_cancelled());
        assert_eq!(Ok(()), cancel.checkpoint());
    }

    #[test]
    fn signal_and_reset() {
        let cancel = Cancellation::new();

        cancel.signal_cancel();
        assert!(cancel.is_cancelled());
        assert_eq!(Err(Cancelled), cancel.checkpoint());

        // checking does not consume the flag
        assert_eq!(Err(Cancelled), cancel.checkpoint());

        cancel.reset();
        assert_eq!(Ok(()), cancel.checkpoint());
    }

    #[test]
    fn observe_only_reacts_to_cancel_frames() {
        let cancel = Cancellation::new();
        let other = Frame::new(b'B', b'A', Payload::BLANK, ResponseFlag::NotRequired);

        assert!(!cancel.observe(&other));
        assert!(!cancel.is_cancelled());

        assert!(cancel.observe(&Frame::cancel()));
        assert!(cancel.is_cancelled());
    }

    #[test]
    fn observe_raw_bytes() {
        let cancel = Cancellation::new();

        assert!(!cancel.observe_bytes(b"BD_____F"));
        assert!(!cancel.observe_bytes(b"X______"));
        assert!(!cancel.observe_bytes(b"X__\x00___F"));
        assert!(!cancel.is_cancelled());

        assert!(cancel.observe_bytes(b"X______F"));
        assert!(cancel.is_cancelled());
    }

    #[test]
    fn shared_as_static() {
        static CANCEL: Cancellation = Cancellation::new();

        CANCEL.signal_cancel();
        assert!(CANCEL.is_cancelled());
        CANCEL.reset();
        assert!(!CANCEL.is_cancelled());
    }
}
