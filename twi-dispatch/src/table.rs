//! The command dispatch table.
//!
//! Handlers are registered once at startup against a command byte and,
//! for domains with sub-commands, a sub-command byte. A flat registration
//! (no sub-command) owns every sub-command of its command.

use heapless::Vec;
use twi_codec::{
    command::{self, Mp3},
    Frame,
};

use crate::{
    cancel::Cancellation,
    error::{self, HandlerError},
    handler::{Handler, Outcome},
    response::{Reply, Transaction},
};

struct Entry<'a> {
    command: u8,
    subcommand: Option<u8>,
    /// Set for mp3 entries, whose requests are checked before the handler runs.
    mp3: Option<Mp3>,
    handler: &'a mut dyn Handler,
}

impl Entry<'_> {
    fn matches(&self, command: u8, subcommand: u8) -> bool {
        self.command == command && self.subcommand.map_or(true, |s| s == subcommand)
    }

    fn collides(&self, command: u8, subcommand: Option<u8>) -> bool {
        self.command == command
            && match (self.subcommand, subcommand) {
                (Some(a), Some(b)) => a == b,
                _ => true,
            }
    }
}

/// Routes incoming frames to handlers, holding at most `N` registrations.
pub struct DispatchTable<'a, const N: usize> {
    entries: Vec<Entry<'a>, N>,
}

impl<'a, const N: usize> DispatchTable<'a, N> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register `handler` for `command`, either for every sub-command
    /// (`subcommand = None`) or for exactly one.
    ///
    /// The cancel and unknown-command bytes belong to the protocol and
    /// cannot be registered.
    pub fn register(
        &mut self,
        command: u8,
        subcommand: Option<u8>,
        handler: &'a mut dyn Handler,
    ) -> Result<(), error::Register> {
        self.insert(command, subcommand, None, handler)
    }

    /// Register `handler` for one mp3 sub-command.
    ///
    /// Requests are checked with [`Mp3::check_request`] first. One that fails
    /// never reaches the handler and is answered like a payload the handler
    /// could not decode.
    pub fn register_mp3(
        &mut self,
        subcommand: Mp3,
        handler: &'a mut dyn Handler,
    ) -> Result<(), error::Register> {
        self.insert(command::MP3, Some(subcommand.byte()), Some(subcommand), handler)
    }

    fn insert(
        &mut self,
        command: u8,
        subcommand: Option<u8>,
        mp3: Option<Mp3>,
        handler: &'a mut dyn Handler,
    ) -> Result<(), error::Register> {
        if command == command::CANCEL || command == command::UNKNOWN {
            Err(error::Register::Reserved(command))?
        }

        if self
            .entries
            .iter()
            .any(|entry| entry.collides(command, subcommand))
        {
            Err(error::Register::Duplicate {
                command,
                subcommand,
            })?
        }

        self.entries
            .push(Entry {
                command,
                subcommand,
                mp3,
                handler,
            })
            .map_err(|_| error::Register::Full)
    }

    /// Register and hand the table back, for building it in one expression.
    pub fn with(
        mut self,
        command: u8,
        subcommand: Option<u8>,
        handler: &'a mut dyn Handler,
    ) -> Result<Self, error::Register> {
        self.register(command, subcommand, handler)?;

        Ok(self)
    }

    /// Whether a handler exists for this pair.
    pub fn resolves(&self, command: u8, subcommand: u8) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.matches(command, subcommand))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run one transaction: resolve the handler for `request`, execute it and
    /// shape the reply.
    ///
    /// A cancel frame is answered here: it raises `cancel` and is echoed. Any
    /// other request lowers `cancel` first so a stale signal cannot abort it.
    pub fn dispatch(&mut self, request: &Frame, cancel: &Cancellation) -> Reply {
        let transaction = Transaction::new().receive(*request);

        if request.is_cancel() {
            cancel.signal_cancel();
            return transaction.complete(Ok(Outcome::Done));
        }

        cancel.reset();

        let Some(entry) = self
            .entries
            .iter_mut()
            .find(|entry| entry.matches(request.command, request.subcommand))
        else {
            warn!(
                "no handler for command {} sub-command {}",
                request.command,
                request.subcommand
            );
            return transaction.unknown();
        };

        debug!(
            "dispatching command {} sub-command {}",
            request.command,
            request.subcommand
        );

        let result = match entry.mp3 {
            Some(mp3) => mp3
                .check_request(&request.payload, request.response)
                .map_err(HandlerError::from),
            None => Ok(()),
        }
        .and_then(|()| {
            entry
                .handler
                .handle(&request.payload, request.response, cancel)
        });

        if let Err(HandlerError::Codec(_)) = result {
            warn!(
                "handler for command {} rejected its payload",
                request.command
            );
        }

        transaction.complete(result)
    }
}

impl<const N: usize> Default for DispatchTable<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}
