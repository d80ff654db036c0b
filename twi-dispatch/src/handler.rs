use twi_codec::{Payload, ResponseFlag};

use crate::{cancel::Cancellation, error::HandlerError};

/// What a handler produced for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// The action was carried out, there is no data to report.
    Done,
    /// Data for the distinct reply.
    Reply(Payload),
}

/// The board-side action behind one (command, sub-command) pair.
///
/// Closures with the matching signature are handlers too:
///
/// ```
/// use twi_dispatch::{Cancellation, HandlerError, Outcome};
/// use twi_codec::{Payload, ResponseFlag};
///
/// let mut is_playing = |_: &Payload, _: ResponseFlag, _: &Cancellation| {
///     Ok::<_, HandlerError>(Outcome::Reply(Payload::from_bool(true)))
/// };
/// # let _ = &mut is_playing;
/// ```
pub trait Handler {
    /// Carry out the request.
    ///
    /// `response` says whether the requester wants data back. When it does
    /// not, whatever the handler returns is ignored and the request is
    /// echoed. Long operations should call
    /// [`Cancellation::checkpoint`] between steps and propagate its error.
    fn handle(
        &mut self,
        payload: &Payload,
        response: ResponseFlag,
        cancel: &Cancellation,
    ) -> Result<Outcome, HandlerError>;
}

impl<F> Handler for F
where
    F: FnMut(&Payload, ResponseFlag, &Cancellation) -> Result<Outcome, HandlerError>,
{
    #[inline]
    fn handle(
        &mut self,
        payload: &Payload,
        response: ResponseFlag,
        cancel: &Cancellation,
    ) -> Result<Outcome, HandlerError> {
        self(payload, response, cancel)
    }
}
