//! The echo / distinct-reply acknowledgment scheme.
//!
//! A slave answers every frame it understood with exactly one frame:
//!
//! - the request itself, byte for byte, when the request's response flag is
//!   false (the echo acknowledges receipt and completion),
//! - a new frame with the same command and sub-command, the handler's data
//!   and the response flag forced false, when the flag is true.
//!
//! The master reads that single frame, checks it with [`verify`] and never
//! answers it.

use core::marker::PhantomData;

use twi_codec::{Frame, Payload, ResponseFlag};

use crate::{
    error::{HandlerError, Mismatch},
    handler::Outcome,
};

/// Transaction states.
pub trait State {}

/// Nothing received yet.
pub struct AwaitingRequest;
/// A request was received and handed to its handler.
pub struct Dispatched;

impl State for AwaitingRequest {}
impl State for Dispatched {}

/// One request/reply exchange on the slave side.
///
/// The state lives in the type, so a reply can only be produced once and
/// only after a request was received.
pub struct Transaction<S: State> {
    request: Frame,
    _state: PhantomData<S>,
}

impl Transaction<AwaitingRequest> {
    pub const fn new() -> Self {
        Self {
            request: Frame::unknown(),
            _state: PhantomData,
        }
    }

    pub const fn receive(self, request: Frame) -> Transaction<Dispatched> {
        Transaction {
            request,
            _state: PhantomData,
        }
    }
}

impl Default for Transaction<AwaitingRequest> {
    fn default() -> Self {
        Self::new()
    }
}

impl Transaction<Dispatched> {
    #[inline]
    pub const fn request(&self) -> &Frame {
        &self.request
    }

    /// Finish with the handler's result.
    pub fn complete(self, result: Result<Outcome, HandlerError>) -> Reply {
        let request = self.request;

        match (result, request.response) {
            (Err(HandlerError::Cancelled), _) => Reply::Aborted,
            (Err(HandlerError::Codec(_)), _) => Reply::Unknown(Frame::unknown()),
            (Ok(_), ResponseFlag::NotRequired) => Reply::Echo(request),
            (Ok(Outcome::Done), ResponseFlag::Required) => {
                Reply::Distinct(request.reply(Payload::BLANK))
            }
            (Ok(Outcome::Reply(payload)), ResponseFlag::Required) => {
                Reply::Distinct(request.reply(payload))
            }
        }
    }

    /// Finish without a handler: nobody here knows this command.
    pub fn unknown(self) -> Reply {
        Reply::Unknown(Frame::unknown())
    }
}

/// How a transaction ended on the slave side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reply {
    /// The request, unmodified.
    Echo(Frame),
    /// A new frame carrying the handler's result.
    Distinct(Frame),
    /// The unknown-command frame.
    Unknown(Frame),
    /// The handler was cancelled. Nothing is sent and the master times out.
    Aborted,
}

impl Reply {
    /// The frame to put on the bus, if any.
    pub const fn frame(&self) -> Option<&Frame> {
        match self {
            Self::Echo(frame) | Self::Distinct(frame) | Self::Unknown(frame) => Some(frame),
            Self::Aborted => None,
        }
    }
}

/// What the master learned from a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Acknowledgement {
    /// The slave echoed the request: it was received and carried out.
    Echoed,
    /// The slave answered with data.
    Data(Payload),
    /// The slave does not understand the request.
    Unknown,
}

/// Check a slave's reply against the request the master sent.
pub fn verify(request: &Frame, reply: &Frame) -> Result<Acknowledgement, Mismatch> {
    if reply.is_unknown() && !request.is_unknown() {
        return Ok(Acknowledgement::Unknown);
    }

    if reply.response.is_required() {
        Err(Mismatch::Looping)?
    }

    match request.response {
        ResponseFlag::NotRequired if reply == request => Ok(Acknowledgement::Echoed),
        ResponseFlag::NotRequired => Err(Mismatch::Echo),
        ResponseFlag::Required
            if reply.command == request.command && reply.subcommand == request.subcommand =>
        {
            Ok(Acknowledgement::Data(reply.payload))
        }
        ResponseFlag::Required => Err(Mismatch::Reply),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use twi_codec::{command, error::Error};

    fn request(response: ResponseFlag) -> Frame {
        Frame::new(command::MP3, b'J', Payload::BLANK, response)
    }

    mod slave {
        use super::*;

        #[test]
        fn echo_ignores_handler_data() {
            let request = request(ResponseFlag::NotRequired);

            for result in [
                Ok(Outcome::Done),
                Ok(Outcome::Reply(Payload::from_bool(true))),
            ] {
                let reply = Transaction::new().receive(request).complete(result);

                assert_eq!(Reply::Echo(request), reply);
            }
        }

        #[test]
        fn distinct_reply() {
            let request = request(ResponseFlag::Required);
            let transaction = Transaction::new().receive(request);

            assert_eq!(&request, transaction.request());

            let reply = transaction.complete(Ok(Outcome::Reply(Payload::from_bool(false))));
            let frame = reply.frame().unwrap();

            assert!(matches!(reply, Reply::Distinct(_)));
            assert_eq!(request.command, frame.command);
            assert_eq!(request.subcommand, frame.subcommand);
            assert_eq!(ResponseFlag::NotRequired, frame.response);
            assert_eq!(Ok(false), frame.payload.to_bool());
        }

        #[test]
        fn failures() {
            for response in [ResponseFlag::NotRequired, ResponseFlag::Required] {
                let request = request(response);

                assert_eq!(
                    Reply::Aborted,
                    Transaction::new()
                        .receive(request)
                        .complete(Err(HandlerError::Cancelled))
                );
                assert_eq!(
                    Reply::Unknown(Frame::unknown()),
                    Transaction::new()
                        .receive(request)
                        .complete(Err(HandlerError::Codec(Error::MalformedNumeric)))
                );
                assert_eq!(
                    Reply::Unknown(Frame::unknown()),
                    Transaction::new().receive(request).unknown()
                );
            }

            assert_eq!(None, Reply::Aborted.frame());
        }
    }

    mod master {
        use super::*;

        #[test]
        fn echo() {
            let request = request(ResponseFlag::NotRequired);

            assert_eq!(Ok(Acknowledgement::Echoed), verify(&request, &request));

            let altered = Frame::new(request.command, request.subcommand, Payload::from_bool(true), request.response);
            assert_eq!(Err(Mismatch::Echo), verify(&request, &altered));
        }

        #[test]
        fn data() {
            let request = request(ResponseFlag::Required);
            let reply = request.reply(Payload::from_bool(true));

            assert_eq!(
                Ok(Acknowledgement::Data(Payload::from_bool(true))),
                verify(&request, &reply)
            );

            let wrong = Frame::new(command::MP3, b'I', Payload::BLANK, ResponseFlag::NotRequired);
            assert_eq!(Err(Mismatch::Reply), verify(&request, &wrong));
        }

        #[test]
        fn reply_asking_for_a_reply() {
            let request = request(ResponseFlag::Required);

            // echoing a response-required frame would start a loop
            assert_eq!(Err(Mismatch::Looping), verify(&request, &request));
        }

        #[test]
        fn unknown() {
            for response in [ResponseFlag::NotRequired, ResponseFlag::Required] {
                assert_eq!(
                    Ok(Acknowledgement::Unknown),
                    verify(&request(response), &Frame::unknown())
                );
            }
        }
    }
}
