use embedded_io_async::{BufRead, ErrorType, Write};
use twi_codec::{Frame, FRAME_LEN};
use twi_dispatch::{Cancellation, DispatchTable, Reply};

use crate::{
    frame_buffer::{error::Overflow, FrameBuffer},
    Error,
};

type PortError<Port> = Error<<Port as ErrorType>::Error>;

/// Serves requests arriving on `port`, buffering up to `N` bytes of
/// partially received frames.
///
/// Handlers run inside [`serve`](Self::serve), so the port is not read while
/// one is busy. To cancel a running handler, the receive interrupt passes
/// each completed bus write to [`Cancellation::observe_bytes`] as well.
pub struct Slave<Port, const N: usize>
where
    Port: BufRead + Write,
{
    port: Port,
    frames: FrameBuffer<N>,
}

impl<Port, const N: usize> Slave<Port, N>
where
    Port: BufRead + Write,
{
    pub const fn new(port: Port) -> Self {
        Self {
            port,
            frames: FrameBuffer::new(),
        }
    }

    /// Give the port back.
    pub fn release(self) -> Port {
        self.port
    }

    /// Move whatever the port has ready into the frame buffer.
    async fn poll(&mut self) -> Result<(), PortError<Port>> {
        let available = self.port.fill_buf().await.map_err(Error::Bus)?;

        if available.is_empty() {
            return Err(Error::Closed);
        }

        let accepted = match self.frames.ingest(available) {
            Ok(()) => available.len(),
            Err(Overflow { accepted }) => accepted,
        };

        trace!("ingested {} bytes", accepted);
        self.port.consume(accepted);

        Ok(())
    }

    /// Wait for the next frame that decodes.
    ///
    /// When the oldest eight bytes do not decode, one byte is dropped and
    /// decoding is tried again on the next eight. A truncated or stray write
    /// therefore costs only its own bytes and a resent frame is still
    /// found. Nothing is sent back for dropped bytes.
    pub async fn receive(&mut self) -> Result<Frame, PortError<Port>> {
        loop {
            while let Some(bytes) = self.frames.peek_frame() {
                match Frame::from_bytes(&bytes) {
                    Ok(frame) => {
                        self.frames.discard(FRAME_LEN);
                        return Ok(frame);
                    }
                    Err(e) => {
                        debug!("no frame boundary here ({:?}), skipping a byte", e);
                        self.frames.discard(1);
                    }
                }
            }

            self.poll().await?;
        }
    }

    async fn send(&mut self, frame: &Frame) -> Result<(), PortError<Port>> {
        let bytes = frame.to_bytes()?;

        self.port.write_all(&bytes).await.map_err(Error::Bus)?;
        self.port.flush().await.map_err(Error::Bus)?;

        Ok(())
    }

    /// Handle exactly one request: receive it, dispatch it through `table`
    /// and transmit the reply, if there is one.
    pub async fn serve<const K: usize>(
        &mut self,
        table: &mut DispatchTable<'_, K>,
        cancel: &Cancellation,
    ) -> Result<Reply, PortError<Port>> {
        let request = self.receive().await?;
        let reply = table.dispatch(&request, cancel);

        match reply.frame() {
            Some(frame) => self.send(frame).await?,
            None => debug!("handler aborted, no reply sent"),
        }

        Ok(reply)
    }

    /// Serve requests until the port closes or fails.
    pub async fn run<const K: usize>(
        &mut self,
        table: &mut DispatchTable<'_, K>,
        cancel: &Cancellation,
    ) -> PortError<Port> {
        loop {
            match self.serve(table, cancel).await {
                Ok(_) => {}
                Err(Error::Codec(e)) => warn!("reply could not be encoded: {:?}", e),
                Err(e) => break e,
            }
        }
    }
}
