//! The requesting side of a transaction.
//!
//! A master writes an 8-byte request to a slave, reads the single 8-byte
//! reply and checks it against the request. It never answers a reply.

use core::future::Future;

use embassy_futures::select::{select, Either};
use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Receiver};
use embedded_hal_async::{delay::DelayNs, i2c::I2c};
use twi_codec::{Frame, FRAME_LEN};
use twi_dispatch::{verify, Acknowledgement};

use crate::{address::classify, Error};

/// Master settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// How long to wait for the reply before giving up.
    pub timeout_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self { timeout_ms: 100 }
    }
}

pub struct Master<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    i2c: I2C,
    delay: D,
    config: Config,
}

impl<I2C, D> Master<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    pub const fn new(i2c: I2C, delay: D, config: Config) -> Self {
        Self { i2c, delay, config }
    }

    #[inline]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Give the peripherals back.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    /// Send `request` to the slave at `address` and wait for its reply.
    ///
    /// A slave that does not know the command answers with the
    /// unknown-command frame, which is reported as
    /// [`Acknowledgement::Unknown`] rather than an error.
    pub async fn transact(
        &mut self,
        address: u8,
        request: &Frame,
    ) -> Result<Acknowledgement, Error<I2C::Error>> {
        if !classify(address).is_slave() {
            return Err(Error::Address(address));
        }

        let bytes = request.to_bytes()?;
        let mut reply = [0; FRAME_LEN];

        let Self { i2c, delay, config } = self;

        let exchange = async {
            match i2c.write(address, &bytes).await {
                Ok(()) => i2c.read(address, &mut reply).await,
                Err(e) => Err(e),
            }
        };

        match select(exchange, delay.delay_ms(config.timeout_ms)).await {
            Either::First(result) => result.map_err(Error::Bus)?,
            Either::Second(()) => {
                warn!("no reply from {} within {} ms", address, config.timeout_ms);
                return Err(Error::Timeout);
            }
        }

        let reply = Frame::from_bytes(&reply)?;
        let acknowledgement = verify(request, &reply)?;

        trace!("transaction with {} complete", address);

        Ok(acknowledgement)
    }

    /// Ask the slave at `address` to stop whatever it is doing.
    ///
    /// The slave echoes the cancel frame right away. The interrupted
    /// operation itself never replies.
    pub async fn cancel(&mut self, address: u8) -> Result<(), Error<I2C::Error>> {
        debug!("cancelling {}", address);

        self.transact(address, &Frame::cancel()).await.map(|_| ())
    }

    /// Send every request that arrives on `send_queue`, in order, and hand
    /// each result to `on_reply`.
    pub async fn run<'a, M, F, Fut, const K: usize>(
        &mut self,
        send_queue: Receiver<'a, M, (u8, Frame), K>,
        mut on_reply: F,
    ) where
        M: RawMutex,
        F: FnMut(u8, Frame, Result<Acknowledgement, Error<I2C::Error>>) -> Fut,
        Fut: Future<Output = ()>,
    {
        loop {
            let (address, request) = send_queue.receive().await;
            let result = self.transact(address, &request).await;

            on_reply(address, request, result).await;
        }
    }
}
