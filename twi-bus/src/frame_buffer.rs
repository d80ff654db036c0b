use heapless::Deque;
use twi_codec::FRAME_LEN;

pub mod error {
    /// The buffer filled up before every byte was taken in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct Overflow {
        /// How many bytes were taken in before the buffer was full.
        pub accepted: usize,
    }
}

/// Accumulates bytes as they arrive from the port and hands them out in
/// whole frames.
///
/// A read from the port may return part of a frame, or the tail of one frame
/// and the head of the next. Bytes stay here until a full frame is present.
pub struct FrameBuffer<const N: usize> {
    bytes: Deque<u8, N>,
}

impl<const N: usize> Default for FrameBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> FrameBuffer<N> {
    const HOLDS_A_FRAME: () = assert!(N >= FRAME_LEN, "buffer cannot hold a single frame");

    pub const fn new() -> Self {
        let () = Self::HOLDS_A_FRAME;

        Self {
            bytes: Deque::new(),
        }
    }

    /// Ingest incoming partial frame bytes.
    pub fn ingest<'a>(
        &mut self,
        src: impl IntoIterator<Item = &'a u8>,
    ) -> Result<(), error::Overflow> {
        let mut accepted = 0;

        for &byte in src {
            self.bytes
                .push_back(byte)
                .map_err(|_| error::Overflow { accepted })?;
            accepted += 1;
        }

        Ok(())
    }

    /// Copy out the oldest [`FRAME_LEN`] bytes without removing them.
    pub fn peek_frame(&self) -> Option<[u8; FRAME_LEN]> {
        if self.len() < FRAME_LEN {
            return None;
        }

        let mut frame = [0; FRAME_LEN];

        frame
            .iter_mut()
            .zip(self.bytes.iter())
            .for_each(|(slot, &byte)| *slot = byte);

        Some(frame)
    }

    /// Take the oldest complete frame, if one has arrived.
    pub fn next_frame(&mut self) -> Option<[u8; FRAME_LEN]> {
        let frame = self.peek_frame()?;
        self.discard(FRAME_LEN);

        Some(frame)
    }

    /// Drop up to `count` of the oldest bytes.
    ///
    /// Dropping a single byte after a failed decode moves the frame window
    /// along the stream until it lines up with a frame boundary again.
    pub fn discard(&mut self, count: usize) {
        for _ in 0..count {
            if self.bytes.pop_front().is_none() {
                break;
            }
        }
    }

    /// Drop everything, including a partially received frame.
    #[inline]
    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    /// Get the capacity (maximum length) of the buffer.
    #[inline]
    pub fn capacity(&self) -> usize {
        N
    }

    /// Get the current length of the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// How many more bytes fit.
    #[inline]
    pub fn free(&self) -> usize {
        self.capacity() - self.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STOP: [u8; FRAME_LEN] = *b"BD_____F";
    const IS_PLAYING: [u8; FRAME_LEN] = *b"BJ_____T";

    mod ingestion {
        use super::*;

        #[test]
        fn basic() {
            let mut buf = FrameBuffer::<16>::new();

            buf.ingest(STOP.iter()).unwrap();

            assert_eq!(FRAME_LEN, buf.len());
            assert_eq!(Some(STOP), buf.next_frame());
            assert!(buf.is_empty());
            assert_eq!(None, buf.next_frame());
        }

        #[test]
        fn partial() {
            let mut buf = FrameBuffer::<16>::new();

            buf.ingest(STOP[..3].iter()).unwrap();
            assert_eq!(None, buf.next_frame());
            assert_eq!(3, buf.len());

            buf.ingest(STOP[3..7].iter()).unwrap();
            assert_eq!(None, buf.next_frame());

            buf.ingest(STOP[7..].iter()).unwrap();
            assert_eq!(Some(STOP), buf.next_frame());
        }

        #[test]
        fn straddling() {
            let mut buf = FrameBuffer::<16>::new();

            // tail of one frame and head of the next in a single read
            buf.ingest(STOP[..5].iter()).unwrap();
            buf.ingest(STOP[5..].iter().chain(&IS_PLAYING[..2])).unwrap();

            assert_eq!(Some(STOP), buf.next_frame());
            assert_eq!(None, buf.next_frame());

            buf.ingest(IS_PLAYING[2..].iter()).unwrap();
            assert_eq!(Some(IS_PLAYING), buf.next_frame());
        }

        #[test]
        fn overflow() {
            let mut buf = FrameBuffer::<8>::new();

            let src = [0xde, 0xad, 0xbe, 0xef, 0x15, 0xba, 0xdb, 0xad, 0xf0, 0x0d];

            assert_eq!(
                Err(error::Overflow { accepted: 8 }),
                buf.ingest(src.iter())
            );
            assert_eq!(buf.len(), buf.capacity());
            assert_eq!(0, buf.free());
        }
    }

    mod window {
        use super::*;

        #[test]
        fn peek_leaves_bytes_in_place() {
            let mut buf = FrameBuffer::<16>::new();

            buf.ingest(STOP[..7].iter()).unwrap();
            assert_eq!(None, buf.peek_frame());

            buf.ingest(STOP[7..].iter()).unwrap();
            assert_eq!(Some(STOP), buf.peek_frame());
            assert_eq!(FRAME_LEN, buf.len());
            assert_eq!(Some(STOP), buf.next_frame());
        }

        #[test]
        fn slide_by_one() {
            let mut buf = FrameBuffer::<16>::new();

            // a stray byte ahead of a whole frame
            buf.ingest([b'?'].iter().chain(IS_PLAYING.iter())).unwrap();
            assert_ne!(Some(IS_PLAYING), buf.peek_frame());

            buf.discard(1);
            assert_eq!(Some(IS_PLAYING), buf.next_frame());
        }

        #[test]
        fn discard_past_end() {
            let mut buf = FrameBuffer::<16>::new();

            buf.ingest(STOP[..3].iter()).unwrap();
            buf.discard(10);

            assert!(buf.is_empty());
        }
    }

    mod cycle {
        use super::*;

        #[test]
        fn wraps_around() {
            let mut buf = FrameBuffer::<10>::new();

            for _ in 0..10 {
                buf.ingest(IS_PLAYING.iter()).unwrap();

                assert_eq!(Some(IS_PLAYING), buf.next_frame());
                assert_eq!(0, buf.len());
            }
        }

        #[test]
        fn clear() {
            let mut buf = FrameBuffer::<10>::new();

            buf.ingest(STOP[..6].iter()).unwrap();
            buf.clear();

            assert!(buf.is_empty());
            assert_eq!(10, buf.free());

            buf.ingest(IS_PLAYING.iter()).unwrap();
            assert_eq!(Some(IS_PLAYING), buf.next_frame());
        }
    }
}
