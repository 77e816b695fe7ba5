use super::cursor::{Deserializer, Serializer};
use super::layout::{WireHeader, FRAME_MAGIC, PIXEL_OFFSET};
use crate::Core::pod::Pod;
use crate::Msg::{DeletionPolicy, MessageWrapper, RoutingHeader, RoutingPolicy};
use crate::Video::Frame;
use crate::error::{FrameError, Result};

/// Flattens a frame message into the wire record and rebuilds it on receipt.
///
/// A record carries one frame: the fixed header, the sidecar block and the raw
/// pixel bytes. Decoding only ever targets an existing frame of the same
/// shape; nothing on the destination is modified unless the whole record
/// validates.
#[derive(Copy, Clone, Debug)]
pub struct FrameCodec {
    check_length: bool,
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self {
            check_length: true, // input must be exactly one record
        }
    }
}

impl FrameCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether decode requires the input length to equal the record length.
    /// When off, trailing bytes after the record are ignored.
    pub fn with_length_check(mut self, check: bool) -> Self {
        self.check_length = check;
        self
    }

    #[inline]
    pub fn checks_length(&self) -> bool {
        self.check_length
    }

    /// Exact record size for `frame`.
    #[inline]
    pub fn encoded_len<P: Pod, M: Pod>(frame: &Frame<P, M>) -> usize {
        PIXEL_OFFSET + frame.byte_size()
    }

    /// Write `msg` into `dst`, returning the record length.
    ///
    /// A too-small `dst` yields [`FrameError::Overflow`]; bytes already
    /// written to `dst` are then meaningless.
    pub fn encode<P, M, R, D>(
        &self,
        msg: &MessageWrapper<Frame<P, M>, R, D>,
        dst: &mut [u8],
    ) -> Result<usize>
    where
        P: Pod,
        M: Pod,
        R: RoutingPolicy,
        D: DeletionPolicy<Frame<P, M>>,
    {
        let frame = msg.payload();
        let shape = frame.shape();
        let mut header = WireHeader::new(msg.msg_class_id().get(), msg.sequence_id(), shape);
        header.set_net_points(msg.net_src(), msg.net_dst());

        let mut ser = Serializer::new(dst);
        header.write(&mut ser);
        frame.sidecar().serialize(&mut ser);
        ser.write_bytes(frame.pixel_bytes());

        ser.finish().map_err(|err| {
            tracing::debug!(error = %err, shape = %shape, "frame encode rejected");
            err
        })
    }

    /// Encode into a freshly allocated buffer of [`FrameCodec::encoded_len`] bytes.
    pub fn encode_to_vec<P, M, R, D>(&self, msg: &MessageWrapper<Frame<P, M>, R, D>) -> Result<Vec<u8>>
    where
        P: Pod,
        M: Pod,
        R: RoutingPolicy,
        D: DeletionPolicy<Frame<P, M>>,
    {
        let mut buf = vec![0u8; Self::encoded_len(msg.payload())];
        let len = self.encode(msg, &mut buf)?;
        buf.truncate(len);
        Ok(buf)
    }

    /// Read and magic-check the fixed header without touching any frame.
    pub fn peek_header(src: &[u8]) -> Result<WireHeader> {
        let header = WireHeader::from_prefix(src).map_err(rejected)?;
        if header.magic() != FRAME_MAGIC {
            return Err(rejected(FrameError::InvalidMagic {
                expected: FRAME_MAGIC,
                found: header.magic(),
            }));
        }
        Ok(header)
    }

    /// Rebuild `msg` from the record in `src`, returning the bytes consumed.
    ///
    /// Restores the routing header, sequence id, sidecar and pixels. The
    /// stream's type tag is not checked: tags are only meaningful inside the
    /// process that assigned them.
    pub fn decode<P, M, R, D>(
        &self,
        msg: &mut MessageWrapper<Frame<P, M>, R, D>,
        src: &[u8],
    ) -> Result<usize>
    where
        P: Pod,
        M: Pod,
        R: RoutingPolicy,
        D: DeletionPolicy<Frame<P, M>>,
    {
        let header = Self::peek_header(src)?;

        let expected = msg.payload().shape();
        let found = header.shape();
        if found != expected {
            return Err(rejected(FrameError::ShapeMismatch { expected, found }));
        }

        let record_len = PIXEL_OFFSET + msg.payload().byte_size();
        if src.len() < record_len {
            return Err(rejected(FrameError::Truncated {
                needed: record_len,
                remaining: src.len(),
            }));
        }
        if self.check_length && src.len() != record_len {
            return Err(rejected(FrameError::LengthMismatch {
                declared: src.len(),
                consumed: record_len,
            }));
        }

        let mut de = Deserializer::new(&src[..record_len]);
        WireHeader::read(&mut de)?;
        msg.payload_mut()
            .sidecar_mut()
            .deserialize(&mut de)
            .map_err(rejected)?;

        msg.set_routing_header(RoutingHeader::new(
            header.net_src(),
            header.net_dst(),
            header.sequence_id(),
        ));

        let frame = msg.payload_mut();
        let pixels = de.read_bytes(frame.byte_size())?;
        frame.pixel_bytes_mut().copy_from_slice(pixels);

        Ok(de.position())
    }
}

fn rejected(err: FrameError) -> FrameError {
    tracing::debug!(error = %err, "frame decode rejected");
    err
}
