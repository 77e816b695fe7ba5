use dmxp_framepool::Codec::{HEADER_SIZE, PIXEL_OFFSET};
use dmxp_framepool::{
    Frame, FrameCodec, FrameError, MessageWrapper, NetAddr, RoutingHeader, Shape, TypeTag,
    Unrouted,
};

type Msg = MessageWrapper<Frame<u8>>;

fn sample(width: u32, height: u32) -> Msg {
    let mut msg = Msg::new(Frame::new(width, height).unwrap());
    for (i, p) in msg.payload_mut().pixels_mut().iter_mut().enumerate() {
        *p = (i % 251) as u8;
    }
    msg.set_net_points(NetAddr::new(10), NetAddr::new(20));
    msg.set_sequence_id(7);
    msg
}

fn word(buf: &[u8], index: usize) -> u32 {
    u32::from_le_bytes(buf[index * 4..index * 4 + 4].try_into().unwrap())
}

#[test]
fn test_encoded_record_layout() {
    let msg = sample(3, 2);
    let codec = FrameCodec::default();
    let bytes = codec.encode_to_vec(&msg).unwrap();

    assert_eq!(bytes.len(), FrameCodec::encoded_len(msg.payload()));
    assert_eq!(bytes.len(), PIXEL_OFFSET + 6);
    assert_eq!(word(&bytes, 0), 0);
    assert_eq!(word(&bytes, 1), TypeTag::of::<Frame<u8>>().get());
    assert_eq!((word(&bytes, 2), word(&bytes, 3)), (0, 10));
    assert_eq!((word(&bytes, 4), word(&bytes, 5)), (0, 20));
    assert_eq!(word(&bytes, 6), 7);
    assert_eq!(word(&bytes, 7), 1);
    assert_eq!(word(&bytes, 8), 2);
    assert_eq!(word(&bytes, 9), 3);
    assert_eq!(word(&bytes, 10), 1024);
    assert_eq!(word(&bytes, 11), 2);
    assert_eq!(&bytes[PIXEL_OFFSET..], msg.payload().pixel_bytes());
}

#[test]
fn test_round_trip_sidecar_empty_through_full() {
    let codec = FrameCodec::new();
    for count in [0usize, 1, 2, 255, 511, 512] {
        let mut src = sample(4, 4);
        let meta: Vec<u16> = (0..count).map(|i| (i * 3) as u16).collect();
        src.payload_mut().sidecar_mut().write(&meta).unwrap();
        let bytes = codec.encode_to_vec(&src).unwrap();

        let mut dst = Msg::new(Frame::new(4, 4).unwrap());
        let consumed = codec.decode(&mut dst, &bytes).unwrap();
        assert_eq!(consumed, bytes.len());
        assert_eq!(dst.payload().sidecar().len(), count);
        assert_eq!(dst.payload(), src.payload());
        assert_eq!(dst.routing_header(), src.routing_header());
    }
}

#[test]
fn test_shape_mismatch_leaves_destination_untouched() {
    let codec = FrameCodec::default();
    let bytes = codec.encode_to_vec(&sample(4, 4)).unwrap();

    let mut dst = Msg::new(Frame::new(4, 2).unwrap());
    dst.payload_mut().fill(0xAA);
    dst.set_sequence_id(99);

    let err = codec.decode(&mut dst, &bytes).unwrap_err();
    assert_eq!(
        err,
        FrameError::ShapeMismatch {
            expected: Shape { width: 4, height: 2, pixel_size: 1 },
            found: Shape { width: 4, height: 4, pixel_size: 1 },
        }
    );
    assert!(dst.payload().pixels().iter().all(|p| *p == 0xAA));
    assert_eq!(dst.sequence_id(), 99);
}

#[test]
fn test_pixel_size_mismatch_rejected() {
    let codec = FrameCodec::default();
    let bytes = codec.encode_to_vec(&sample(2, 2)).unwrap();

    let mut dst = MessageWrapper::<Frame<u16>>::new(Frame::new(2, 2).unwrap());
    assert!(matches!(
        codec.decode(&mut dst, &bytes),
        Err(FrameError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_bad_magic_rejected() {
    let codec = FrameCodec::default();
    let mut bytes = codec.encode_to_vec(&sample(2, 2)).unwrap();
    bytes[0] = 1;

    let mut dst = Msg::new(Frame::new(2, 2).unwrap());
    assert_eq!(
        codec.decode(&mut dst, &bytes).unwrap_err(),
        FrameError::InvalidMagic { expected: 0, found: 1 }
    );
    assert!(FrameCodec::peek_header(&bytes).is_err());
}

#[test]
fn test_overflow_reports_zero_length() {
    let codec = FrameCodec::default();
    let msg = sample(8, 8);
    let mut small = vec![0u8; FrameCodec::encoded_len(msg.payload()) - 1];

    let err = codec.encode(&msg, &mut small).unwrap_err();
    assert_eq!(err, FrameError::Overflow { needed: 64, remaining: 63 });

    let mut tiny = vec![0u8; HEADER_SIZE - 2];
    assert!(matches!(
        codec.encode(&msg, &mut tiny),
        Err(FrameError::Overflow { .. })
    ));
}

#[test]
fn test_declared_length_check() {
    let msg = sample(2, 2);
    let strict = FrameCodec::default();
    let mut bytes = strict.encode_to_vec(&msg).unwrap();
    bytes.extend_from_slice(&[0, 0, 0]);

    let mut dst = Msg::new(Frame::new(2, 2).unwrap());
    assert!(matches!(
        strict.decode(&mut dst, &bytes),
        Err(FrameError::LengthMismatch { .. })
    ));
    assert_eq!(dst.sequence_id(), 0);

    let lenient = FrameCodec::new().with_length_check(false);
    assert!(!lenient.checks_length());
    assert_eq!(lenient.decode(&mut dst, &bytes).unwrap(), bytes.len() - 3);
    assert_eq!(dst.sequence_id(), 7);
}

#[test]
fn test_truncated_input_rejected() {
    let codec = FrameCodec::default();
    let bytes = codec.encode_to_vec(&sample(2, 2)).unwrap();

    let mut dst = Msg::new(Frame::new(2, 2).unwrap());
    for cut in [0, 10, HEADER_SIZE, PIXEL_OFFSET, bytes.len() - 1] {
        assert!(
            matches!(codec.decode(&mut dst, &bytes[..cut]), Err(FrameError::Truncated { .. })),
            "cut at {cut}"
        );
    }
    assert_eq!(dst.sequence_id(), 0);
}

#[test]
fn test_peek_header() {
    let codec = FrameCodec::default();
    let bytes = codec.encode_to_vec(&sample(5, 3)).unwrap();

    let header = FrameCodec::peek_header(&bytes).unwrap();
    assert_eq!(header.net_src(), NetAddr::new(10));
    assert_eq!(header.net_dst(), NetAddr::new(20));
    assert_eq!(header.sequence_id(), 7);
    assert_eq!(header.shape(), Shape { width: 5, height: 3, pixel_size: 1 });
    assert_eq!(header.record_len(), Some(bytes.len()));
}

#[test]
fn test_unrouted_encodes_no_address() {
    let mut msg = MessageWrapper::<Frame<u8>, Unrouted>::new(Frame::new(1, 1).unwrap());
    msg.set_net_points(NetAddr::new(1), NetAddr::new(2));
    msg.set_sequence_id(3);

    let codec = FrameCodec::default();
    let bytes = codec.encode_to_vec(&msg).unwrap();
    let header = FrameCodec::peek_header(&bytes).unwrap();
    assert!(header.net_src().is_none());
    assert!(header.net_dst().is_none());

    let mut routed = Msg::new(Frame::new(1, 1).unwrap());
    codec.decode(&mut routed, &bytes).unwrap();
    assert_eq!(
        routed.routing_header(),
        RoutingHeader::new(NetAddr::NONE, NetAddr::NONE, 3)
    );
}

#[test]
fn test_negative_addresses_survive() {
    let codec = FrameCodec::default();
    let mut msg = sample(1, 1);
    msg.set_net_points(NetAddr::new(-5), NetAddr::new(i64::MAX));
    let bytes = codec.encode_to_vec(&msg).unwrap();

    let mut dst = Msg::new(Frame::new(1, 1).unwrap());
    codec.decode(&mut dst, &bytes).unwrap();
    assert_eq!(dst.net_src(), NetAddr::new(-5));
    assert_eq!(dst.net_dst(), NetAddr::new(i64::MAX));
}
