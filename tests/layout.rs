// Layout conformance tests for the frame wire header.
// WireHeader is #[repr(C)] with one little-endian word per wire field, so
// field offsets must equal the wire offsets of the record.
use dmxp_framepool::Codec::layout::{HEADER_SIZE, HEADER_WORDS, PIXEL_OFFSET, SIDECAR_BLOCK_SIZE};
use dmxp_framepool::Codec::FRAME_MAGIC;
use dmxp_framepool::{FrameError, NetAddr, Shape, WireHeader};
use zerocopy::IntoBytes;
use memoffset::offset_of;
use std::mem::{align_of, size_of};

#[test]
fn test_wire_header_layout() {
    let size = size_of::<WireHeader>();
    let align = align_of::<WireHeader>();

    println!(
        "WireHeader => size: {size}, align: {align}, offsets: [magic:{}, type_tag:{}, net_src_hi:{}, net_dst_hi:{}, sequence_id:{}, width:{}]",
        offset_of!(WireHeader, magic),
        offset_of!(WireHeader, type_tag),
        offset_of!(WireHeader, net_src_hi),
        offset_of!(WireHeader, net_dst_hi),
        offset_of!(WireHeader, sequence_id),
        offset_of!(WireHeader, width),
    );

    assert_eq!(size, HEADER_SIZE);
    assert_eq!(align, 1);
    assert_eq!(offset_of!(WireHeader, magic), 0);
    assert_eq!(offset_of!(WireHeader, type_tag), 4);
    assert_eq!(offset_of!(WireHeader, net_src_hi), 8);
    assert_eq!(offset_of!(WireHeader, net_src_lo), 12);
    assert_eq!(offset_of!(WireHeader, net_dst_hi), 16);
    assert_eq!(offset_of!(WireHeader, net_dst_lo), 20);
    assert_eq!(offset_of!(WireHeader, sequence_id), 24);
    assert_eq!(offset_of!(WireHeader, pixel_size), 28);
    assert_eq!(offset_of!(WireHeader, height), 32);
    assert_eq!(offset_of!(WireHeader, width), 36);
}

#[test]
fn test_record_offsets() {
    assert_eq!(HEADER_WORDS, 10);
    assert_eq!(HEADER_SIZE, 40);
    assert_eq!(SIDECAR_BLOCK_SIZE, 16 + 1024);
    assert_eq!(PIXEL_OFFSET, 40 + 16 + 1024);

    let header = WireHeader::new(
        0,
        0,
        Shape {
            width: 640,
            height: 480,
            pixel_size: 2,
        },
    );
    assert_eq!(header.pixel_bytes(), Some(640 * 480 * 2));
    assert_eq!(header.record_len(), Some(PIXEL_OFFSET + 640 * 480 * 2));
}

#[test]
fn test_wire_header_bytes_are_little_endian() {
    let mut header = WireHeader::new(
        0x0102_0304,
        0x0a0b_0c0d,
        Shape {
            width: 3,
            height: 2,
            pixel_size: 1,
        },
    );
    header.set_net_points(NetAddr::new(0x1_0000_0002), NetAddr::new(5));

    let bytes = header.as_bytes();
    assert_eq!(bytes.len(), HEADER_SIZE);
    assert_eq!(&bytes[0..4], &FRAME_MAGIC.to_le_bytes());
    assert_eq!(&bytes[4..8], &[0x04, 0x03, 0x02, 0x01]);
    assert_eq!(&bytes[8..12], &1u32.to_le_bytes());
    assert_eq!(&bytes[12..16], &2u32.to_le_bytes());
    assert_eq!(&bytes[20..24], &5u32.to_le_bytes());
    assert_eq!(&bytes[24..28], &[0x0d, 0x0c, 0x0b, 0x0a]);
    assert_eq!(&bytes[36..40], &3u32.to_le_bytes());

    // Unaligned source: the header has alignment 1.
    let mut shifted = vec![0u8; HEADER_SIZE + 1];
    shifted[1..].copy_from_slice(bytes);
    let parsed = WireHeader::from_prefix(&shifted[1..]).unwrap();
    assert_eq!(parsed, header);
    assert_eq!(parsed.net_src(), NetAddr::new(0x1_0000_0002));
    assert_eq!(parsed.sequence_id(), 0x0a0b_0c0d);
}

#[test]
fn test_wire_header_short_prefix() {
    let err = WireHeader::from_prefix(&[0u8; HEADER_SIZE - 1]).unwrap_err();
    assert!(matches!(
        err,
        FrameError::Truncated {
            needed: HEADER_SIZE,
            remaining
        } if remaining == HEADER_SIZE - 1
    ));
}
