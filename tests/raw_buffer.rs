use dmxp_framepool::{FrameError, RawBuffer};
use dmxp_framepool::Core::BUF_ALIGNMENT;

#[test]
fn test_new_is_aligned_and_zeroed() {
    let buf = RawBuffer::with_elements::<u32>(100).unwrap();
    println!("RawBuffer: {:?}", buf);

    assert_eq!(buf.as_ptr() as usize % BUF_ALIGNMENT, 0);
    assert_eq!(buf.byte_buf_size(), 400);
    assert_eq!(buf.elem_size(), 4);
    assert_eq!(buf.native_buf_size(), 100);
    assert_eq!(buf.byte_data_len(), 0);
    assert!(buf.as_bytes().iter().all(|b| *b == 0));
}

#[test]
fn test_resize_reallocates_only_on_size_change() {
    let mut buf = RawBuffer::new(16, 2).unwrap();
    buf.set_data_len::<u16>(10);
    assert_eq!(buf.data_len::<u16>(), 10);

    // Same byte size, different element size: no reallocation.
    assert!(!buf.resize(8, 4).unwrap());
    assert_eq!(buf.elem_size(), 4);
    assert_eq!(buf.byte_data_len(), 20);

    // Different byte size: reallocation resets the occupied length.
    assert!(buf.resize(32, 4).unwrap());
    assert_eq!(buf.byte_buf_size(), 128);
    assert_eq!(buf.byte_data_len(), 0);
    assert_eq!(buf.as_ptr() as usize % BUF_ALIGNMENT, 0);
}

#[test]
fn test_resize_overflow_leaves_buffer_unchanged() {
    let mut buf = RawBuffer::new(4, 1).unwrap();
    let err = buf.resize(usize::MAX, 2).unwrap_err();
    assert!(matches!(err, FrameError::SizeOverflow { .. }));
    assert_eq!(buf.byte_buf_size(), 4);
    assert_eq!(buf.elem_size(), 1);
}

#[test]
fn test_set_data_len_is_clamped() {
    let mut buf = RawBuffer::with_elements::<u8>(8).unwrap();
    buf.set_data_len::<u8>(100);
    assert_eq!(buf.byte_data_len(), 8);
}

#[test]
fn test_typed_views_check_element_size() {
    let mut buf = RawBuffer::with_elements::<u16>(4).unwrap();
    assert!(buf.as_slice::<u32>().is_none());
    assert!(buf.data_ptr::<u32>().is_null());

    buf.as_mut_slice::<u16>().unwrap().copy_from_slice(&[1, 2, 3, 4]);
    assert_eq!(buf.as_slice::<u16>().unwrap(), &[1, 2, 3, 4]);
    assert!(!buf.data_ptr::<u16>().is_null());
}

#[test]
fn test_assign_requires_matching_sizes() {
    let mut src = RawBuffer::with_elements::<u8>(4).unwrap();
    src.as_bytes_mut().copy_from_slice(&[9, 8, 7, 6]);
    src.set_data_len::<u8>(3);

    let mut same = RawBuffer::with_elements::<u8>(4).unwrap();
    assert!(same.assign(&src));
    assert_eq!(same, src);
    assert_eq!(same.byte_data_len(), 3);

    let mut other_elem = RawBuffer::with_elements::<u16>(2).unwrap();
    assert!(!other_elem.assign(&src));
    assert!(other_elem.as_bytes().iter().all(|b| *b == 0));
    assert_ne!(other_elem, src);

    let mut bigger = RawBuffer::with_elements::<u8>(8).unwrap();
    assert!(!bigger.assign(&src));
    assert_eq!(bigger.byte_buf_size(), 8);
}

#[test]
fn test_empty_buffer() {
    let buf = RawBuffer::empty();
    assert!(buf.is_empty());
    assert_eq!(buf.as_bytes().len(), 0);
    assert_eq!(buf, RawBuffer::default());
}
