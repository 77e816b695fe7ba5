use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Plain-old-data element types storable in a [`RawBuffer`](super::RawBuffer)
/// or a [`MetadataSidecar`](crate::Video::MetadataSidecar).
///
/// Any type that `zerocopy` can view as bytes in both directions qualifies;
/// byte views go through [`IntoBytes::as_bytes`] and [`FromBytes::ref_from_bytes`].
/// Sidecar elements are additionally limited to an alignment of 8 bytes.
pub trait Pod:
    FromBytes + IntoBytes + Immutable + KnownLayout + Copy + Default + Send + Sync + 'static
{
}

impl<T> Pod for T where
    T: FromBytes + IntoBytes + Immutable + KnownLayout + Copy + Default + Send + Sync + 'static
{
}
