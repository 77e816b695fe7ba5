use std::fmt;

/// Network endpoint address carried in a message routing header.
///
/// A plain signed 64-bit word; `-1` is reserved as "no address" and is the
/// default value.
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NetAddr(pub i64);

impl NetAddr {
    /// The "no address" sentinel.
    pub const NONE: NetAddr = NetAddr(-1);

    #[inline]
    pub const fn new(addr: i64) -> Self {
        Self(addr)
    }

    #[inline]
    pub const fn get(self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == Self::NONE.0
    }

    /// Split into (hi, lo) 32-bit words as laid out on the wire.
    #[inline]
    pub const fn split(self) -> (u32, u32) {
        let bits = self.0 as u64;
        ((bits >> 32) as u32, bits as u32)
    }

    /// Inverse of [`NetAddr::split`].
    #[inline]
    pub const fn join(hi: u32, lo: u32) -> Self {
        Self((((hi as u64) << 32) | lo as u64) as i64)
    }
}

impl Default for NetAddr {
    fn default() -> Self {
        Self::NONE
    }
}

impl From<i64> for NetAddr {
    fn from(addr: i64) -> Self {
        Self(addr)
    }
}

impl From<NetAddr> for i64 {
    fn from(addr: NetAddr) -> Self {
        addr.0
    }
}

impl fmt::Debug for NetAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            f.write_str("NetAddr(none)")
        } else {
            write!(f, "NetAddr({})", self.0)
        }
    }
}

impl fmt::Display for NetAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            f.write_str("-")
        } else {
            write!(f, "{}", self.0)
        }
    }
}
