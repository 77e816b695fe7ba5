// Composable wrapper policies.
//
// A MessageWrapper varies along three independent axes:
//   storage  - pooled or free-standing (the nullable pool back-reference)
//   routing  - RoutingPolicy: Routed carries src/dst addresses, Unrouted does not
//   deletion - DeletionPolicy: what happens to the payload when the wrapper dies

use crate::Core::netaddr::NetAddr;

/// Source/destination endpoint storage of a wrapper.
pub trait RoutingPolicy: Default + Send + Sync + 'static {
    /// Whether this policy actually stores addresses.
    const ROUTED: bool;

    fn net_src(&self) -> NetAddr;
    fn net_dst(&self) -> NetAddr;
    fn set_net_points(&mut self, src: NetAddr, dst: NetAddr);

    fn clear_net_points(&mut self) {
        self.set_net_points(NetAddr::NONE, NetAddr::NONE);
    }

    fn copy_net_points(&mut self, src: &Self) {
        self.set_net_points(src.net_src(), src.net_dst());
    }
}

/// Routing policy holding a source and a destination address.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Routed {
    net_src: NetAddr,
    net_dst: NetAddr,
}

impl RoutingPolicy for Routed {
    const ROUTED: bool = true;

    #[inline]
    fn net_src(&self) -> NetAddr {
        self.net_src
    }

    #[inline]
    fn net_dst(&self) -> NetAddr {
        self.net_dst
    }

    #[inline]
    fn set_net_points(&mut self, src: NetAddr, dst: NetAddr) {
        self.net_src = src;
        self.net_dst = dst;
    }
}

/// Routing policy for payloads that never leave the process.
///
/// Addresses always read as [`NetAddr::NONE`]; writes are ignored.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Unrouted;

impl RoutingPolicy for Unrouted {
    const ROUTED: bool = false;

    #[inline]
    fn net_src(&self) -> NetAddr {
        NetAddr::NONE
    }

    #[inline]
    fn net_dst(&self) -> NetAddr {
        NetAddr::NONE
    }

    #[inline]
    fn set_net_points(&mut self, _src: NetAddr, _dst: NetAddr) {}
}

/// Disposal of a payload when its wrapper is destroyed.
pub trait DeletionPolicy<T>: 'static {
    fn dispose(payload: T);
}

/// Drop the payload with its wrapper.
#[derive(Copy, Clone, Debug, Default)]
pub struct DropPayload;

impl<T> DeletionPolicy<T> for DropPayload {
    #[inline]
    fn dispose(payload: T) {
        drop(payload);
    }
}

/// Leave the payload's resources alone when the wrapper dies.
///
/// For payloads whose storage is owned elsewhere (driver-mapped memory and
/// similar); the payload's destructor never runs.
#[derive(Copy, Clone, Debug, Default)]
pub struct RetainPayload;

impl<T> DeletionPolicy<T> for RetainPayload {
    #[inline]
    fn dispose(payload: T) {
        std::mem::forget(payload);
    }
}

/// Shape-checked copy used when cloning pooled messages.
///
/// Returns `false`, leaving `self` untouched, when `src` cannot be copied
/// without reshaping `self`.
pub trait Assign {
    fn assign_from(&mut self, src: &Self) -> bool;
}

impl<T: Clone> Assign for Vec<T> {
    fn assign_from(&mut self, src: &Self) -> bool {
        self.clone_from(src);
        true
    }
}
