use dmxp_framepool::{
    DropPayload, Frame, Pool, PoolBuilder, PoolRegistry, Routed, TypeRegistry, Unrouted,
};
use std::sync::Arc;

struct Telemetry(u32);

fn private_registry() -> PoolRegistry {
    PoolRegistry::with_type_registry(Arc::new(TypeRegistry::new()))
}

#[test]
fn test_insert_and_acquire_by_type() {
    let registry = private_registry();
    let pool = PoolBuilder::new()
        .with_pool_size(2)
        .with_type_registry(Arc::clone(registry.type_registry()))
        .build_frames::<u8, u16, Routed, DropPayload>(4, 4)
        .unwrap();
    assert!(!registry.insert(Arc::new(pool)));
    assert_eq!(registry.len(), 1);

    let a = registry.acquire_routed::<Frame<u8>>().unwrap();
    let b = registry.acquire::<Frame<u8>, Routed, DropPayload>().unwrap();
    assert!(registry.acquire_routed::<Frame<u8>>().is_none());
    assert_eq!(a.payload().width(), 4);

    drop((a, b));
    assert!(registry.acquire_routed::<Frame<u8>>().is_some());
}

#[test]
fn test_unregistered_type_yields_none() {
    let registry = private_registry();
    assert!(registry.is_empty());
    assert!(registry.lookup::<Telemetry, Routed, DropPayload>().is_none());
    assert!(registry.acquire_routed::<Telemetry>().is_none());
    assert!(!registry.remove::<Telemetry>());
}

#[test]
fn test_policy_mismatch_yields_none() {
    let registry = private_registry();
    let pool: Pool<Telemetry, Unrouted> = PoolBuilder::new()
        .with_type_registry(Arc::clone(registry.type_registry()))
        .build(|| Telemetry(0));
    registry.insert(Arc::new(pool));

    assert!(registry.lookup::<Telemetry, Unrouted, DropPayload>().is_some());
    assert!(registry.lookup::<Telemetry, Routed, DropPayload>().is_none());
}

#[test]
fn test_insert_replaces_pool_of_same_type() {
    let registry = private_registry();
    let types = Arc::clone(registry.type_registry());

    let small: Pool<Telemetry> = PoolBuilder::new()
        .with_pool_size(1)
        .with_type_registry(Arc::clone(&types))
        .build(|| Telemetry(1));
    let large: Pool<Telemetry> = PoolBuilder::new()
        .with_pool_size(5)
        .with_type_registry(types)
        .build(|| Telemetry(2));

    assert!(!registry.insert(Arc::new(small)));
    assert!(registry.insert(Arc::new(large)));
    assert_eq!(registry.len(), 1);

    let pool = registry.lookup::<Telemetry, Routed, DropPayload>().unwrap();
    assert_eq!(pool.size(), 5);
    assert_eq!(registry.acquire_routed::<Telemetry>().unwrap().payload().0, 2);
}

#[test]
fn test_remove_keeps_outstanding_handles_valid() {
    let registry = private_registry();
    let pool: Pool<Telemetry> = PoolBuilder::new()
        .with_pool_size(2)
        .with_type_registry(Arc::clone(registry.type_registry()))
        .build(|| Telemetry(3));
    registry.insert(Arc::new(pool));

    let held = registry.acquire_routed::<Telemetry>().unwrap();
    assert!(registry.remove::<Telemetry>());
    assert!(registry.is_empty());
    assert_eq!(held.payload().0, 3);
    drop(held);
}

#[test]
fn test_pool_info() {
    let registry = private_registry();
    let types = Arc::clone(registry.type_registry());

    let frames = PoolBuilder::new()
        .with_pool_size(3)
        .with_type_registry(Arc::clone(&types))
        .build_frames::<u16, u16, Routed, DropPayload>(2, 2)
        .unwrap();
    let telemetry: Pool<Telemetry> = PoolBuilder::new()
        .with_pool_size(4)
        .with_type_registry(types)
        .build(|| Telemetry(0));
    registry.insert(Arc::new(frames));
    registry.insert(Arc::new(telemetry));

    let _held = registry.acquire_routed::<Telemetry>().unwrap();
    let info = registry.pool_info();
    println!("Registry: {:?} => {:#?}", registry, info);

    assert_eq!(info.len(), 2);
    assert!(info[0].tag < info[1].tag);
    let tele = info.iter().find(|s| s.size == 4).unwrap();
    assert_eq!(tele.available, 3);
    assert_eq!(tele.checked_out, 1);
}

#[test]
fn test_default_registry_uses_global_tags() {
    let registry = PoolRegistry::default();
    registry.insert(Arc::new(Pool::<Vec<i8>>::new(1, Vec::new)));
    let handle = registry.acquire_routed::<Vec<i8>>().unwrap();
    assert_eq!(handle.msg_class_id(), dmxp_framepool::TypeTag::of::<Vec<i8>>());
}
