//! Concurrency contract of service-key allocation.

use std::sync::Arc;
use std::thread;

use hwt_model::{Priority, ServiceType};
use hwt_store::{MemoryStore, WaitTimeStore};

#[test]
fn concurrent_resolutions_of_a_new_tuple_allocate_one_key() {
    let store = Arc::new(MemoryStore::new());

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                store
                    .resolve_or_create_service_key(
                        "Oncologia Médica",
                        Priority::Priority,
                        ServiceType::Consultation,
                        true,
                    )
                    .unwrap()
            })
        })
        .collect();

    let keys: Vec<u32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let first = keys[0];
    assert!(keys.iter().all(|&k| k == first), "keys diverged: {keys:?}");
    assert_eq!(store.services().unwrap().len(), 1);
}

#[test]
fn concurrent_resolutions_of_distinct_tuples_never_collide() {
    let store = Arc::new(MemoryStore::new());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                store
                    .resolve_or_create_service_key(
                        &format!("Especialidade {i}"),
                        Priority::Normal,
                        ServiceType::Surgery,
                        false,
                    )
                    .unwrap()
            })
        })
        .collect();

    let mut keys: Vec<u32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    keys.sort_unstable();
    keys.dedup();
    assert_eq!(keys.len(), 8, "duplicate keys allocated");
}
