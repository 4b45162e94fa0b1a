use core::cmp::Ordering;
use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
    thread::scope,
};

use uuid::Uuid;

use crate::{
    Error,
    generator::{Generator, GeneratorConfiguration, GeneratorRegistry, GuidGenerator},
    identity::{AdapterKind, NetworkAdapter, tests::MockIdentity},
    layout::Layout,
    sequencer::{AtomicSequencer, Sequencer, SpinSequencer},
    time::MonotonicClock,
};

const DEFAULT: GeneratorConfiguration = GeneratorConfiguration::new(0, false);
const WITH_PROCESS_ID: GeneratorConfiguration = GeneratorConfiguration::new(0, true);

fn registry() -> GeneratorRegistry {
    GeneratorRegistry::new(MockIdentity::host_only("test-host"), MonotonicClock::new())
}

fn atomic_registry() -> GeneratorRegistry<AtomicSequencer<MonotonicClock>> {
    GeneratorRegistry::new(MockIdentity::host_only("test-host"), MonotonicClock::new())
}

fn run_unique_and_ordered<S>(generator: &Generator<S>, count: usize)
where
    S: Sequencer,
{
    let layout = generator.layout();
    let mut seen = HashSet::with_capacity(count);
    let mut previous: Option<Uuid> = None;

    for _ in 0..count {
        let id = generator.new_id();
        assert!(seen.insert(id), "{layout}: duplicate id {id}");

        if let Some(prev) = previous {
            assert_eq!(
                layout.compare(&prev, &id),
                Ordering::Less,
                "{layout}: {prev} should sort before {id}"
            );
            assert!(layout.decode(&prev).0 < layout.decode(&id).0);
        }
        previous = Some(id);
    }
}

fn run_threaded_unique<S>(generator: Generator<S>)
where
    S: Sequencer + Send + Sync,
{
    const THREADS: usize = 8;
    const IDS_PER_THREAD: usize = 12_500;
    const TOTAL_IDS: usize = THREADS * IDS_PER_THREAD;

    let seen = Arc::new(Mutex::new(HashSet::with_capacity(TOTAL_IDS)));

    scope(|s| {
        for _ in 0..THREADS {
            let generator = generator.clone();
            let seen = Arc::clone(&seen);

            s.spawn(move || {
                let layout = generator.layout();
                let mut local = Vec::with_capacity(IDS_PER_THREAD);
                for _ in 0..IDS_PER_THREAD {
                    let id = generator.new_id();
                    if let Some(prev) = local.last() {
                        assert_eq!(layout.compare(prev, &id), Ordering::Less);
                    }
                    local.push(id);
                }
                let mut seen = seen.lock().unwrap();
                for id in local {
                    assert!(seen.insert(id), "duplicate id {id}");
                }
            });
        }
    });

    assert_eq!(seen.lock().unwrap().len(), TOTAL_IDS);
}

#[test]
fn every_layout_is_unique_and_ordered() {
    let registry = registry();
    let generator = registry.get_or_create(DEFAULT).unwrap();
    for layout in Layout::ALL {
        run_unique_and_ordered(&generator.with_layout(layout), 100_000);
    }
}

#[test]
fn atomic_sequencer_is_unique_and_ordered() {
    let registry = atomic_registry();
    let generator = registry.get_or_create(DEFAULT).unwrap();
    run_unique_and_ordered(&generator, 100_000);
}

#[test]
fn concurrent_callers_never_collide() {
    let registry = registry();
    run_threaded_unique(registry.get_or_create(DEFAULT).unwrap());
}

#[test]
fn concurrent_callers_never_collide_lock_free() {
    let registry = atomic_registry();
    run_threaded_unique(registry.get_or_create(DEFAULT).unwrap());
}

#[test]
fn identical_configurations_share_a_sequencer() {
    let registry = registry();
    let a = registry.get_or_create(DEFAULT).unwrap();
    let b = registry.get_or_create(DEFAULT).unwrap();
    assert_eq!(registry.len(), 1);

    let mut last = a.next_stamp();
    for i in 0..1_000 {
        let next = if i % 2 == 0 { b.next_stamp() } else { a.next_stamp() };
        assert!(next > last);
        last = next;
    }
}

#[test]
fn layouts_of_one_source_share_a_sequencer() {
    let registry = registry();
    let sql = registry.get_or_create(DEFAULT).unwrap();
    let binary = sql.with_layout(Layout::Binary);

    let first = Layout::SqlServer.decode(&sql.new_id());
    let second = Layout::Binary.decode(&binary.new_id());
    assert!(second.0 > first.0);
    assert_eq!(first.1, second.1);
}

#[test]
fn mixed_configurations_are_rejected_by_default() {
    let registry = registry();
    registry.get_or_create(DEFAULT).unwrap();

    match registry.get_or_create(WITH_PROCESS_ID) {
        Err(Error::ConfigurationConflict { active, requested }) => {
            assert_eq!(active, DEFAULT);
            assert_eq!(requested, WITH_PROCESS_ID);
        }
        other => panic!("unexpected result: {other:?}"),
    }

    // The first configuration keeps working.
    assert!(registry.get_or_create(DEFAULT).is_ok());
    assert_eq!(registry.active_configuration(), Some(DEFAULT));
    assert_eq!(registry.len(), 1);
}

#[test]
fn second_worker_index_is_rejected_by_default() {
    let identity = MockIdentity {
        adapters: Some(vec![
            NetworkAdapter {
                name: "eth0".to_owned(),
                kind: AdapterKind::Ethernet,
                address: vec![0x00, 0x1a, 0x2b, 0x3c, 0x4d, 0x5e],
            },
            NetworkAdapter {
                name: "eth1".to_owned(),
                kind: AdapterKind::Ethernet,
                address: vec![0x00, 0x1a, 0x2b, 0x3c, 0x4d, 0x5f],
            },
        ]),
        ..MockIdentity::host_only("test-host")
    };
    let registry: GeneratorRegistry = GeneratorRegistry::new(identity, MonotonicClock::new());
    let second = GeneratorConfiguration::new(1, false);
    registry.get_or_create(DEFAULT).unwrap();

    // Index 1 resolves to eth1, so only the guard can refuse it.
    match registry.get_or_create(second) {
        Err(Error::ConfigurationConflict { active, requested }) => {
            assert_eq!(active, DEFAULT);
            assert_eq!(requested, second);
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(registry.len(), 1);

    let allowed = registry.allow_mixed_configurations(true);
    let other = allowed.get_or_create(second).unwrap();
    assert_ne!(other.node(), allowed.get_or_create(DEFAULT).unwrap().node());
}

#[test]
fn mixed_configurations_get_independent_sources_when_allowed() {
    let registry = registry().allow_mixed_configurations(true);
    let a = registry.get_or_create(DEFAULT).unwrap();
    let b = registry.get_or_create(GeneratorConfiguration::new(1, false)).unwrap();
    let c = registry.get_or_create(WITH_PROCESS_ID).unwrap();

    assert_eq!(registry.len(), 3);
    assert_ne!(a.node(), b.node());
    assert_ne!(a.node(), c.node());
    assert_eq!(registry.active_configuration(), Some(DEFAULT));
}

#[test]
fn process_id_replaces_the_node_tail() {
    let registry = registry();
    let generator = registry.get_or_create(WITH_PROCESS_ID).unwrap();
    let node = generator.node();
    assert_eq!(&node.as_bytes()[4..], &[0x45, 0x23]);
    assert_eq!(generator.configuration(), WITH_PROCESS_ID);

    let id = generator.new_id();
    assert_eq!(Layout::SqlServer.decode(&id).1, node);
}

#[test]
fn adapter_address_becomes_the_node() {
    let identity = MockIdentity {
        adapters: Some(vec![NetworkAdapter {
            name: "eth0".to_owned(),
            kind: AdapterKind::Ethernet,
            address: vec![0x00, 0x1a, 0x2b, 0x3c, 0x4d, 0x5e],
        }]),
        ..MockIdentity::host_only("test-host")
    };
    let registry: GeneratorRegistry = GeneratorRegistry::new(identity, MonotonicClock::new());
    let generator = registry.get_or_create(DEFAULT).unwrap();

    assert_eq!(
        generator.node().as_bytes(),
        &[0x00, 0x1a, 0x2b, 0x3c, 0x4d, 0x5e]
    );
}

#[test]
fn failed_creation_does_not_claim_the_registry() {
    let identity = MockIdentity {
        adapters: Some(vec![NetworkAdapter {
            name: "eth0".to_owned(),
            kind: AdapterKind::Ethernet,
            address: vec![0x00, 0x1a, 0x2b, 0x3c, 0x4d, 0x5e],
        }]),
        host_name: None,
        process_id: None,
    };
    let registry: GeneratorRegistry = GeneratorRegistry::new(identity, MonotonicClock::new());

    // No second adapter and no host name to hash.
    let err = registry
        .get_or_create(GeneratorConfiguration::new(1, false))
        .unwrap_err();
    assert!(matches!(err, Error::WorkerId { .. }));

    // No process id.
    let err = registry.get_or_create(WITH_PROCESS_ID).unwrap_err();
    assert!(matches!(err, Error::ProcessId(_)));

    assert!(registry.is_empty());
    assert_eq!(registry.active_configuration(), None);
    assert!(registry.get_or_create(DEFAULT).is_ok());
}

#[test]
fn text_ids_are_hyphenated_lowercase() {
    let registry = registry();
    let generator = registry.get_or_create(DEFAULT).unwrap().with_layout(Layout::String);

    let a = generator.new_id_text();
    let b = generator.new_id_text();
    assert_eq!(a.len(), 36);
    assert_eq!(a, a.to_lowercase());
    assert!(a < b);
}

#[test]
fn handles_work_through_the_trait() {
    fn draw(generator: &dyn GuidGenerator) -> Uuid {
        generator.new_id()
    }

    let registry = registry();
    let generator = registry.get_or_create(DEFAULT).unwrap();
    assert_ne!(draw(&generator), draw(&generator));
}

#[test]
fn explicit_sequencer_type_is_accepted() {
    let registry: GeneratorRegistry<SpinSequencer<MonotonicClock>> =
        GeneratorRegistry::new(MockIdentity::host_only("h"), MonotonicClock::new());
    assert!(registry.is_empty());
}

#[test]
fn configuration_displays_both_fields() {
    assert_eq!(
        WITH_PROCESS_ID.to_string(),
        "(worker_index=0, use_process_id=true)"
    );
}
