//! Single-flight construction tests
//!
//! Concurrent first-time requests must share one construction attempt,
//! including its failure.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures::future::join_all;
use lazy_di_core::{BoxError, EntryState, Error, Instance, Item, Registry, RegistryOptions};

fn slow_counting(provides: &str, count: &Arc<AtomicUsize>) -> Item {
    let count = Arc::clone(count);
    Item::new(provides).factory(move |_, _| {
        let count = Arc::clone(&count);
        async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok::<_, BoxError>(Arc::new(count.fetch_add(1, Ordering::SeqCst)) as Instance)
        }
    })
}

#[tokio::test]
async fn test_concurrent_resolves_construct_once() {
    let registry = Registry::new();
    let count = Arc::new(AtomicUsize::new(0));
    registry.register(slow_counting("shared", &count)).unwrap();

    let results = join_all((0..16).map(|_| registry.resolve("shared"))).await;

    assert_eq!(count.load(Ordering::SeqCst), 1);
    let first = results[0].as_ref().unwrap();
    for result in &results {
        assert!(Arc::ptr_eq(first, result.as_ref().unwrap()));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_resolves_across_threads() {
    let registry = Registry::new();
    let count = Arc::new(AtomicUsize::new(0));
    registry.register(slow_counting("shared", &count)).unwrap();

    let handles: Vec<_> = (0..32)
        .map(|_| tokio::spawn(registry.resolve("shared")))
        .collect();
    let mut instances = Vec::new();
    for handle in handles {
        instances.push(handle.await.unwrap().unwrap());
    }

    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert!(instances.iter().all(|i| Arc::ptr_eq(i, &instances[0])));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_template_materialization() {
    let registry = Registry::new();
    let count = Arc::new(AtomicUsize::new(0));
    registry.register(slow_counting("tpl::*", &count)).unwrap();

    let handles: Vec<_> = (0..16)
        .map(|_| tokio::spawn(registry.resolve("tpl::same")))
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_shared_dependency_constructed_once() {
    let registry = Registry::new();
    let count = Arc::new(AtomicUsize::new(0));
    registry.register(slow_counting("db", &count)).unwrap();
    for name in ["users", "orders", "billing"] {
        registry
            .register(Item::new(format!("repo::{name}")).require("db").value(()))
            .unwrap();
    }

    registry.resolve_group("repo::*").await.unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failure_is_memoized() {
    let registry = Registry::new();
    let attempts = Arc::new(AtomicUsize::new(0));
    {
        let attempts = Arc::clone(&attempts);
        registry
            .register(Item::new("flaky").factory(move |_, _| {
                let attempts = Arc::clone(&attempts);
                async move {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err::<Instance, BoxError>("connection refused".into())
                }
            }))
            .unwrap();
    }

    let results = join_all((0..8).map(|_| registry.resolve("flaky"))).await;
    let later = registry.resolve("flaky").await;

    assert_eq!(attempts.load(Ordering::SeqCst), 1);
    for result in results.iter().chain(std::iter::once(&later)) {
        match result {
            Err(Error::Construction { path, source }) => {
                assert_eq!(path, "flaky");
                assert_eq!(source.to_string(), "connection refused");
            }
            other => panic!("Expected Construction, got {other:?}"),
        }
    }
}

/// Factory counting attempts that start and attempts that finish
fn slow_tracked(started: &Arc<AtomicUsize>, completed: &Arc<AtomicUsize>) -> Item {
    let started = Arc::clone(started);
    let completed = Arc::clone(completed);
    Item::new("slow").factory(move |_, _| {
        let started = Arc::clone(&started);
        let completed = Arc::clone(&completed);
        async move {
            started.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            completed.fetch_add(1, Ordering::SeqCst);
            Ok::<_, BoxError>(Arc::new("done") as Instance)
        }
    })
}

#[tokio::test]
async fn test_spawned_construction_outlives_dropped_resolvers() {
    let registry = Registry::with_spawner(RegistryOptions::default(), |attempt| {
        tokio::spawn(attempt);
    });
    let started = Arc::new(AtomicUsize::new(0));
    let completed = Arc::new(AtomicUsize::new(0));
    registry.register(slow_tracked(&started, &completed)).unwrap();

    let timed_out =
        tokio::time::timeout(Duration::from_millis(5), registry.resolve("slow")).await;
    assert!(timed_out.is_err());

    tokio::time::sleep(Duration::from_millis(100)).await;
    let entry = registry.entry("slow").unwrap().unwrap();
    assert_eq!(entry.state(), EntryState::Resolved);
    assert_eq!(completed.load(Ordering::SeqCst), 1);

    registry.resolve("slow").await.unwrap();
    assert_eq!(started.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unspawned_construction_resumes_same_attempt() {
    let registry = Registry::new();
    let started = Arc::new(AtomicUsize::new(0));
    let completed = Arc::new(AtomicUsize::new(0));
    registry.register(slow_tracked(&started, &completed)).unwrap();

    let timed_out =
        tokio::time::timeout(Duration::from_millis(5), registry.resolve("slow")).await;
    assert!(timed_out.is_err());

    tokio::time::sleep(Duration::from_millis(50)).await;
    let entry = registry.entry("slow").unwrap().unwrap();
    assert_eq!(entry.state(), EntryState::Pending);
    assert_eq!(completed.load(Ordering::SeqCst), 0);

    registry.resolve("slow").await.unwrap();
    assert_eq!(entry.state(), EntryState::Resolved);
    assert_eq!(started.load(Ordering::SeqCst), 1);
    assert_eq!(completed.load(Ordering::SeqCst), 1);
}
