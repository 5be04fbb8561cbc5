//! Integration tests for the notification contract.

use notifymap::prelude::*;
use notifymap::tree;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

type Log = Arc<Mutex<Vec<(String, Option<i32>)>>>;

/// A map that logs every notification as `(path, leaf value or None)`.
fn logged_map(tree: Tree<i32>) -> (NotifyMap<i32>, Log) {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    let map = NotifyMap::from_tree(
        move |path, value| {
            let leaf = value.and_then(Value::as_leaf).copied();
            sink.lock().unwrap().push((path.to_string(), leaf));
        },
        tree,
    )
    .unwrap();
    (map, log)
}

#[test]
fn test_end_to_end_nested_set() {
    // d = NotifyDict(cb, {'A':10, 'B':{'Ba':100, 'Bb':200}}); d['B']['Ba'] = 101
    let (mut d, log) = logged_map(tree! {
        "A" => 10,
        "B" => { "Ba" => 100, "Bb" => 200 },
    });

    d.get_map_mut("B").unwrap().insert("Ba", 101);

    assert_eq!(*log.lock().unwrap(), [("B/Ba".to_string(), Some(101))]);
    assert_eq!(d.get_path("B/Ba").and_then(Value::as_leaf), Some(&101));
}

#[test]
fn test_wrapping_invariant_at_every_depth() {
    let (d, _log) = logged_map(tree! {
        "A" => 1,
        "B" => { "Ba" => { "Bc" => { "Bd" => 2 } } },
    });

    let b = d.get("B").unwrap();
    assert!(b.is_map());
    let ba = b.as_map().unwrap().get("Ba").unwrap();
    assert!(ba.is_map());
    let bc = ba.as_map().unwrap().get("Bc").unwrap();
    assert!(bc.is_map());
    assert_eq!(
        bc.as_map().unwrap().path().segments(),
        ["B", "Ba", "Bc"]
    );
}

#[test]
fn test_path_in_root_to_leaf_order() {
    let (mut d, log) = logged_map(tree! {
        "B" => { "Ba" => { "Bc" => 1 } },
    });

    d.get_map_mut("B")
        .unwrap()
        .get_map_mut("Ba")
        .unwrap()
        .insert("Bc", 2);

    assert_eq!(*log.lock().unwrap(), [("B/Ba/Bc".to_string(), Some(2))]);
}

#[test]
fn test_single_callback_per_whole_subtree_assignment() {
    let (mut d, log) = logged_map(tree! {});

    // Assigning a whole sub-tree fires once for "B", not per descendant.
    d.insert("B", tree! { "Ba" => 100, "Bb" => 200, "Bc" => { "Bd" => 1 } });

    let log = log.lock().unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].0, "B");
    assert_eq!(log[0].1, None); // map value, not a leaf
}

#[test]
fn test_post_wrap_value_is_live() {
    // The value delivered for a map assignment is the wrapped instance:
    // mutating the stored sub-map afterwards keeps notifying.
    let (mut d, log) = logged_map(tree! {});

    d.insert("B", tree! { "Ba" => 100 });
    assert!(d.get("B").unwrap().is_map());

    d.get_map_mut("B").unwrap().insert("Ba", 101);

    let log = log.lock().unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log[1], ("B/Ba".to_string(), Some(101)));
}

#[test]
fn test_qualified_matching_precedence() {
    let default_hits = Arc::new(Mutex::new(Vec::new()));
    let subtree_hits = Arc::new(Mutex::new(Vec::new()));

    let default_sink = Arc::clone(&default_hits);
    let subtree_sink = Arc::clone(&subtree_hits);

    let mut d = NotifyMap::builder()
        .on_pattern("*", move |path, _value| {
            default_sink.lock().unwrap().push(path.to_string());
        })
        .on_pattern("B/*", move |path, _value| {
            subtree_sink.lock().unwrap().push(path.to_string());
        })
        .build_from(tree! { "A" => 10, "B" => { "Ba" => 100, "Bb" => 200 } })
        .unwrap();

    // d['C'] = 9 -> default
    d.insert("C", 9);
    // d['B']['Bh'] = 8 -> subtree, not default
    d.get_map_mut("B").unwrap().insert("Bh", 8);

    assert_eq!(*default_hits.lock().unwrap(), ["C"]);
    assert_eq!(*subtree_hits.lock().unwrap(), ["B/Bh"]);
}

#[test]
fn test_exact_pattern_beats_subtree() {
    let exact = Arc::new(AtomicUsize::new(0));
    let subtree = Arc::new(AtomicUsize::new(0));

    let exact_counter = Arc::clone(&exact);
    let subtree_counter = Arc::clone(&subtree);

    let mut d = NotifyMap::builder()
        .on_pattern("B/Ba", move |_path, _value| {
            exact_counter.fetch_add(1, Ordering::SeqCst);
        })
        .on_pattern("B/*", move |_path, _value| {
            subtree_counter.fetch_add(1, Ordering::SeqCst);
        })
        .build_from(tree! { "B" => { "Ba" => 100, "Bb" => 200 } })
        .unwrap();

    let b = d.get_map_mut("B").unwrap();
    b.insert("Ba", 101);
    b.insert("Bb", 201);

    assert_eq!(exact.load(Ordering::SeqCst), 1);
    assert_eq!(subtree.load(Ordering::SeqCst), 1);
}

#[test]
fn test_unmatched_path_is_silent() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);

    let mut d = NotifyMap::builder()
        .on_pattern("B/*", move |_path, _value| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .build_from(tree! { "B" => { "Ba" => 100 } })
        .unwrap();

    // Top-level key matches no pattern and no default is registered.
    d.insert("C", 9);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert_eq!(d.get_leaf("C"), Some(&9));

    d.get_map_mut("B").unwrap().insert("Bh", 8);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_removal_notifies_with_none() {
    let (mut d, log) = logged_map(tree! {
        "A" => 10,
        "B" => { "Ba" => 100 },
    });

    d.remove("A");
    d.get_map_mut("B").unwrap().remove("Ba");

    assert_eq!(
        *log.lock().unwrap(),
        [("A".to_string(), None), ("B/Ba".to_string(), None)]
    );
}

#[test]
fn test_reads_never_notify() {
    let (d, log) = logged_map(tree! {
        "A" => 10,
        "B" => { "Ba" => 100 },
    });

    assert_eq!(d.get_leaf("A"), Some(&10));
    assert!(d.get("B").is_some());
    assert_eq!(d.get_path("B/Ba").and_then(Value::as_leaf), Some(&100));
    assert_eq!(d.len(), 2);

    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_store_commits_even_if_callback_panics() {
    // The callback runs after the store: a failing callback propagates out
    // of the mutating call but does not roll the data back.
    let mut d = NotifyMap::new(|path: &str, _value: Option<&Value<i32>>| {
        if path == "boom" {
            panic!("callback failure");
        }
    });

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        d.insert("boom", 1);
    }));
    assert!(result.is_err());

    assert_eq!(d.get_leaf("boom"), Some(&1));
}

#[test]
fn test_sub_map_assignment_then_deep_mutation_paths() {
    let (mut d, log) = logged_map(tree! {});

    d.insert("B", tree! { "Ba" => { "Bc" => 1 } });
    d.get_map_mut("B")
        .unwrap()
        .get_map_mut("Ba")
        .unwrap()
        .insert("Bd", 2);

    let log = log.lock().unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].0, "B");
    assert_eq!(log[1], ("B/Ba/Bd".to_string(), Some(2)));
}
