#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::thread;

use super::*;
use crate::test_fixtures::{person, provider, scores};

#[test]
fn synthesizes_on_first_request_only() {
    let lazy = LazyAccessors::new(provider());
    assert_eq!(lazy.synthesized(), 0);

    let owner = person().identity();
    let first = lazy.accessor(&owner, AccessorKey::Setter(0)).unwrap();
    let second = lazy.accessor(&owner, AccessorKey::Setter(0)).unwrap();
    assert!(first.ptr_eq(&second));
    assert_eq!(lazy.synthesized(), 1);
}

#[test]
fn failures_are_not_memoized() {
    let lazy = LazyAccessors::new(provider());
    let owner = person().identity();
    assert!(lazy.accessor(&owner, AccessorKey::Setter(2)).is_err());
    assert_eq!(lazy.synthesized(), 0);
}

#[test]
fn concurrent_callers_observe_one_instance() {
    let lazy = LazyAccessors::new(provider());
    let owner = scores().identity();

    let accessors: Vec<Accessor> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| lazy.accessor(&owner, AccessorKey::DictionaryAdd)))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap().unwrap())
            .collect()
    });

    let first = &accessors[0];
    assert!(accessors.iter().all(|a| a.ptr_eq(first)));
    assert_eq!(lazy.synthesized(), 1);
}
