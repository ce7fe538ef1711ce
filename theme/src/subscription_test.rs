use super::*;
use std::cell::Cell;
use std::rc::Rc;

fn counting() -> (Rc<Cell<u32>>, Subscription) {
    let count = Rc::new(Cell::new(0));
    let seen = Rc::clone(&count);
    (count, Subscription::new(move || seen.set(seen.get() + 1)))
}

#[test]
fn drop_runs_teardown_once() {
    let (count, sub) = counting();
    assert!(sub.is_active());
    drop(sub);
    assert_eq!(count.get(), 1);
}

#[test]
fn unsubscribe_runs_teardown_once() {
    let (count, sub) = counting();
    sub.unsubscribe();
    assert_eq!(count.get(), 1);
}

#[test]
fn noop_is_inactive() {
    let sub = Subscription::noop();
    assert!(!sub.is_active());
    assert_eq!(format!("{sub:?}"), "Subscription { active: false }");
}
