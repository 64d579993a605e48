//! # Binding Lifecycle
//!
//! Prototype/bound separation, owner bookkeeping, weak owner handles and
//! listener aliasing, exercised through the public API only.

use std::cell::Cell;
use std::rc::Rc;

use formify_core::{FormError, Value};
use formify_validator::{Event, IntegerField, Owner, StringField, Validator};

fn integer(key: &str) -> Validator {
    Validator::builder(IntegerField).key(key).build()
}

// =========================================================================
// bind / unbind invariants
// =========================================================================

#[test]
fn bound_instance_is_stored_under_its_key() {
    let owner = Owner::new();
    assert!(!Validator::has_bound_validators(&owner));

    let bound = integer("age").bind(&owner).unwrap();
    assert!(Validator::has_bound_validators(&owner));
    let stored = Validator::get_bound_validator(&owner, Some("age")).unwrap();
    assert!(Rc::ptr_eq(&stored, &bound));
    assert!(Validator::get_bound_validator(&owner, Some("name")).is_none());
}

#[test]
fn prototype_is_reusable_across_owners() {
    let prototype = integer("age");
    let first = Owner::with_key("a");
    let second = Owner::with_key("b");

    let a = prototype.bind(&first).unwrap();
    let b = prototype.bind(&second).unwrap();
    a.borrow_mut().process("1").unwrap();

    assert!(!Rc::ptr_eq(&a, &b));
    assert_eq!(a.borrow().value(), &Value::Int(1));
    assert!(b.borrow().value().is_undefined());
    assert!(!prototype.is_bound());
    assert!(prototype.value().is_undefined());
}

#[test]
fn binding_a_bound_instance_fails() {
    let owner = Owner::new();
    let other = Owner::new();
    let bound = integer("age").bind(&owner).unwrap();
    let err = bound.borrow().bind(&other).unwrap_err();
    assert!(matches!(err, FormError::AlreadyBound { .. }));
    assert!(!Validator::has_bound_validators(&other));
}

#[test]
fn unbinding_twice_fails() {
    let owner = Owner::new();
    let bound = integer("age").bind(&owner).unwrap();
    bound.borrow_mut().unbind().unwrap();
    let err = bound.borrow_mut().unbind().unwrap_err();
    assert!(matches!(err, FormError::NotBound(_)));
}

#[test]
fn unbind_removes_entry_and_keeps_state() {
    let owner = Owner::new();
    let bound = integer("age").bind(&owner).unwrap();
    bound.borrow_mut().process("abc").unwrap();

    bound.borrow_mut().unbind().unwrap();
    let v = bound.borrow();
    assert!(!v.is_bound());
    assert!(v.owner().is_none());
    assert_eq!(v.namespace(), None);
    assert!(!Validator::is_bound_to(&owner, Some("age")));
    assert_eq!(v.raw_value(), &Value::from("abc"));
    assert_eq!(v.errors().len(), 1);
}

#[test]
fn unbound_instance_becomes_strict() {
    let owner = Owner::new();
    let bound = integer("age").bind(&owner).unwrap();
    bound.borrow_mut().unbind().unwrap();

    let mut v = bound.borrow_mut();
    assert!(v.process("abc").is_err());
    assert!(v.is_valid().unwrap());
}

#[test]
fn unbound_instance_can_serve_as_prototype() {
    let owner = Owner::new();
    let bound = integer("age").bind(&owner).unwrap();
    bound.borrow_mut().unbind().unwrap();

    let again = bound.borrow().bind(&owner).unwrap();
    assert!(again.borrow().is_bound());
    assert!(Validator::is_bound_to(&owner, Some("age")));
}

// =========================================================================
// Weak owner
// =========================================================================

#[test]
fn dropping_the_owner_orphans_bound_validators() {
    let owner = Owner::with_key("signup");
    let bound = integer("age").bind(&owner).unwrap();
    assert_eq!(bound.borrow().owner().unwrap().key(), Some("signup"));

    drop(owner);
    assert!(bound.borrow().owner().is_none());
}

#[test]
fn owner_is_freed_while_validators_survive() {
    let owner = Owner::new();
    let weak = Rc::downgrade(&owner);
    let bound = integer("age").bind(&owner).unwrap();
    drop(owner);

    assert!(weak.upgrade().is_none());
    assert_eq!(Rc::strong_count(&bound), 1);
}

#[test]
fn orphaned_validator_still_collects_errors() {
    let owner = Owner::new();
    let bound = integer("age").bind(&owner).unwrap();
    drop(owner);

    let mut v = bound.borrow_mut();
    assert_eq!(v.process("abc").unwrap(), Value::Undefined);
    assert_eq!(v.errors().len(), 1);
}

// =========================================================================
// Listener aliasing
// =========================================================================

#[test]
fn prototype_postvalidate_runs_on_every_bound_instance() {
    let calls = Rc::new(Cell::new(0));
    let seen = Rc::clone(&calls);
    let prototype = Validator::builder(StringField)
        .key("name")
        .on(Event::Postvalidate, move |_, _, value| {
            seen.set(seen.get() + 1);
            Ok(value)
        })
        .build();

    for _ in 0..3 {
        let owner = Owner::new();
        let bound = prototype.bind(&owner).unwrap();
        bound.borrow_mut().process("x").unwrap();
    }
    assert_eq!(calls.get(), 3);
}

#[test]
fn instance_bound_from_instance_reads_original_listeners() {
    let prototype = Validator::builder(IntegerField)
        .key("n")
        .on(Event::Postvalidate, |_, _, value| Ok(Value::Int(value.as_int().unwrap_or(0) + 1)))
        .build();
    let owner = Owner::new();
    let first = prototype.bind(&owner).unwrap();
    first.borrow_mut().unbind().unwrap();

    let second = first.borrow().bind(&owner).unwrap();
    assert_eq!(second.borrow_mut().process(1).unwrap(), Value::Int(2));
}
