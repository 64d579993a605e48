//! # Owners — Schema Instances Validators Bind To
//!
//! An [`Owner`] is the runtime side of a schema: it keeps the map of
//! validators currently bound to it, keyed by field key. The map is created
//! lazily on the first bind, so "has this owner ever had validators bound"
//! is observable.
//!
//! A bound validator points back at its owner through [`OwnerRef`], a
//! non-owning handle. The owner holds its validators strongly, the
//! validators never hold the owner, so there is no reference cycle and
//! dropping the last `Rc<Owner>` frees the schema even while callers still
//! hold some of its validators. Such orphaned validators see `None` from
//! [`OwnerRef::upgrade`].

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use formify_core::Value;

use crate::validator::Validator;

/// Shared handle to a bound validator. The same handle is stored in the
/// owner's map and returned from `bind`.
pub type SharedValidator = Rc<RefCell<Validator>>;

type BoundMap = BTreeMap<Option<String>, SharedValidator>;

/// A schema instance validators can be bound to.
#[derive(Default)]
pub struct Owner {
    key: Option<String>,
    bound: RefCell<Option<BoundMap>>,
}

impl Owner {
    /// Create an owner without a key.
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Create an owner whose key becomes the namespace of its validators.
    pub fn with_key(key: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            key: Some(key.into()),
            bound: RefCell::new(None),
        })
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// `true` once at least one validator has ever been bound.
    pub fn has_bound_validators(&self) -> bool {
        self.bound.borrow().is_some()
    }

    /// `true` if a validator is currently bound under `key`.
    pub fn is_bound_to(&self, key: Option<&str>) -> bool {
        self.bound
            .borrow()
            .as_ref()
            .is_some_and(|map| map.contains_key(&key.map(str::to_owned)))
    }

    /// The validator currently bound under `key`.
    pub fn bound_validator(&self, key: Option<&str>) -> Option<SharedValidator> {
        self.bound
            .borrow()
            .as_ref()
            .and_then(|map| map.get(&key.map(str::to_owned)).cloned())
    }

    /// Run `f` on the validator bound under `key`.
    ///
    /// `None` when nothing is bound under `key` or that validator is being
    /// processed. A listener's own field is always being processed, so this
    /// is how listeners read fields of their owner.
    pub fn inspect<R>(&self, key: Option<&str>, f: impl FnOnce(&Validator) -> R) -> Option<R> {
        let validator = self.bound_validator(key)?;
        let guard = validator.try_borrow().ok()?;
        Some(f(&guard))
    }

    /// Current values of the bound validators, skipping any that is being
    /// processed.
    pub fn bound_values(&self) -> BTreeMap<Option<String>, Value> {
        let bound = self.bound.borrow();
        let Some(map) = bound.as_ref() else {
            return BTreeMap::new();
        };
        map.iter()
            .filter_map(|(key, validator)| {
                let value = validator.try_borrow().ok()?.value().clone();
                Some((key.clone(), value))
            })
            .collect()
    }

    /// Keys of all currently bound validators, in key order.
    pub fn bound_keys(&self) -> Vec<Option<String>> {
        self.bound
            .borrow()
            .as_ref()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Record `validator` under `key`, returning the one it replaces.
    pub(crate) fn attach(&self, key: Option<String>, validator: SharedValidator) -> Option<SharedValidator> {
        self.bound
            .borrow_mut()
            .get_or_insert_with(BTreeMap::new)
            .insert(key, validator)
    }

    /// Remove the entry under `key` if it is the validator at `target`.
    ///
    /// Entries that were replaced by a later bind under the same key are
    /// left alone.
    pub(crate) fn detach(&self, key: &Option<String>, target: *const Validator) -> bool {
        let mut bound = self.bound.borrow_mut();
        let Some(map) = bound.as_mut() else {
            return false;
        };
        let matches = map
            .get(key)
            .is_some_and(|entry| std::ptr::eq(entry.as_ptr().cast_const(), target));
        if matches {
            map.remove(key);
        }
        matches
    }
}

impl fmt::Debug for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Owner")
            .field("key", &self.key)
            .field("bound", &self.bound_keys())
            .finish()
    }
}

/// Non-owning handle from a bound validator to its owner.
///
/// Upgrading yields `None` once every `Rc<Owner>` is gone; it never yields a
/// stale owner.
#[derive(Clone)]
pub struct OwnerRef(Weak<Owner>);

impl OwnerRef {
    pub fn new(owner: &Rc<Owner>) -> Self {
        Self(Rc::downgrade(owner))
    }

    pub fn upgrade(&self) -> Option<Rc<Owner>> {
        self.0.upgrade()
    }

    /// `true` once the owner has been dropped.
    pub fn is_expired(&self) -> bool {
        self.0.strong_count() == 0
    }

    /// `true` if this handle refers to `owner`.
    pub fn points_to(&self, owner: &Rc<Owner>) -> bool {
        Weak::ptr_eq(&self.0, &Rc::downgrade(owner))
    }
}

impl fmt::Debug for OwnerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(owner) => write!(f, "OwnerRef({:?})", owner.key()),
            None => f.write_str("OwnerRef(<dropped>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{IntegerField, StringField};

    #[test]
    fn bound_map_is_created_lazily() {
        let owner = Owner::new();
        assert!(!owner.has_bound_validators());
        assert!(!owner.is_bound_to(Some("age")));
        assert!(owner.bound_keys().is_empty());
    }

    #[test]
    fn inspect_skips_validators_being_processed() {
        let owner = Owner::new();
        let age = Validator::builder(IntegerField).key("age").build().bind(&owner).unwrap();
        let name = Validator::builder(StringField).key("name").build().bind(&owner).unwrap();
        name.borrow_mut().process("Ada").unwrap();

        let held = age.borrow_mut();
        assert!(owner.inspect(Some("age"), |v| v.value().clone()).is_none());
        assert_eq!(owner.inspect(Some("name"), |v| v.value().clone()), Some(Value::from("Ada")));
        assert!(owner.inspect(Some("missing"), |v| v.value().clone()).is_none());

        let values = owner.bound_values();
        assert_eq!(values.len(), 1);
        assert_eq!(values[&Some("name".to_owned())], Value::from("Ada"));

        drop(held);
        assert_eq!(owner.bound_values().len(), 2);
    }

    #[test]
    fn handle_expires_with_owner() {
        let owner = Owner::with_key("signup");
        let handle = OwnerRef::new(&owner);
        assert!(handle.points_to(&owner));
        assert_eq!(handle.upgrade().unwrap().key(), Some("signup"));

        drop(owner);
        assert!(handle.is_expired());
        assert!(handle.upgrade().is_none());
    }
}
