//! # Event Hooks — Listener Chains Attached to Validators
//!
//! Schema authors customise field behavior without writing a new field type
//! by attaching listeners to a validator prototype:
//!
//! - `prevalidate`, `postvalidate`, `validate` listeners receive
//!   `(owner, key, value)` and return the (possibly transformed) value.
//! - `bind` listeners receive `(owner, key, field type, configuration)` and
//!   produce the bound instance themselves.
//!
//! Listeners live in [`Hooks`], sealed when the prototype is built. A
//! validator's [`EventSlots`] hold its own hooks plus an optional read-access
//! alias; a bound instance is aliased to the prototype it was bound from, so
//! every lookup that runs listeners resolves against the prototype's chain.
//!
//! Listener errors are returned unchanged. Deciding whether an error is
//! collected or propagated is the validator's job, not the pipeline's.

use std::fmt;
use std::rc::Rc;

use formify_core::{FieldError, FormResult, Value};

use crate::config::ValidatorConfig;
use crate::fields::FieldType;
use crate::owner::Owner;
use crate::validator::Validator;

/// Value-processing events a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Event {
    Prevalidate,
    Postvalidate,
    Validate,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prevalidate => "prevalidate",
            Self::Postvalidate => "postvalidate",
            Self::Validate => "validate",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Listener for the value-processing events.
///
/// Runs while its own validator is mutably borrowed. Read the owner's fields
/// through [`Owner::inspect`] or [`Owner::bound_values`].
pub type Listener = Rc<dyn Fn(Option<&Owner>, Option<&str>, Value) -> Result<Value, FieldError>>;

/// Listener for the bind event: builds the bound instance.
pub type Binder =
    Rc<dyn Fn(&Rc<Owner>, Option<&str>, &Rc<dyn FieldType>, &ValidatorConfig) -> FormResult<Validator>>;

/// Wrap a closure as a [`Listener`].
pub fn listener<F>(f: F) -> Listener
where
    F: Fn(Option<&Owner>, Option<&str>, Value) -> Result<Value, FieldError> + 'static,
{
    Rc::new(f)
}

/// Wrap a closure as a [`Binder`].
pub fn binder<F>(f: F) -> Binder
where
    F: Fn(&Rc<Owner>, Option<&str>, &Rc<dyn FieldType>, &ValidatorConfig) -> FormResult<Validator> + 'static,
{
    Rc::new(f)
}

/// How a listener chain is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    /// Run every listener in registration order, threading the value through.
    Chain,
    /// Run only the listener at this registration index. Out of range is the
    /// identity transform.
    Single(usize),
}

/// Which lookups an alias redirects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasMode {
    ReadAccess,
}

/// Ordered listener lists, one per event.
#[derive(Clone, Default)]
pub struct Hooks {
    prevalidate: Vec<Listener>,
    postvalidate: Vec<Listener>,
    validate: Vec<Listener>,
    bind: Vec<Binder>,
}

impl Hooks {
    /// Append `listener` to the chain for `event`. Duplicates are allowed.
    pub fn register(&mut self, event: Event, listener: Listener) {
        self.slot_mut(event).push(listener);
    }

    /// Append a bind listener. The most recently registered one wins.
    pub fn register_binder(&mut self, binder: Binder) {
        self.bind.push(binder);
    }

    pub fn listeners(&self, event: Event) -> &[Listener] {
        match event {
            Event::Prevalidate => &self.prevalidate,
            Event::Postvalidate => &self.postvalidate,
            Event::Validate => &self.validate,
        }
    }

    pub fn binders(&self) -> &[Binder] {
        &self.bind
    }

    pub fn is_empty(&self) -> bool {
        self.prevalidate.is_empty()
            && self.postvalidate.is_empty()
            && self.validate.is_empty()
            && self.bind.is_empty()
    }

    fn slot_mut(&mut self, event: Event) -> &mut Vec<Listener> {
        match event {
            Event::Prevalidate => &mut self.prevalidate,
            Event::Postvalidate => &mut self.postvalidate,
            Event::Validate => &mut self.validate,
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("prevalidate", &self.prevalidate.len())
            .field("postvalidate", &self.postvalidate.len())
            .field("validate", &self.validate.len())
            .field("bind", &self.bind.len())
            .finish()
    }
}

/// A validator's own hooks plus the hooks its lookups are redirected to.
#[derive(Debug, Clone, Default)]
pub struct EventSlots {
    own: Rc<Hooks>,
    read_alias: Option<Rc<Hooks>>,
}

impl EventSlots {
    pub fn new(hooks: Hooks) -> Self {
        Self {
            own: Rc::new(hooks),
            read_alias: None,
        }
    }

    /// Listeners registered on this validator itself. Aliases are not
    /// followed.
    pub fn get_listeners(&self, event: Event) -> &[Listener] {
        self.own.listeners(event)
    }

    /// Redirect lookups to whatever `target` resolves to. Alias chains
    /// collapse, so an instance bound from a re-bound validator still reads
    /// the original prototype's hooks.
    pub fn alias_of(&mut self, target: &EventSlots, mode: AliasMode) {
        match mode {
            AliasMode::ReadAccess => {
                self.read_alias = Some(Rc::clone(target.resolved_rc()));
            }
        }
    }

    pub fn is_aliased(&self) -> bool {
        self.read_alias.is_some()
    }

    /// The hooks lookups resolve against.
    pub fn resolved(&self) -> &Hooks {
        self.resolved_rc()
    }

    fn resolved_rc(&self) -> &Rc<Hooks> {
        self.read_alias.as_ref().unwrap_or(&self.own)
    }

    /// The bind listener in effect, if any.
    pub fn binder(&self) -> Option<&Binder> {
        self.resolved().binders().last()
    }

    /// Invoke the listener chain for `event`.
    ///
    /// With no listeners registered this is the identity transform.
    pub fn pipeline(
        &self,
        event: Event,
        priority: Priority,
        owner: Option<&Owner>,
        key: Option<&str>,
        value: Value,
    ) -> Result<Value, FieldError> {
        let listeners = self.resolved().listeners(event);
        match priority {
            Priority::Chain => listeners
                .iter()
                .try_fold(value, |acc, listener| listener(owner, key, acc)),
            Priority::Single(index) => match listeners.get(index) {
                Some(listener) => listener(owner, key, value),
                None => Ok(value),
            },
        }
    }
}
