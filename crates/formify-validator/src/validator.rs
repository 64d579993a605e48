//! # Validator — Prototype/Bound Lifecycle and the Processing Pipeline
//!
//! One type plays both roles. A *prototype* is built once from a
//! [`ValidatorBuilder`] and never processes values for a schema; `bind`
//! turns it into a *bound instance* owned by exactly one [`Owner`].
//!
//! ## Processing
//!
//! [`Validator::process`] runs, in order:
//!
//! 1. list coercion (multivalue fields only),
//! 2. state reset (bound instances only),
//! 3. type check; already-typed input skips to step 6,
//! 4. `prevalidate` (field type reshaping, then listeners),
//! 5. string conversion and a second, strict type check,
//! 6. `postvalidate` listeners,
//! 7. store the result (bound instances only).
//!
//! ## Error Policy
//!
//! A bound instance collects value errors from steps 4 and 6 and
//! conversion errors from step 5 into [`Validator::errors`] and yields
//! `Undefined`. An unbound validator returns them. A value that still fails
//! the type check after conversion is a defect of the field type and is
//! always returned as [`FormError::TypeMismatch`].

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use formify_core::{FieldError, FormError, FormResult, Value, ValueType};

use crate::config::{ValidatorBuilder, ValidatorConfig};
use crate::event::{AliasMode, Event, EventSlots, Hooks, Priority};
use crate::fields::{FieldKind, FieldType};
use crate::owner::{Owner, OwnerRef, SharedValidator};
use crate::visitor::ValidatorVisitor;

/// Message recorded by [`Validator::is_valid`] for a missing required value.
pub const REQUIRED_MESSAGE: &str = "this field is required";

/// A typed field validator, either a prototype or a bound instance.
pub struct Validator {
    field: Rc<dyn FieldType>,
    config: Rc<ValidatorConfig>,
    events: EventSlots,
    key: Option<String>,
    owner: Option<OwnerRef>,
    raw_value: Value,
    value: Value,
    errors: Vec<String>,
}

impl Validator {
    /// Start configuring a prototype for `field`.
    pub fn builder(field: impl FieldType + 'static) -> ValidatorBuilder {
        ValidatorBuilder::new(field)
    }

    /// A detached validator without listeners. Bind listeners use this to
    /// produce the instance they return.
    pub fn new(field: Rc<dyn FieldType>, config: ValidatorConfig) -> Self {
        Self::with_hooks(field, config, Hooks::default())
    }

    pub(crate) fn with_hooks(field: Rc<dyn FieldType>, config: ValidatorConfig, hooks: Hooks) -> Self {
        Self::from_shared(field, Rc::new(config), EventSlots::new(hooks))
    }

    fn from_shared(field: Rc<dyn FieldType>, config: Rc<ValidatorConfig>, events: EventSlots) -> Self {
        Self {
            key: config.key.clone(),
            field,
            config,
            events,
            owner: None,
            raw_value: Value::Undefined,
            value: Value::Undefined,
            errors: Vec::new(),
        }
    }

    /// Copy this validator's configuration and listeners into a new builder.
    pub fn to_builder(&self) -> ValidatorBuilder {
        ValidatorBuilder::from_parts(
            Rc::clone(&self.field),
            (*self.config).clone(),
            self.events.resolved().clone(),
        )
    }

    // ─── Binding ─────────────────────────────────────────────────────

    /// Produce a bound instance of this prototype owned by `owner`.
    ///
    /// A configured default is processed first, without the prototype's
    /// listeners. The instance then reads its listeners from this prototype.
    /// The prototype itself is left untouched.
    ///
    /// # Errors
    ///
    /// [`FormError::AlreadyBound`] if `self` is bound. Errors from a bind
    /// listener or from processing the default are returned as is.
    pub fn bind(&self, owner: &Rc<Owner>) -> FormResult<SharedValidator> {
        if let Some(current) = &self.owner {
            return Err(FormError::AlreadyBound {
                validator: self.describe(),
                owner: describe_owner(current.upgrade().as_deref()),
            });
        }

        let mut bound = match self.events.binder() {
            Some(bind) => bind(owner, self.key(), &self.field, &self.config)?,
            None => Self::from_shared(Rc::clone(&self.field), Rc::clone(&self.config), EventSlots::default()),
        };
        bound.key = self.key.clone();
        bound.owner = Some(OwnerRef::new(owner));

        let default = self.config.default.resolve();
        if default.is_defined() {
            bound.process(default)?;
        }
        bound.events.alias_of(&self.events, AliasMode::ReadAccess);

        let shared = Rc::new(RefCell::new(bound));
        if owner.attach(self.key.clone(), Rc::clone(&shared)).is_some() {
            tracing::debug!(key = ?self.key, "replaced previously bound validator");
        }
        tracing::debug!(
            validator = %self.describe(),
            owner = %describe_owner(Some(owner)),
            "bound validator"
        );
        Ok(shared)
    }

    /// Detach from the owner. Last raw value, value and errors are kept.
    ///
    /// # Errors
    ///
    /// [`FormError::NotBound`] if the validator is not bound.
    pub fn unbind(&mut self) -> FormResult<()> {
        let handle = self.owner.take().ok_or_else(|| FormError::NotBound(self.describe()))?;
        match handle.upgrade() {
            Some(owner) => {
                owner.detach(&self.key, self as *const Self);
            }
            None => tracing::debug!(validator = %self.describe(), "unbinding from a dropped owner"),
        }
        tracing::debug!(validator = %self.describe(), "unbound validator");
        Ok(())
    }

    /// `true` while the validator holds an owner handle, even one whose
    /// owner has since been dropped.
    pub fn is_bound(&self) -> bool {
        self.owner.is_some()
    }

    /// `true` once any validator has been bound to `owner`.
    pub fn has_bound_validators(owner: &Owner) -> bool {
        owner.has_bound_validators()
    }

    pub fn is_bound_to(owner: &Owner, key: Option<&str>) -> bool {
        owner.is_bound_to(key)
    }

    /// The validator bound to `owner` under `key`.
    ///
    /// Listeners run while their own validator is mutably borrowed, so they
    /// must not borrow the handle returned for their own key. Use
    /// [`Owner::inspect`] or [`Owner::bound_values`] instead.
    pub fn get_bound_validator(owner: &Owner, key: Option<&str>) -> Option<SharedValidator> {
        owner.bound_validator(key)
    }

    // ─── Processing ──────────────────────────────────────────────────

    /// Run `value` through the processing pipeline and return the result.
    ///
    /// # Errors
    ///
    /// [`FormError::TypeMismatch`] when conversion yields a value the field
    /// type rejects. On an unbound validator, any [`FieldError`] from the
    /// pipeline as [`FormError::Field`]. On a bound instance, only errors
    /// outside the collected sets.
    pub fn process(&mut self, value: impl Into<Value>) -> FormResult<Value> {
        let mut value = value.into();
        if self.multivalue() {
            value = coerce_list(value);
        }
        if self.is_bound() {
            self.raw_value = value.clone();
            self.value = Value::Undefined;
            self.errors.clear();
        }

        if !self.check_type(&value) {
            let prevalidated = self.prevalidate(value);
            value = self.capture(prevalidated, FieldError::is_value_error)?;
            if value.is_undefined() {
                return Ok(Value::Undefined);
            }

            let converted = self.convert_strings(value);
            value = self.capture(converted, FieldError::is_type_error)?;
            if value.is_undefined() {
                return Ok(Value::Undefined);
            }

            if !self.check_type(&value) {
                tracing::warn!(
                    validator = %self.describe(),
                    value = %value,
                    "conversion produced a value of the wrong type"
                );
                return Err(FormError::TypeMismatch {
                    validator: self.describe(),
                    value: value.to_string(),
                });
            }
        }

        let postvalidated = self.postvalidate(value);
        let value = self.capture(postvalidated, FieldError::is_value_error)?;
        if self.is_bound() {
            self.value = value.clone();
        }
        Ok(value)
    }

    /// Field type reshaping followed by the `prevalidate` listeners.
    pub fn prevalidate(&self, value: Value) -> Result<Value, FieldError> {
        let value = self.field.prevalidate(value)?;
        self.run(Event::Prevalidate, value)
    }

    /// Run the `postvalidate` listeners.
    pub fn postvalidate(&self, value: Value) -> Result<Value, FieldError> {
        self.run(Event::Postvalidate, value)
    }

    /// Run the `validate` listeners.
    pub fn validate(&self, value: Value) -> Result<Value, FieldError> {
        self.run(Event::Validate, value)
    }

    /// Convert one piece of text into the field's target type.
    pub fn from_string(&self, text: &str) -> Result<Value, FieldError> {
        self.field.from_string(text)
    }

    /// Does one value (one element, for multivalue fields) have the
    /// target type?
    pub fn typecheck(&self, value: &Value) -> bool {
        self.field.typecheck(value)
    }

    /// Check the current value and run the `validate` listeners.
    ///
    /// Unbound validators are always valid. Missing required values add
    /// [`REQUIRED_MESSAGE`] to the errors.
    pub fn is_valid(&mut self) -> FormResult<bool> {
        if !self.is_bound() {
            return Ok(true);
        }
        if !self.errors.is_empty() {
            return Ok(false);
        }
        if self.required() && self.value.is_undefined() {
            self.errors.push(REQUIRED_MESSAGE.to_owned());
            return Ok(false);
        }
        let validated = self.validate(self.value.clone());
        self.value = self.capture(validated, FieldError::is_value_error)?;
        Ok(self.errors.is_empty())
    }

    /// Clear raw value, value and errors.
    pub fn reset(&mut self) {
        self.raw_value = Value::Undefined;
        self.value = Value::Undefined;
        self.errors.clear();
    }

    /// Dispatch to the visitor method for this validator's field kind.
    pub fn accept<V>(&self, visitor: &mut V) -> V::Output
    where
        V: ValidatorVisitor + ?Sized,
    {
        match self.field.kind() {
            FieldKind::String => visitor.visit_string(self),
            FieldKind::Integer => visitor.visit_integer(self),
            FieldKind::Float => visitor.visit_float(self),
            FieldKind::Boolean => visitor.visit_boolean(self),
            FieldKind::List => visitor.visit_list(self),
            FieldKind::Custom => visitor.visit_custom(self),
        }
    }

    fn run(&self, event: Event, value: Value) -> Result<Value, FieldError> {
        tracing::trace!(validator = %self.describe(), event = %event, "running listeners");
        let owner = self.owner();
        self.events
            .pipeline(event, Priority::Chain, owner.as_deref(), self.key(), value)
    }

    fn check_type(&self, value: &Value) -> bool {
        if self.multivalue() {
            value.as_list().is_some_and(|items| items.iter().all(|item| self.typecheck(item)))
        } else {
            self.typecheck(value)
        }
    }

    fn convert_strings(&self, value: Value) -> Result<Value, FieldError> {
        match value {
            Value::List(items) if self.multivalue() => items
                .into_iter()
                .map(|item| self.convert_one(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            other => self.convert_one(other),
        }
    }

    fn convert_one(&self, value: Value) -> Result<Value, FieldError> {
        match value {
            Value::Str(text) => self.from_string(&text),
            other => Ok(other),
        }
    }

    /// Collect `result`'s error if bound and `catches` accepts it,
    /// otherwise pass it through.
    fn capture(&mut self, result: Result<Value, FieldError>, catches: fn(&FieldError) -> bool) -> FormResult<Value> {
        match result {
            Ok(value) => Ok(value),
            Err(err) if self.is_bound() && catches(&err) => {
                tracing::debug!(validator = %self.describe(), error = %err, "collected field error");
                self.errors.push(err.to_string());
                Ok(Value::Undefined)
            }
            Err(err) => Err(err.into()),
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────

    /// The field key, fixed at configuration time.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Name of the field type, e.g. `Integer`.
    pub fn name(&self) -> &str {
        self.field.name()
    }

    pub fn kind(&self) -> FieldKind {
        self.field.kind()
    }

    /// `None` when unbound; otherwise the owner's key, or `""` for an owner
    /// without a key or one that has been dropped.
    pub fn namespace(&self) -> Option<String> {
        let handle = self.owner.as_ref()?;
        let key = handle.upgrade().and_then(|owner| owner.key().map(str::to_owned));
        Some(key.unwrap_or_default())
    }

    /// The owning schema instance, or `None` if unbound or the owner is gone.
    pub fn owner(&self) -> Option<Rc<Owner>> {
        self.owner.as_ref().and_then(OwnerRef::upgrade)
    }

    pub fn raw_value(&self) -> &Value {
        &self.raw_value
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn errors_mut(&mut self) -> &mut Vec<String> {
        &mut self.errors
    }

    pub fn label(&self) -> Option<String> {
        self.config.label_text()
    }

    /// The configured default, `Value::Undefined` when there is none.
    pub fn default(&self) -> Value {
        self.config.default.resolve()
    }

    pub fn description(&self) -> Option<&str> {
        self.config.description.as_deref()
    }

    pub fn required(&self) -> bool {
        self.config.required
    }

    pub fn multivalue(&self) -> bool {
        self.field.multivalue()
    }

    pub fn target_type(&self) -> ValueType {
        self.field.target_type()
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn field(&self) -> &Rc<dyn FieldType> {
        &self.field
    }

    pub fn events(&self) -> &EventSlots {
        &self.events
    }

    /// `Name(key)`, used in logs and error messages.
    pub fn describe(&self) -> String {
        format!("{}({})", self.name(), self.key().unwrap_or(""))
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("field", &self.name())
            .field("key", &self.key)
            .field("owner", &self.owner)
            .field("raw_value", &self.raw_value)
            .field("value", &self.value)
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}

fn describe_owner(owner: Option<&Owner>) -> String {
    match owner {
        Some(owner) => owner.key().unwrap_or("<anonymous>").to_owned(),
        None => "<dropped>".to_owned(),
    }
}

/// Lists and absence pass through; a lone value becomes a one-element list.
fn coerce_list(value: Value) -> Value {
    match value {
        Value::List(_) | Value::Undefined | Value::Null => value,
        single => Value::List(vec![single]),
    }
}
