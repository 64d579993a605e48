//! # Validator Configuration — Sealed Records and Their Builder
//!
//! A prototype's configuration is assembled once through
//! [`ValidatorBuilder`] and sealed by [`ValidatorBuilder::build`]. After
//! that it is immutable: `bind` hands the same record to every bound
//! instance, and a derived prototype starts from
//! [`Validator::to_builder`](crate::Validator::to_builder), which copies
//! the record instead of mutating it.
//!
//! Keys outside the well-known set (`key`, `label`, `default`,
//! `description`, `required`) are kept verbatim in
//! [`ValidatorConfig::extra`] so custom field types and bind listeners can
//! read them.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use formify_core::{FieldError, FormResult, Value};

use crate::event::{binder, listener, Event, Hooks};
use crate::fields::FieldType;
use crate::owner::Owner;
use crate::validator::Validator;

/// Display label of a field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Label {
    /// Derive the label from the key: `first_name` becomes `First name`.
    #[default]
    FromKey,
    /// The field deliberately has no label.
    Absent,
    /// Explicit label text.
    Text(String),
}

/// Default value applied when a prototype is bound.
#[derive(Clone, Default)]
pub enum DefaultValue {
    #[default]
    Absent,
    Value(Value),
    /// Evaluated every time the default is read.
    Producer(Rc<dyn Fn() -> Value>),
}

impl DefaultValue {
    /// Current default. `Value::Undefined` when absent.
    pub fn resolve(&self) -> Value {
        match self {
            Self::Absent => Value::Undefined,
            Self::Value(value) => value.clone(),
            Self::Producer(produce) => produce(),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("Absent"),
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

/// Sealed configuration of a validator prototype.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    pub key: Option<String>,
    pub label: Label,
    pub default: DefaultValue,
    pub description: Option<String>,
    pub required: bool,
    /// Options not understood by the validator itself.
    pub extra: BTreeMap<String, Value>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            key: None,
            label: Label::default(),
            default: DefaultValue::default(),
            description: None,
            required: true,
            extra: BTreeMap::new(),
        }
    }
}

impl ValidatorConfig {
    /// Resolved label text, `None` when absent or when it would be derived
    /// from a missing key.
    pub fn label_text(&self) -> Option<String> {
        match &self.label {
            Label::FromKey => self.key.as_deref().map(humanize),
            Label::Absent => None,
            Label::Text(text) => Some(text.clone()),
        }
    }
}

fn humanize(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

// ─── Builder ─────────────────────────────────────────────────────────

/// Collects configuration and listeners for a new prototype.
#[derive(Debug, Clone)]
pub struct ValidatorBuilder {
    field: Rc<dyn FieldType>,
    config: ValidatorConfig,
    hooks: Hooks,
}

impl ValidatorBuilder {
    pub fn new(field: impl FieldType + 'static) -> Self {
        Self::with_field(Rc::new(field))
    }

    pub fn with_field(field: Rc<dyn FieldType>) -> Self {
        Self {
            field,
            config: ValidatorConfig::default(),
            hooks: Hooks::default(),
        }
    }

    pub(crate) fn from_parts(field: Rc<dyn FieldType>, config: ValidatorConfig, hooks: Hooks) -> Self {
        Self { field, config, hooks }
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.config.key = Some(key.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.config.label = Label::Text(label.into());
        self
    }

    pub fn no_label(mut self) -> Self {
        self.config.label = Label::Absent;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.config.default = DefaultValue::Value(value.into());
        self
    }

    pub fn default_with<F>(mut self, produce: F) -> Self
    where
        F: Fn() -> Value + 'static,
    {
        self.config.default = DefaultValue::Producer(Rc::new(produce));
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.config.description = Some(description.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.config.required = required;
        self
    }

    /// Store an option for custom field types or bind listeners.
    pub fn option(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config.extra.insert(name.into(), value.into());
        self
    }

    /// Attach a listener to a value-processing event.
    pub fn on<F>(mut self, event: Event, f: F) -> Self
    where
        F: Fn(Option<&Owner>, Option<&str>, Value) -> Result<Value, FieldError> + 'static,
    {
        self.hooks.register(event, listener(f));
        self
    }

    /// Replace the default bind strategy.
    pub fn on_bind<F>(mut self, f: F) -> Self
    where
        F: Fn(&Rc<Owner>, Option<&str>, &Rc<dyn FieldType>, &ValidatorConfig) -> FormResult<Validator> + 'static,
    {
        self.hooks.register_binder(binder(f));
        self
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Seal the configuration and produce the prototype.
    pub fn build(self) -> Validator {
        Validator::with_hooks(self.field, self.config, self.hooks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::IntegerField;

    #[test]
    fn required_by_default() {
        assert!(ValidatorConfig::default().required);
    }

    #[test]
    fn label_derives_from_key() {
        let config = ValidatorBuilder::new(IntegerField).key("first_name").config().clone();
        assert_eq!(config.label_text().as_deref(), Some("First name"));
    }

    #[test]
    fn derived_label_lowercases_the_tail() {
        let config = ValidatorBuilder::new(IntegerField).key("First_Name").config().clone();
        assert_eq!(config.label_text().as_deref(), Some("First name"));
        assert_eq!(humanize("URL"), "Url");
    }

    #[test]
    fn label_can_be_explicit_or_absent() {
        let explicit = ValidatorBuilder::new(IntegerField).key("age").label("Your age");
        assert_eq!(explicit.config().label_text().as_deref(), Some("Your age"));

        let absent = ValidatorBuilder::new(IntegerField).key("age").no_label();
        assert_eq!(absent.config().label_text(), None);
        assert_eq!(ValidatorConfig::default().label_text(), None);
    }

    #[test]
    fn producer_default_is_evaluated_on_every_read() {
        use std::cell::Cell;

        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let builder = ValidatorBuilder::new(IntegerField).default_with(move || {
            counter.set(counter.get() + 1);
            Value::Int(counter.get())
        });

        let default = &builder.config().default;
        assert_eq!(default.resolve(), Value::Int(1));
        assert_eq!(default.resolve(), Value::Int(2));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn extra_options_are_kept() {
        let builder = ValidatorBuilder::new(IntegerField).option("min", 3);
        assert_eq!(builder.config().extra.get("min"), Some(&Value::Int(3)));
        assert!(builder.config().default.is_absent());
    }
}
