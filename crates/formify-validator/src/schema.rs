//! # Schemas and Forms
//!
//! A [`Schema`] is the declaration: an ordered list of prototype
//! validators. [`Schema::instantiate`] binds every prototype to a fresh
//! [`Owner`] and wraps it in a [`Form`], the runtime object input is
//! assigned to.
//!
//! A form behaves like a mapping from field key to processed value through
//! [`MappingAccess`]: only fields holding a defined value count as present,
//! assignment runs the field's pipeline, deletion resets the field.

use std::collections::BTreeMap;
use std::rc::Rc;

use formify_core::{FormError, FormResult, MappingAccess, Value};

use crate::owner::{Owner, SharedValidator};
use crate::validator::Validator;

/// Ordered collection of prototype validators.
#[derive(Debug, Default)]
pub struct Schema {
    key: Option<String>,
    fields: Vec<Validator>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schema whose key becomes the namespace of its bound fields.
    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            fields: Vec::new(),
        }
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Append a prototype. A prototype with the same key is replaced in
    /// place.
    pub fn field(mut self, prototype: Validator) -> Self {
        self.push(prototype);
        self
    }

    pub fn push(&mut self, prototype: Validator) {
        let existing = self
            .fields
            .iter()
            .position(|field| field.key().is_some() && field.key() == prototype.key());
        match existing {
            Some(index) => self.fields[index] = prototype,
            None => self.fields.push(prototype),
        }
    }

    pub fn fields(&self) -> &[Validator] {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Validator> {
        self.fields.iter().find(|field| field.key() == Some(key))
    }

    /// Bind every prototype to a new owner, in declaration order.
    ///
    /// # Errors
    ///
    /// [`FormError::Descriptor`] if a prototype has no key. Errors from
    /// binding are returned as is.
    pub fn instantiate(&self) -> FormResult<Form> {
        let owner = match &self.key {
            Some(key) => Owner::with_key(key.clone()),
            None => Owner::new(),
        };
        let mut order = Vec::with_capacity(self.fields.len());
        for (index, prototype) in self.fields.iter().enumerate() {
            let key = prototype
                .key()
                .ok_or_else(|| FormError::Descriptor(format!("schema field #{index} has no key")))?;
            prototype.bind(&owner)?;
            order.push(key.to_owned());
        }
        tracing::debug!(schema = ?self.key, fields = order.len(), "instantiated form");
        Ok(Form { owner, order })
    }
}

/// A schema instance holding one bound validator per field.
#[derive(Debug)]
pub struct Form {
    owner: Rc<Owner>,
    order: Vec<String>,
}

impl Form {
    pub fn owner(&self) -> &Rc<Owner> {
        &self.owner
    }

    /// Field keys in declaration order.
    pub fn field_keys(&self) -> &[String] {
        &self.order
    }

    pub fn field(&self, key: &str) -> Option<SharedValidator> {
        self.owner.bound_validator(Some(key))
    }

    fn require_field(&self, key: &str) -> FormResult<SharedValidator> {
        self.field(key).ok_or_else(|| FormError::KeyNotFound(key.to_owned()))
    }

    /// Process `value` through the field `key`.
    pub fn process(&self, key: &str, value: impl Into<Value>) -> FormResult<Value> {
        self.require_field(key)?.borrow_mut().process(value)
    }

    /// Process every input entry whose key names a field. Returns the keys
    /// that matched no field.
    pub fn process_all(&self, input: &BTreeMap<String, Value>) -> FormResult<Vec<String>> {
        let mut unknown = Vec::new();
        for (key, value) in input {
            match self.field(key) {
                Some(field) => {
                    field.borrow_mut().process(value.clone())?;
                }
                None => unknown.push(key.clone()),
            }
        }
        Ok(unknown)
    }

    /// Validate every field. Each field is evaluated even after an earlier
    /// one failed. Fields unbound from the form are skipped.
    pub fn is_valid(&self) -> FormResult<bool> {
        let mut valid = true;
        for key in &self.order {
            match self.field(key) {
                Some(field) => valid &= field.borrow_mut().is_valid()?,
                None => tracing::debug!(key = %key, "skipping unbound field"),
            }
        }
        Ok(valid)
    }

    /// Messages of every failing field, by key.
    pub fn errors(&self) -> BTreeMap<String, Vec<String>> {
        self.order
            .iter()
            .filter_map(|key| {
                let field = self.field(key)?;
                let errors = field.borrow().errors().to_vec();
                (!errors.is_empty()).then(|| (key.clone(), errors))
            })
            .collect()
    }

    /// Defined values as a JSON object, in key order.
    pub fn to_json(&self) -> serde_json::Value {
        let object = self
            .order
            .iter()
            .filter_map(|key| Some((key.clone(), serde_json::Value::from(self.get_item(key)?))))
            .collect();
        serde_json::Value::Object(object)
    }
}

impl MappingAccess for Form {
    type Key = String;
    type Item = Value;

    fn iter_keys(&self) -> impl Iterator<Item = String> + '_ {
        self.order
            .iter()
            .filter(move |key| self.get_item(key).is_some())
            .cloned()
    }

    fn get_item(&self, key: &String) -> Option<Value> {
        let field = self.field(key)?;
        let value = field.borrow().value().clone();
        value.is_defined().then_some(value)
    }

    fn set_item(&mut self, key: String, value: Value) -> FormResult<()> {
        self.process(&key, value).map(drop)
    }

    fn del_item(&mut self, key: &String) -> FormResult<()> {
        if !self.contains_key(key) {
            return Err(FormError::KeyNotFound(key.clone()));
        }
        self.require_field(key)?.borrow_mut().reset();
        Ok(())
    }
}
