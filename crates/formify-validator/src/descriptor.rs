//! # Schema Descriptors — Declaring Schemas in YAML or JSON
//!
//! A descriptor is the data form of a [`Schema`]:
//!
//! ```yaml
//! key: signup
//! fields:
//!   - key: age
//!     type: integer
//!     label: Your age
//!     default: 18
//!   - key: tags
//!     type: list
//!     element: string
//!     required: false
//! ```
//!
//! Unknown keys are rejected so typos fail loudly. Only built-in field
//! kinds can be declared; custom field types are attached in code.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::rc::Rc;

use formify_core::{FormError, FormResult, Value};
use serde::{Deserialize, Serialize};

use crate::config::ValidatorBuilder;
use crate::fields::{BooleanField, FieldKind, FieldType, FloatField, IntegerField, ListField, StringField};
use crate::schema::Schema;

/// Top-level descriptor document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub fields: Vec<FieldDescriptor>,
}

/// One field of a descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDescriptor {
    pub key: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// Element kind of a `list` field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<FieldKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "required_by_default")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Free-form options, available to listeners through the configuration.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, Value>,
}

fn required_by_default() -> bool {
    true
}

impl FieldDescriptor {
    fn field_type(&self) -> FormResult<Rc<dyn FieldType>> {
        match (self.kind, self.element) {
            (FieldKind::List, Some(element)) => {
                let element = scalar(element)
                    .ok_or_else(|| self.invalid(format!("list element must be a scalar kind, got {element}")))?;
                Ok(Rc::new(ListField::of(element)))
            }
            (FieldKind::List, None) => Err(self.invalid("list field needs an element kind".into())),
            (kind, None) => scalar(kind).ok_or_else(|| self.invalid(format!("{kind} fields cannot be declared here"))),
            (kind, Some(_)) => Err(self.invalid(format!("element is only valid for list fields, not {kind}"))),
        }
    }

    fn invalid(&self, reason: String) -> FormError {
        FormError::Descriptor(format!("field '{}': {reason}", self.key))
    }

    /// Prototype builder configured from this descriptor.
    pub fn to_builder(&self) -> FormResult<ValidatorBuilder> {
        let mut builder = ValidatorBuilder::with_field(self.field_type()?)
            .key(self.key.clone())
            .required(self.required);
        if let Some(label) = &self.label {
            builder = builder.label(label.clone());
        }
        if let Some(description) = &self.description {
            builder = builder.description(description.clone());
        }
        if let Some(default) = &self.default {
            builder = builder.default_value(default.clone());
        }
        for (name, value) in &self.options {
            builder = builder.option(name.clone(), value.clone());
        }
        Ok(builder)
    }
}

fn scalar(kind: FieldKind) -> Option<Rc<dyn FieldType>> {
    match kind {
        FieldKind::String => Some(Rc::new(StringField)),
        FieldKind::Integer => Some(Rc::new(IntegerField)),
        FieldKind::Float => Some(Rc::new(FloatField)),
        FieldKind::Boolean => Some(Rc::new(BooleanField)),
        FieldKind::List | FieldKind::Custom => None,
    }
}

impl SchemaDescriptor {
    /// Build the schema.
    ///
    /// # Errors
    ///
    /// [`FormError::Descriptor`] for duplicate keys, unsupported kinds or a
    /// misplaced `element`.
    pub fn into_schema(self) -> FormResult<Schema> {
        let mut seen = BTreeSet::new();
        let mut schema = match self.key {
            Some(key) => Schema::with_key(key),
            None => Schema::new(),
        };
        for field in &self.fields {
            if !seen.insert(field.key.as_str()) {
                return Err(field.invalid("duplicate key".into()));
            }
            schema.push(field.to_builder()?.build());
        }
        Ok(schema)
    }
}

impl Schema {
    pub fn from_yaml_str(text: &str) -> FormResult<Self> {
        let descriptor: SchemaDescriptor =
            serde_yaml::from_str(text).map_err(|e| FormError::Descriptor(e.to_string()))?;
        descriptor.into_schema()
    }

    pub fn from_json_str(text: &str) -> FormResult<Self> {
        let descriptor: SchemaDescriptor =
            serde_json::from_str(text).map_err(|e| FormError::Descriptor(e.to_string()))?;
        descriptor.into_schema()
    }

    /// Load a descriptor file. `.json` files are read as JSON, anything
    /// else as YAML.
    pub fn from_path(path: &Path) -> FormResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        tracing::debug!(path = %path.display(), json = is_json, "loading schema descriptor");
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SIGNUP: &str = r#"
key: signup
fields:
  - key: name
    type: string
    description: Full name
  - key: age
    type: integer
    label: Your age
    default: 18
  - key: tags
    type: list
    element: string
    required: false
    options:
      max_items: 3
"#;

    #[test]
    fn loads_yaml_descriptor() {
        let schema = Schema::from_yaml_str(SIGNUP).unwrap();
        assert_eq!(schema.key(), Some("signup"));
        assert_eq!(schema.fields().len(), 3);

        let age = schema.get("age").unwrap();
        assert_eq!(age.name(), "Integer");
        assert_eq!(age.label().as_deref(), Some("Your age"));
        assert_eq!(age.default(), Value::Int(18));
        assert!(age.required());

        let tags = schema.get("tags").unwrap();
        assert_eq!(tags.name(), "List[String]");
        assert!(!tags.required());
        assert_eq!(tags.config().extra.get("max_items"), Some(&Value::Int(3)));
    }

    #[test]
    fn default_is_applied_when_instantiated() {
        let form = Schema::from_yaml_str(SIGNUP).unwrap().instantiate().unwrap();
        assert_eq!(form.field("age").unwrap().borrow().value(), &Value::Int(18));
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = Schema::from_yaml_str("fields:\n  - key: a\n    type: string\n    colour: red\n").unwrap_err();
        assert!(matches!(err, FormError::Descriptor(_)));
    }

    #[test]
    fn rejects_inconsistent_fields() {
        let cases = [
            "fields:\n  - key: a\n    type: list\n",
            "fields:\n  - key: a\n    type: list\n    element: list\n",
            "fields:\n  - key: a\n    type: integer\n    element: string\n",
            "fields:\n  - key: a\n    type: custom\n",
            "fields:\n  - key: a\n    type: string\n  - key: a\n    type: integer\n",
        ];
        for case in cases {
            let err = Schema::from_yaml_str(case).unwrap_err();
            assert!(matches!(err, FormError::Descriptor(_)), "accepted: {case}");
        }
    }

    #[test]
    fn loads_json_file_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"fields": [{{"key": "ok", "type": "boolean"}}]}}"#).unwrap();
        let schema = Schema::from_path(file.path()).unwrap();
        assert_eq!(schema.get("ok").unwrap().name(), "Boolean");
    }

    #[test]
    fn loads_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SIGNUP.as_bytes()).unwrap();
        let schema = Schema::from_path(file.path()).unwrap();
        assert_eq!(schema.fields().len(), 3);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Schema::from_path(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, FormError::Io(_)));
    }
}
