//! # Visitors
//!
//! [`Validator::accept`] dispatches on the closed [`FieldKind`] set, so a
//! visitor handles every kind by construction.
//!
//! [`FieldKind`]: crate::fields::FieldKind

use crate::validator::Validator;

/// One method per field kind.
pub trait ValidatorVisitor {
    type Output;

    fn visit_string(&mut self, validator: &Validator) -> Self::Output;
    fn visit_integer(&mut self, validator: &Validator) -> Self::Output;
    fn visit_float(&mut self, validator: &Validator) -> Self::Output;
    fn visit_boolean(&mut self, validator: &Validator) -> Self::Output;
    fn visit_list(&mut self, validator: &Validator) -> Self::Output;
    /// Field types defined outside this crate.
    fn visit_custom(&mut self, validator: &Validator) -> Self::Output;
}

/// Renders a one-line, human-readable summary of a field.
///
/// `age: Integer, whole number, required, label "Age", default 18`
#[derive(Debug, Default, Clone, Copy)]
pub struct DescribeVisitor;

impl DescribeVisitor {
    fn line(validator: &Validator, shape: &str) -> String {
        let mut parts = vec![validator.name().to_owned(), shape.to_owned()];
        parts.push(if validator.required() { "required" } else { "optional" }.to_owned());
        if let Some(label) = validator.label() {
            parts.push(format!("label {label:?}"));
        }
        let default = validator.default();
        if default.is_defined() {
            parts.push(format!("default {default}"));
        }
        if let Some(description) = validator.description() {
            parts.push(description.to_owned());
        }
        format!("{}: {}", validator.key().unwrap_or("<unnamed>"), parts.join(", "))
    }
}

impl ValidatorVisitor for DescribeVisitor {
    type Output = String;

    fn visit_string(&mut self, validator: &Validator) -> String {
        Self::line(validator, "text")
    }

    fn visit_integer(&mut self, validator: &Validator) -> String {
        Self::line(validator, "whole number")
    }

    fn visit_float(&mut self, validator: &Validator) -> String {
        Self::line(validator, "number")
    }

    fn visit_boolean(&mut self, validator: &Validator) -> String {
        Self::line(validator, "yes/no")
    }

    fn visit_list(&mut self, validator: &Validator) -> String {
        let element = validator
            .field()
            .element()
            .map(|element| element.name().to_owned())
            .unwrap_or_else(|| "values".to_owned());
        Self::line(validator, &format!("list of {element}"))
    }

    fn visit_custom(&mut self, validator: &Validator) -> String {
        Self::line(validator, "custom")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{BooleanField, IntegerField, ListField, StringField};

    #[test]
    fn describes_scalar_fields() {
        let age = Validator::builder(IntegerField).key("age").default_value(18).build();
        assert_eq!(
            age.accept(&mut DescribeVisitor),
            "age: Integer, whole number, required, label \"Age\", default 18"
        );

        let terms = Validator::builder(BooleanField)
            .key("terms")
            .no_label()
            .required(false)
            .description("accepted the terms")
            .build();
        assert_eq!(
            terms.accept(&mut DescribeVisitor),
            "terms: Boolean, yes/no, optional, accepted the terms"
        );
    }

    #[test]
    fn describes_list_element() {
        let tags = Validator::builder(ListField::new(StringField)).key("tags").no_label().build();
        assert_eq!(tags.accept(&mut DescribeVisitor), "tags: List[String], list of String, required");
    }

    /// Counts visits per kind; checks dispatch reaches the right method.
    #[derive(Default)]
    struct Tally {
        strings: usize,
        others: usize,
    }

    impl ValidatorVisitor for Tally {
        type Output = ();

        fn visit_string(&mut self, _: &Validator) {
            self.strings += 1;
        }
        fn visit_integer(&mut self, _: &Validator) {
            self.others += 1;
        }
        fn visit_float(&mut self, _: &Validator) {
            self.others += 1;
        }
        fn visit_boolean(&mut self, _: &Validator) {
            self.others += 1;
        }
        fn visit_list(&mut self, _: &Validator) {
            self.others += 1;
        }
        fn visit_custom(&mut self, _: &Validator) {
            self.others += 1;
        }
    }

    #[test]
    fn accept_dispatches_on_kind() {
        let mut tally = Tally::default();
        Validator::builder(StringField).build().accept(&mut tally);
        Validator::builder(IntegerField).build().accept(&mut tally);
        assert_eq!((tally.strings, tally.others), (1, 1));
    }
}
