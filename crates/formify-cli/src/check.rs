//! # Check Subcommand
//!
//! Instantiates a schema, assigns every input key that names a field and
//! validates all fields. Keys that match no field are logged and listed in
//! the report but do not fail the check.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use formify_core::Value;
use formify_validator::Schema;
use serde::Serialize;

/// Arguments for the `formify check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Schema descriptor (YAML, or JSON with a `.json` extension).
    #[arg(long)]
    pub schema: PathBuf,

    /// Input document with one entry per field (YAML or JSON).
    #[arg(long)]
    pub input: PathBuf,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Outcome of checking one input document.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub valid: bool,
    /// Processed values of every field holding one.
    pub values: serde_json::Value,
    pub errors: BTreeMap<String, Vec<String>>,
    /// Input keys that named no field.
    pub unknown: Vec<String>,
}

impl CheckReport {
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for (key, messages) in &self.errors {
            for message in messages {
                let _ = writeln!(out, "{key}: {message}");
            }
        }
        for key in &self.unknown {
            let _ = writeln!(out, "WARN: unknown field '{key}' ignored");
        }
        if self.valid {
            out.push_str("OK\n");
        }
        out
    }
}

/// Assign `input` to a fresh instance of `schema` and validate it.
pub fn check(schema: &Schema, input: &BTreeMap<String, Value>) -> Result<CheckReport> {
    let form = schema.instantiate().context("failed to instantiate schema")?;
    let unknown = form.process_all(input).context("failed to process input")?;
    for key in &unknown {
        tracing::warn!(key = %key, "input key matches no schema field");
    }
    let valid = form.is_valid().context("failed to validate input")?;
    Ok(CheckReport {
        valid,
        values: form.to_json(),
        errors: form.errors(),
        unknown,
    })
}

/// Execute the check subcommand.
///
/// Returns exit code: 0 when the input is valid, 1 otherwise.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let schema = crate::load_schema(&args.schema)?;
    let input = crate::load_input(&args.input)?;
    tracing::info!(
        schema = %args.schema.display(),
        fields = schema.fields().len(),
        entries = input.len(),
        "checking input"
    );

    let report = check(&schema, &input)?;
    match args.format {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(if report.valid { 0 } else { 1 })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = "
key: signup
fields:
  - key: name
    type: string
  - key: age
    type: integer
  - key: newsletter
    type: boolean
    required: false
    default: false
";

    fn input(pairs: &[(&str, Value)]) -> BTreeMap<String, Value> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn valid_input_passes() {
        let schema = Schema::from_yaml_str(SCHEMA).unwrap();
        let report = check(&schema, &input(&[("name", "Ada".into()), ("age", "36".into())])).unwrap();
        assert!(report.valid);
        assert!(report.errors.is_empty());
        assert_eq!(
            report.values,
            serde_json::json!({"name": "Ada", "age": 36, "newsletter": false})
        );
        assert_eq!(report.render_text(), "OK\n");
    }

    #[test]
    fn every_failing_field_is_reported() {
        let schema = Schema::from_yaml_str(SCHEMA).unwrap();
        let report = check(
            &schema,
            &input(&[("age", "abc".into()), ("newsletter", "maybe".into()), ("colour", "red".into())]),
        )
        .unwrap();
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 3);
        assert_eq!(report.unknown, ["colour"]);

        let text = report.render_text();
        assert!(text.contains("age: unable to convert 'abc' to desired type"));
        assert!(text.contains("name: this field is required"));
        assert!(text.contains("newsletter: unable to convert 'maybe' to desired type"));
        assert!(text.contains("WARN: unknown field 'colour' ignored"));
        assert!(!text.contains("OK"));
    }

    #[test]
    fn run_check_returns_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let schema = dir.path().join("schema.yaml");
        std::fs::write(&schema, SCHEMA).unwrap();
        let good = dir.path().join("good.json");
        std::fs::write(&good, r#"{"name": "Ada", "age": 36}"#).unwrap();
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, r#"{"name": "Ada", "age": "x"}"#).unwrap();

        let args = |input: PathBuf| CheckArgs {
            schema: schema.clone(),
            input,
            format: OutputFormat::Json,
        };
        assert_eq!(run_check(&args(good)).unwrap(), 0);
        assert_eq!(run_check(&args(bad)).unwrap(), 1);
    }
}
