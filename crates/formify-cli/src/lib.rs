//! # formify-cli — Command-Line Front End for formify
//!
//! Provides the `formify` binary.
//!
//! ## Subcommands
//!
//! - `formify check`: assign an input document to a schema and report
//!   per-field errors.
//! - `formify describe`: print one line per schema field.
//!
//! ```bash
//! formify check --schema signup.yaml --input request.json
//! formify check --schema signup.yaml --input request.yaml --format json
//! formify describe --schema signup.yaml
//! ```
//!
//! Handlers return the process exit code: 0 when everything passed, 1 when
//! the input is invalid. Operational failures are `anyhow` errors.

pub mod check;
pub mod describe;

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use formify_core::Value;
use formify_validator::Schema;

/// Load a schema descriptor file.
pub fn load_schema(path: &Path) -> Result<Schema> {
    Schema::from_path(path).with_context(|| format!("failed to load schema {}", path.display()))
}

/// Load an input document. YAML is a superset of JSON, so one parser
/// reads both.
pub fn load_input(path: &Path) -> Result<BTreeMap<String, Value>> {
    let text = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_yaml::from_str(&text).with_context(|| format!("{} is not a key/value document", path.display()))
}
