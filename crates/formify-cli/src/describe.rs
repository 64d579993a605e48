//! # Describe Subcommand
//!
//! Prints one summary line per schema field.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use formify_validator::{DescribeVisitor, Schema};

/// Arguments for the `formify describe` subcommand.
#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Schema descriptor (YAML, or JSON with a `.json` extension).
    #[arg(long)]
    pub schema: PathBuf,
}

/// Summary lines for every field, in declaration order.
pub fn describe(schema: &Schema) -> Vec<String> {
    let mut visitor = DescribeVisitor;
    schema.fields().iter().map(|field| field.accept(&mut visitor)).collect()
}

/// Execute the describe subcommand.
pub fn run_describe(args: &DescribeArgs) -> Result<u8> {
    let schema = crate::load_schema(&args.schema)?;
    if let Some(key) = schema.key() {
        println!("{key}");
    }
    for line in describe(&schema) {
        println!("  {line}");
    }
    Ok(0)
}
