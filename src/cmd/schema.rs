//! Schema command - print the expected portfolio file format

use crate::grants::Portfolio;
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let schema = schema_for!(Portfolio);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }
}
