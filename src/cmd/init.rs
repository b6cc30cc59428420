//! Init command - write a starter portfolio file

use crate::grants::Portfolio;
use crate::store::{self, STORE_FILE};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct InitCommand {
    /// Portfolio JSON file to create
    #[arg(short, long, default_value = STORE_FILE)]
    file: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
}

impl InitCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        if self.file.exists() && !self.force {
            anyhow::bail!(
                "{} already exists, pass --force to overwrite",
                self.file.display()
            );
        }

        store::save(&self.file, &Portfolio::default())?;
        println!("Created {}", self.file.display());
        println!("Edit it with your salary, stock price and grants, then run `netvest summary`.");
        Ok(())
    }
}
