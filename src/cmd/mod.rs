pub mod grants;
pub mod init;
pub mod rate;
pub mod schema;
pub mod summary;
pub mod validate;
pub mod vesting;

use crate::grants::Portfolio;
use crate::store;
use crate::validate::validate_portfolio;
use std::path::Path;

/// Load the portfolio file without validating it
pub fn load_portfolio(path: &Path) -> anyhow::Result<Portfolio> {
    store::load(path)
}

/// Load the portfolio file and refuse to continue if it fails validation
pub fn load_validated(path: &Path) -> anyhow::Result<Portfolio> {
    let portfolio = store::load(path)?;
    let errors = validate_portfolio(&portfolio);
    if !errors.is_empty() {
        anyhow::bail!(
            "portfolio file {} failed validation:\n{errors}",
            path.display()
        );
    }
    Ok(portfolio)
}
