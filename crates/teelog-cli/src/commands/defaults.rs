//! Print the production configuration.

use anyhow::Result;
use teelog_core::TeeConfigExt;
use teelog_types::TeeConfig;

pub fn execute() -> Result<()> {
    print!("{}", TeeConfig::production().to_yaml()?);
    Ok(())
}
