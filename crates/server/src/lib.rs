pub mod http;
pub mod stdio;

use directory::{AccountCreator, DirectoryReader};
use std::sync::Arc;
use tooling::AccountTools;
use useradd_core::Config;

/// Wires the account tools against the system utilities named in `config`.
pub fn build_tools(config: &Config) -> AccountTools {
    let reader = Arc::new(DirectoryReader::from_config(&config.directory));
    let creator = Arc::new(AccountCreator::from_config(&config.directory));
    AccountTools::new(reader, creator)
}
