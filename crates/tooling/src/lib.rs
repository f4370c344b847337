pub mod account_tools;

pub use account_tools::{AccountTools, ListUsersArgs, SERVER_NAME, SERVER_VERSION};
