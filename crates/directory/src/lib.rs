pub mod command;
pub mod creator;
pub mod crossref;
pub mod error;
#[cfg(any(test, feature = "testing"))]
pub mod fake;
pub mod models;
pub mod parse;
pub mod reader;

pub use command::{AccountTool, CommandStatus, Database, Enumerator, Getent, Useradd};
pub use creator::AccountCreator;
pub use crossref::cross_reference;
pub use error::DirectoryError;
pub use models::{AccountCreationRequest, AccountRecord, CreationOutcome, GroupRecord, UserListing};
pub use reader::DirectoryReader;
