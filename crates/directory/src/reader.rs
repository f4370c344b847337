use crate::command::{Database, Enumerator, Getent, GETENT_KEY_NOT_FOUND};
use crate::crossref::cross_reference;
use crate::error::DirectoryError;
use crate::models::{AccountRecord, GroupRecord, UserListing};
use crate::parse::{parse_group, parse_group_names, parse_passwd};
use std::sync::Arc;
use tracing::{debug, warn};
use useradd_core::config::{DirectoryConfig, DEFAULT_SYSTEM_GID_THRESHOLD};

/// Reads accounts and groups from the directory service. Every call queries
/// the service afresh; nothing is cached between calls.
pub struct DirectoryReader {
    enumerator: Arc<dyn Enumerator>,
    system_gid_threshold: u32,
}

impl DirectoryReader {
    pub fn new(enumerator: Arc<dyn Enumerator>) -> Self {
        Self {
            enumerator,
            system_gid_threshold: DEFAULT_SYSTEM_GID_THRESHOLD,
        }
    }

    pub fn from_config(config: &DirectoryConfig) -> Self {
        Self::new(Arc::new(Getent::new(config.getent_path.clone())))
            .with_system_gid_threshold(config.system_gid_threshold)
    }

    pub fn with_system_gid_threshold(mut self, threshold: u32) -> Self {
        self.system_gid_threshold = threshold;
        self
    }

    pub async fn list_accounts(
        &self,
        username: Option<&str>,
    ) -> Result<Vec<AccountRecord>, DirectoryError> {
        let username = username.filter(|name| !name.is_empty());
        let text = match self.enumerator.enumerate(Database::Passwd, username).await {
            Ok(text) => text,
            Err(e) if username.is_some() && is_key_not_found(&e) => {
                debug!(username, "No such account");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        Ok(parse_passwd(&text, self.system_gid_threshold))
    }

    pub async fn list_groups(&self) -> Result<Vec<GroupRecord>, DirectoryError> {
        let text = self.enumerator.enumerate(Database::Group, None).await?;
        Ok(parse_group(&text))
    }

    /// Looks up the group database with `name` as the key and returns the
    /// name of every matching group.
    pub async fn list_groups_for_username(
        &self,
        name: &str,
    ) -> Result<Vec<String>, DirectoryError> {
        match self.enumerator.enumerate(Database::Group, Some(name)).await {
            Ok(text) => Ok(parse_group_names(&text)),
            Err(e) if is_key_not_found(&e) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Builds the `ListUsers` result.
    ///
    /// Without a filter every account is cross-referenced against every
    /// group and both lists are returned. With a filter only the matching
    /// account is returned, its groups come from a direct lookup and the
    /// top-level group list is omitted.
    pub async fn list_users(&self, username: Option<&str>) -> Result<UserListing, DirectoryError> {
        let username = username.filter(|name| !name.is_empty());
        let mut users = self.list_accounts(username).await?;

        if let Some(name) = username {
            if let Some(first) = users.first_mut() {
                match self.list_groups_for_username(name).await {
                    Ok(groups) => first.groups = groups,
                    Err(e) => warn!(username = name, error = %e, "Group lookup failed"),
                }
            }
            return Ok(UserListing {
                users,
                groups: None,
            });
        }

        let groups = self.list_groups().await?;
        cross_reference(&mut users, &groups);

        Ok(UserListing {
            users,
            groups: Some(groups),
        })
    }
}

fn is_key_not_found(error: &DirectoryError) -> bool {
    error.exit_code() == Some(GETENT_KEY_NOT_FOUND)
}
