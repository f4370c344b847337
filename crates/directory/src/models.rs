use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One entry of the accounts database (`getent passwd`).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AccountRecord {
    pub username: String,
    /// Placeholder from the passwd file, usually `x`. Never a real secret.
    pub password: String,
    pub uid: u32,
    pub gid: u32,
    pub comment: String,
    pub home: String,
    pub shell: String,
    pub is_system_user: bool,
    /// Supplementary group names, filled in by cross-referencing.
    pub groups: Vec<String>,
}

/// One entry of the groups database (`getent group`).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GroupRecord {
    pub name: String,
    pub password: String,
    pub gid: u32,
    /// Member usernames as listed. An empty member field is kept as `[""]`.
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UserListing {
    /// the list of users on the system
    pub users: Vec<AccountRecord>,
    /// the list of groups on the system
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<GroupRecord>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AccountCreationRequest {
    /// the username of the new account
    pub username: String,
    /// the base directory for the home directory of the new account
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub base_dir: String,
    /// the GECOS field of the new account
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
    /// the home directory of the new account
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub home_dir: String,
    /// the expiration date of the new account
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub expire_date: String,
    /// the password inactivity period of the new account
    #[serde(default, skip_serializing_if = "is_zero_i64")]
    pub inactive: i64,
    /// the name or ID of the primary group of the new account
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub gid: String,
    /// the list of supplementary groups of the new account
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
    /// the alternative skeleton directory
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub skel_dir: String,
    /// create the user's home directory
    #[serde(default, skip_serializing_if = "is_false")]
    pub create_home: bool,
    /// do not create the user's home directory
    #[serde(default, skip_serializing_if = "is_false")]
    pub no_create_home: bool,
    /// do not create a group with the same name as the user
    #[serde(default, skip_serializing_if = "is_false")]
    pub no_user_group: bool,
    /// allow to create users with duplicate (non-unique) UID
    #[serde(default, skip_serializing_if = "is_false")]
    pub non_unique: bool,
    /// the encrypted password of the new account
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    /// create a system account
    #[serde(default, skip_serializing_if = "is_false")]
    pub system: bool,
    /// the login shell of the new account
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub shell: String,
    /// the user ID of the new account
    #[serde(default, skip_serializing_if = "is_zero_u32")]
    pub uid: u32,
    /// create a group with the same name as the user
    #[serde(default, skip_serializing_if = "is_false")]
    pub user_group: bool,
    /// the specific SEUSER for the SELinux user mapping
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub selinux_user: String,
    /// the specific MLS range for the SELinux user mapping
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub selinux_range: String,
}

impl AccountCreationRequest {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CreationOutcome {
    /// whether the user was added successfully
    pub success: bool,
    /// a message indicating the result of the operation
    pub message: String,
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_zero_i64(value: &i64) -> bool {
    *value == 0
}

fn is_zero_u32(value: &u32) -> bool {
    *value == 0
}
