//! Parsers for the colon-delimited text emitted by `getent`.
//!
//! Lines with the wrong number of fields are dropped without error and
//! numeric fields that fail to parse become `0`, so one bad entry never
//! hides the rest of the database.

use crate::models::{AccountRecord, GroupRecord};
use tracing::trace;

const PASSWD_FIELDS: usize = 7;
const GROUP_FIELDS: usize = 4;

pub fn parse_passwd(text: &str, system_gid_threshold: u32) -> Vec<AccountRecord> {
    text.lines()
        .filter_map(|line| parse_passwd_line(line, system_gid_threshold))
        .collect()
}

pub fn parse_passwd_line(line: &str, system_gid_threshold: u32) -> Option<AccountRecord> {
    let parts: Vec<&str> = line.split(':').collect();
    if parts.len() != PASSWD_FIELDS {
        trace!(line, fields = parts.len(), "skipping malformed passwd line");
        return None;
    }

    let gid = parse_id(parts[3]);
    Some(AccountRecord {
        username: parts[0].to_string(),
        password: parts[1].to_string(),
        uid: parse_id(parts[2]),
        gid,
        comment: parts[4].to_string(),
        home: parts[5].to_string(),
        shell: parts[6].to_string(),
        is_system_user: gid < system_gid_threshold,
        groups: Vec::new(),
    })
}

pub fn parse_group(text: &str) -> Vec<GroupRecord> {
    text.lines().filter_map(parse_group_line).collect()
}

pub fn parse_group_line(line: &str) -> Option<GroupRecord> {
    let parts: Vec<&str> = line.split(':').collect();
    if parts.len() != GROUP_FIELDS {
        trace!(line, fields = parts.len(), "skipping malformed group line");
        return None;
    }

    Some(GroupRecord {
        name: parts[0].to_string(),
        password: parts[1].to_string(),
        gid: parse_id(parts[2]),
        members: parts[3].split(',').map(str::to_string).collect(),
    })
}

/// Returns the first field of every non-empty line.
pub fn parse_group_names(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| line.split(':').next())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_id(field: &str) -> u32 {
    field.parse().unwrap_or(0)
}
