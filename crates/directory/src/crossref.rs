use crate::models::{AccountRecord, GroupRecord};
use std::collections::HashMap;

/// Appends each group's name to the `groups` list of every account it lists
/// as a member. Groups are applied in enumeration order, so each account's
/// list follows the order the directory service returned the groups in.
///
/// Empty member names never match: an empty member field parses as `[""]`
/// and must not be attributed to anyone.
pub fn cross_reference(accounts: &mut [AccountRecord], groups: &[GroupRecord]) {
    let mut by_username: HashMap<String, Vec<usize>> = HashMap::new();
    for (index, account) in accounts.iter().enumerate() {
        by_username
            .entry(account.username.clone())
            .or_default()
            .push(index);
    }

    for group in groups {
        for member in group.members.iter().filter(|m| !m.is_empty()) {
            if let Some(indices) = by_username.get(member) {
                for &index in indices {
                    accounts[index].groups.push(group.name.clone());
                }
            }
        }
    }
}
