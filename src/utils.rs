//! Small string helpers shared by the callbacks and the clients.
//!
//! - Channel lists are stored by the host as a single comma-joined string
//! - Response bodies are truncated before they reach the logs

use itertools::Itertools;

/// Split a stored comma-joined channel list back into ids.
///
/// Blank segments are dropped, so an empty string yields no channels.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(split_channel_ids("C1,C2"), vec!["C1", "C2"]);
/// assert!(split_channel_ids("").is_empty());
/// ```
pub fn split_channel_ids(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join channel ids into the single string the host stores.
pub fn join_channel_ids<S: AsRef<str>>(ids: &[S]) -> String {
    ids.iter().map(|id| id.as_ref()).join(",")
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut at the last character boundary before `max` bytes and
/// get `"…(+N bytes)"` appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}
