//! Utility functions shared by connectors.

use rand::distr::Alphanumeric;
use rand::Rng;
use std::collections::HashSet;

/// Generate a random alphanumeric session id of `length` characters.
pub(crate) fn random_session_id(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Remove duplicates while keeping first-seen order.
pub(crate) fn unique_keys<'a>(keys: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    keys.into_iter()
        .filter(|k| seen.insert(*k))
        .map(str::to_string)
        .collect()
}
