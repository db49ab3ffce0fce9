// src/profiles/completeness.rs

use serde_json::Value;

use super::Profile;

fn non_empty_string(data: &Value, key: &str) -> bool {
    data.get(key)
        .and_then(Value::as_str)
        .is_some_and(|s| !s.is_empty())
}

fn array_len(data: &Value, key: &str) -> usize {
    data.get(key).and_then(Value::as_array).map_or(0, Vec::len)
}

/// Share of the profile that is filled out, 0-100.
///
/// The bio is weighted twice.
pub fn percent_complete(profile: &Profile) -> u32 {
    let data = &profile.data;
    let checks = [
        non_empty_string(data, "bio"),
        non_empty_string(data, "bio_long"),
        profile.location.is_some(),
        data.get("match_profile").is_some_and(|v| !v.is_null()),
        array_len(data, "profile_images") != 0,
        non_empty_string(data, "bio"),
    ];
    let complete = checks.iter().filter(|c| **c).count() as f64;
    (complete / checks.len() as f64 * 100.0).round() as u32
}

/// Badge count: unseen messages, comments, posts and users.
pub fn notification_amount(data: &Value) -> usize {
    let Some(unseen) = data.get("unseen_items") else {
        return 0;
    };
    ["messages", "comments", "posts", "users"]
        .iter()
        .map(|key| array_len(unseen, key))
        .sum()
}
