//! Unique test data, so parallel tests never collide.

use uuid::Uuid;

/// `{prefix}-{uuid}`.
///
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let a = unique_str("room");
/// assert_ne!(a, unique_str("room"));
/// assert!(a.starts_with("room-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

/// Short display name that still fits the 18-character name limit
/// when `prefix` is at most 11 characters.
///
/// ```
/// use backend_test_support::unique_helpers::unique_name;
///
/// let name = unique_name("Anna");
/// assert!(name.starts_with("Anna-"));
/// assert_eq!(name.len(), "Anna-".len() + 6);
/// ```
pub fn unique_name(prefix: &str) -> String {
    let simple = Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}", &simple[..6])
}
