// resource.rs — Sample read-only resource: a user profile record.
//
// Illustrative only: shows how a keyed resource hangs off the server next
// to the filesystem tools. Not part of the sandbox surface.

use rand::Rng;
use serde::Serialize;

/// URI template the profile resource is advertised under.
pub const USER_PROFILE_URI_TEMPLATE: &str = "users://{user_id}/profile";

/// The record returned for `users://{user_id}/profile`.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub user_id: String,
    pub age: u8,
}

/// Build a profile for a user id. The age is freshly randomized per read.
pub fn user_profile(user_id: &str) -> UserProfile {
    UserProfile {
        name: "John Doe".to_string(),
        email: "sample_email@yahoo.com".to_string(),
        user_id: user_id.to_string(),
        age: rand::thread_rng().gen_range(18..=65),
    }
}

/// Extract the user id from a `users://{user_id}/profile` URI, if the URI
/// has that shape.
pub fn parse_profile_uri(uri: &str) -> Option<&str> {
    uri.strip_prefix("users://")?
        .strip_suffix("/profile")
        .filter(|id| !id.is_empty() && !id.contains('/'))
}
