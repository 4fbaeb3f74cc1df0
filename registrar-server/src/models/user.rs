//! User and profile input validation

use serde::Deserialize;

use super::validation::{required, ValidationError};

/// Maximum length for usernames
const MAX_USERNAME_LEN: usize = 100;

/// Validated input for creating a user together with its profile
#[derive(Debug, Clone)]
pub struct UserDraft {
    username: String,
    email: String,
    bio: String,
    website: Option<String>,
}

impl UserDraft {
    /// Create a user draft.
    ///
    /// # Rules
    /// - Username, email and bio non-empty (after trimming whitespace)
    /// - Username max 100 characters
    /// - Website optional, stored as given
    pub fn new(
        username: &str,
        email: &str,
        bio: &str,
        website: Option<String>,
    ) -> Result<Self, ValidationError> {
        let username = required(username, "username")?;
        if username.len() > MAX_USERNAME_LEN {
            return Err(ValidationError::TooLong {
                field: "username",
                max: MAX_USERNAME_LEN,
            });
        }
        let email = required(email, "email")?;
        let bio = required(bio, "bio")?;

        Ok(Self {
            username,
            email,
            bio,
            website,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn bio(&self) -> &str {
        &self.bio
    }

    pub fn website(&self) -> Option<&str> {
        self.website.as_deref()
    }
}

/// Partial update for a user and its profile. Absent fields keep
/// their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
}
