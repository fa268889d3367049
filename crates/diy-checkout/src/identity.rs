//! Current Identity

use serde::{Deserialize, Serialize};

/// A signed-in user
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
}

impl UserIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// What the identity provider currently knows about the user
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum IdentitySnapshot {
    /// Session lookup still in flight
    #[default]
    Loading,
    /// Lookup finished with no session
    SignedOut,
    SignedIn(UserIdentity),
}

impl IdentitySnapshot {
    /// Build from the provider's `{ id, loaded }` shape
    pub fn from_loaded(loaded: bool, id: Option<String>) -> Self {
        match (loaded, id) {
            (false, _) => IdentitySnapshot::Loading,
            (true, Some(id)) if !id.is_empty() => IdentitySnapshot::SignedIn(UserIdentity::new(id)),
            (true, _) => IdentitySnapshot::SignedOut,
        }
    }

    pub fn user(&self) -> Option<&UserIdentity> {
        match self {
            IdentitySnapshot::SignedIn(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        !matches!(self, IdentitySnapshot::Loading)
    }
}

/// Body of `GET /api/me`
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct IdentityResponse {
    #[serde(default)]
    pub id: Option<String>,
}

impl From<IdentityResponse> for IdentitySnapshot {
    fn from(response: IdentityResponse) -> Self {
        IdentitySnapshot::from_loaded(true, response.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_loaded() {
        assert_eq!(IdentitySnapshot::from_loaded(false, Some("u1".into())), IdentitySnapshot::Loading);
        assert_eq!(IdentitySnapshot::from_loaded(true, None), IdentitySnapshot::SignedOut);
        assert_eq!(
            IdentitySnapshot::from_loaded(true, Some("u1".into())).user(),
            Some(&UserIdentity::new("u1"))
        );
    }

    #[test]
    fn test_null_identity_response_is_signed_out() {
        let response: IdentityResponse = serde_json::from_str(r#"{"id":null}"#).unwrap();
        let snapshot = IdentitySnapshot::from(response);
        assert!(snapshot.is_loaded());
        assert!(snapshot.user().is_none());
    }
}
