//! Payment Provider Redirect Parameters

use url::Url;

use crate::error::{CheckoutError, Result};

/// Query parameter carrying the authorization token
pub const TOKEN_PARAM: &str = "ba_token";

/// Query parameter carrying the provider subscription ID
pub const SUBSCRIPTION_PARAM: &str = "subscription_id";

/// Values the payment provider appends to the return URL.
///
/// Read once when the return page mounts and never changed afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RedirectParams {
    authorization_token: Option<String>,
    subscription_id: Option<String>,
}

impl RedirectParams {
    pub fn new(authorization_token: Option<String>, subscription_id: Option<String>) -> Self {
        Self {
            authorization_token: authorization_token.filter(|v| !v.is_empty()),
            subscription_id: subscription_id.filter(|v| !v.is_empty()),
        }
    }

    /// Parse a query string, with or without the leading `?`
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_pairs(url::form_urlencoded::parse(query.as_bytes()))
    }

    /// Parse the query of a full URL
    pub fn from_url(url: &str) -> Result<Self> {
        let url = Url::parse(url).map_err(|e| CheckoutError::InvalidUrl(e.to_string()))?;
        Ok(Self::from_pairs(url.query_pairs()))
    }

    /// Build from decoded key/value pairs. The first occurrence of a key wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut authorization_token = None;
        let mut subscription_id = None;

        for (key, value) in pairs {
            match key.as_ref() {
                TOKEN_PARAM if authorization_token.is_none() => {
                    authorization_token = Some(value.into());
                }
                SUBSCRIPTION_PARAM if subscription_id.is_none() => {
                    subscription_id = Some(value.into());
                }
                _ => {}
            }
        }

        Self::new(authorization_token, subscription_id)
    }

    pub fn authorization_token(&self) -> Option<&str> {
        self.authorization_token.as_deref()
    }

    pub fn subscription_id(&self) -> Option<&str> {
        self.subscription_id.as_deref()
    }

    /// `(authorization_token, subscription_id)` when the page was reached
    /// from a payment return, `None` otherwise.
    pub fn confirmation_context(&self) -> Option<(&str, &str)> {
        Some((self.authorization_token()?, self.subscription_id()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_query() {
        let params = RedirectParams::from_query("?ba_token=ABC123&subscription_id=SUB1&utm=x");
        assert_eq!(params.confirmation_context(), Some(("ABC123", "SUB1")));
    }

    #[test]
    fn test_from_url_decodes_values() {
        let params = RedirectParams::from_url(
            "https://diy.example/subscription/success?subscription_id=I-9%2FA&ba_token=BA%2D1",
        )
        .unwrap();
        assert_eq!(params.subscription_id(), Some("I-9/A"));
        assert_eq!(params.authorization_token(), Some("BA-1"));
    }

    #[test]
    fn test_missing_token_has_no_context() {
        let params = RedirectParams::from_query("subscription_id=SUB1");
        assert!(params.authorization_token().is_none());
        assert!(params.confirmation_context().is_none());
    }

    #[test]
    fn test_empty_values_are_absent() {
        let params = RedirectParams::from_query("ba_token=&subscription_id=SUB1");
        assert!(params.confirmation_context().is_none());
    }

    #[test]
    fn test_invalid_url() {
        let err = RedirectParams::from_url("not a url").unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidUrl(_)));
    }
}
