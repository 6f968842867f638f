use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::AuthError;

/// Verified body of a bearer token.
///
/// Registered claims are lifted into typed fields; everything else the issuer
/// put in the token is kept verbatim in `extras`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClaimPayload {
    /// Subject (`sub`)
    pub subject: Option<String>,

    /// Issuer (`iss`)
    pub issuer: Option<String>,

    /// Audiences (`aud`), normalized to a list
    pub audiences: Vec<String>,

    /// Expiration (`exp`), seconds since the epoch
    pub expires_at: Option<i64>,

    /// Issued at (`iat`), seconds since the epoch
    pub issued_at: Option<i64>,

    /// Granted permission strings, e.g. `get:actors`.
    /// `None` when the token has no `permissions` claim at all.
    pub permissions: Option<Vec<String>>,

    /// Remaining non-registered claims
    #[serde(flatten)]
    pub extras: Map<String, Value>,
}

const REGISTERED: [&str; 6] = ["sub", "iss", "aud", "exp", "iat", "permissions"];

impl ClaimPayload {
    /// Build a payload from the decoded JSON body of a token.
    ///
    /// # Errors
    /// Returns [`AuthError::UnparsableToken`] if the body is not an object or a
    /// registered claim has the wrong JSON type.
    pub fn from_value(raw: &Value) -> Result<Self, AuthError> {
        let obj = raw.as_object().ok_or(AuthError::UnparsableToken)?;

        let subject = optional_string(obj, "sub")?;
        let issuer = optional_string(obj, "iss")?;
        let audiences = extract_audiences(obj.get("aud"))?;
        let expires_at = optional_i64(obj, "exp")?;
        let issued_at = optional_i64(obj, "iat")?;
        let permissions = extract_permissions(obj.get("permissions"))?;

        let extras = obj
            .iter()
            .filter(|(k, _)| !REGISTERED.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Ok(Self {
            subject,
            issuer,
            audiences,
            expires_at,
            issued_at,
            permissions,
            extras,
        })
    }

    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions
            .as_ref()
            .is_some_and(|granted| granted.iter().any(|p| p == permission))
    }
}

fn optional_string(obj: &Map<String, Value>, key: &str) -> Result<Option<String>, AuthError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(AuthError::UnparsableToken),
    }
}

fn optional_i64(obj: &Map<String, Value>, key: &str) -> Result<Option<i64>, AuthError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v.as_i64().map(Some).ok_or(AuthError::UnparsableToken),
    }
}

/// `aud` may be a single string or an array of strings.
fn extract_audiences(value: Option<&Value>) -> Result<Vec<String>, AuthError> {
    match value {
        None | Some(Value::Null) => Ok(vec![]),
        Some(Value::String(s)) => Ok(vec![s.clone()]),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| v.as_str().map(ToOwned::to_owned))
            .collect::<Option<Vec<_>>>()
            .ok_or(AuthError::UnparsableToken),
        Some(_) => Err(AuthError::UnparsableToken),
    }
}

fn extract_permissions(value: Option<&Value>) -> Result<Option<Vec<String>>, AuthError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| v.as_str().map(ToOwned::to_owned))
            .collect::<Option<Vec<_>>>()
            .map(Some)
            .ok_or(AuthError::UnparsableToken),
        Some(_) => Err(AuthError::UnparsableToken),
    }
}
