use crate::{claims::ClaimPayload, errors::AuthError};

/// Check that `claims` grants `permission`.
///
/// # Errors
/// - [`AuthError::ClaimsMissingPermissions`] if the token has no `permissions` claim
/// - [`AuthError::PermissionDenied`] if the claim does not list `permission`
pub fn check_permissions(permission: &str, claims: &ClaimPayload) -> Result<(), AuthError> {
    if claims.permissions.is_none() {
        return Err(AuthError::ClaimsMissingPermissions);
    }

    if claims.has_permission(permission) {
        Ok(())
    } else {
        Err(AuthError::PermissionDenied {
            permission: permission.to_owned(),
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims(raw: &serde_json::Value) -> ClaimPayload {
        ClaimPayload::from_value(raw).unwrap()
    }

    #[test]
    fn granted_permission_passes() {
        let c = claims(&json!({ "permissions": ["get:actors", "post:actors"] }));
        assert!(check_permissions("post:actors", &c).is_ok());
    }

    #[test]
    fn missing_claim_is_bad_request() {
        let c = claims(&json!({ "sub": "someone" }));
        let err = check_permissions("get:actors", &c).unwrap_err();
        assert!(matches!(err, AuthError::ClaimsMissingPermissions));
        assert_eq!(err.status(), http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn absent_permission_is_forbidden() {
        let c = claims(&json!({ "permissions": ["get:actors"] }));
        let err = check_permissions("delete:actors", &c).unwrap_err();
        assert!(matches!(err, AuthError::PermissionDenied { ref permission } if permission == "delete:actors"));
        assert_eq!(err.status(), http::StatusCode::FORBIDDEN);
    }

    #[test]
    fn empty_list_denies_everything() {
        let c = claims(&json!({ "permissions": [] }));
        assert!(matches!(
            check_permissions("get:movies", &c),
            Err(AuthError::PermissionDenied { .. })
        ));
    }
}
