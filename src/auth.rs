//! Role tiers and the per-route guard.
//!
//! Roles are asserted by a trusted upstream in the `X-User-Roles` header as a
//! comma separated list (`USER`, `MANAGER`, `ADMIN`, optionally `ROLE_` prefixed).
//! A missing header is a 401; a header without the required role is a 403.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::constants::{API_NAME, ROLES_HEADER};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Manager,
    Admin,
}

impl Role {
    pub fn parse(raw: &str) -> Option<Role> {
        let raw = raw.trim();
        let name = raw
            .get(..5)
            .filter(|prefix| prefix.eq_ignore_ascii_case("ROLE_"))
            .map_or(raw, |_| &raw[5..]);
        match name.to_ascii_uppercase().as_str() {
            "USER" => Some(Role::User),
            "MANAGER" => Some(Role::Manager),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Every tier can read; writes need the exact tier.
    pub fn satisfies(self, required: Role) -> bool {
        required == Role::User || self == required
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Manager => "MANAGER",
            Role::Admin => "ADMIN",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub roles: Vec<Role>,
}

impl Principal {
    /// `None` when the roles header is absent or not valid UTF-8.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let raw = headers.get(ROLES_HEADER)?.to_str().ok()?;
        let roles = raw.split(',').filter_map(Role::parse).collect();
        Some(Self { roles })
    }

    pub fn has_role(&self, required: Role) -> bool {
        self.roles.iter().any(|role| role.satisfies(required))
    }
}

pub async fn require_role(
    State(required): State<Role>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let principal = Principal::from_headers(request.headers())
        .ok_or_else(|| AppError::Unauthorized(format!("missing {} header", ROLES_HEADER)))?;

    if !principal.has_role(required) {
        tracing::warn!(
            "{} Denied {} {}: requires role {}",
            API_NAME,
            request.method(),
            request.uri().path(),
            required.as_str()
        );
        return Err(AppError::Forbidden(format!("role {} required", required.as_str())));
    }

    Ok(next.run(request).await)
}

/// Wraps a method router so it only runs for callers holding `role`.
pub fn guarded(route: MethodRouter<AppState>, role: Role) -> MethodRouter<AppState> {
    route.route_layer(middleware::from_fn_with_state(role, require_role))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn parses_plain_and_prefixed_roles() {
        assert_eq!(Role::parse("USER"), Some(Role::User));
        assert_eq!(Role::parse(" manager "), Some(Role::Manager));
        assert_eq!(Role::parse("ROLE_ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("role_user"), Some(Role::User));
        assert_eq!(Role::parse("ROOT"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn every_tier_reads_but_writes_need_the_tier() {
        assert!(Role::Manager.satisfies(Role::User));
        assert!(Role::Admin.satisfies(Role::User));
        assert!(Role::Manager.satisfies(Role::Manager));
        assert!(!Role::User.satisfies(Role::Manager));
        assert!(!Role::Admin.satisfies(Role::Manager));
        assert!(!Role::Manager.satisfies(Role::Admin));
    }

    #[test]
    fn principal_from_headers() {
        let mut headers = HeaderMap::new();
        assert!(Principal::from_headers(&headers).is_none());

        headers.insert(ROLES_HEADER, HeaderValue::from_static("USER, ROLE_ADMIN, bogus"));
        let principal = Principal::from_headers(&headers).unwrap();
        assert_eq!(principal.roles, vec![Role::User, Role::Admin]);
        assert!(principal.has_role(Role::Admin));
        assert!(!principal.has_role(Role::Manager));
    }
}
