use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use super::{cookie::read_session_cookie, session::SessionKeys};
use crate::error::AppError;

/// Validated session identity. Reads the `token` cookie, then `Authorization: Bearer`.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    SessionKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = SessionKeys::from_ref(state);

        let token = read_session_cookie(&parts.headers).or_else(|| {
            parts
                .headers
                .get(axum::http::header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                .map(str::to_string)
        });

        let Some(token) = token else {
            return Err(AppError::Invalid);
        };

        match keys.validate(&token) {
            Ok(user_id) => Ok(AuthUser(user_id)),
            Err(e) => {
                warn!("invalid or expired session token");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::test_jwt_config;
    use axum::http::Request;

    #[derive(Clone)]
    struct KeysOnly(SessionKeys);

    impl FromRef<KeysOnly> for SessionKeys {
        fn from_ref(s: &KeysOnly) -> Self {
            s.0.clone()
        }
    }

    fn parts_with(header: (&str, String)) -> Parts {
        let (parts, _) = Request::builder()
            .header(header.0, header.1)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[tokio::test]
    async fn accepts_cookie_and_bearer() {
        let state = KeysOnly(SessionKeys::new(&test_jwt_config("k")).unwrap());
        let user_id = Uuid::new_v4();
        let token = state.0.issue(user_id).unwrap();

        let mut parts = parts_with(("cookie", format!("token={}", token)));
        let AuthUser(id) = AuthUser::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(id, user_id);

        let mut parts = parts_with(("authorization", format!("Bearer {}", token)));
        let AuthUser(id) = AuthUser::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(id, user_id);
    }

    #[tokio::test]
    async fn rejects_missing_or_foreign_token() {
        let state = KeysOnly(SessionKeys::new(&test_jwt_config("k")).unwrap());
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        assert!(matches!(
            AuthUser::from_request_parts(&mut parts, &state).await,
            Err(AppError::Invalid)
        ));

        let foreign = SessionKeys::new(&test_jwt_config("other")).unwrap().issue(Uuid::new_v4()).unwrap();
        let mut parts = parts_with(("cookie", format!("token={}", foreign)));
        assert!(matches!(
            AuthUser::from_request_parts(&mut parts, &state).await,
            Err(AppError::Invalid)
        ));
    }
}
