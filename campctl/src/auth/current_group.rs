//! Resolves the acting group from the `Authorization: Bearer` header.

use crate::{
    api::models::groups::CurrentGroup,
    auth::token::TokenType,
    db::{errors::DbError, handlers::Groups},
    errors::{Error, Result},
    AppState,
};
use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::{debug, instrument, trace};

/// Pull the bearer token out of the Authorization header, if any.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

impl FromRequestParts<AppState> for CurrentGroup {
    type Rejection = Error;

    /// Missing header, malformed header, invalid or expired token, a refresh
    /// token where an access token is required, and an unknown subject all
    /// produce the same rejection so callers cannot probe which step failed.
    #[instrument(skip(parts, state))]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let token = bearer_token(parts).ok_or(Error::Unauthenticated { message: None })?;

        let claims = state.tokens.decode(token)?;
        if claims.typ != TokenType::Access {
            trace!("refresh token presented on a resource route");
            return Err(Error::Unauthenticated { message: None });
        }

        let mut conn = state.db.acquire().await.map_err(DbError::from)?;
        let mut groups = Groups::new(&mut conn);
        let group = groups
            .get_by_id(claims.sub)
            .await?
            .ok_or(Error::Unauthenticated { message: None })?;

        debug!("Authenticated group {}", group.id);

        Ok(CurrentGroup {
            id: group.id,
            userlogin: group.userlogin,
            name: group.name,
            email: group.email,
            members: group.members,
        })
    }
}
