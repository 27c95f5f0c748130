use actix_web::http::header::{HeaderMap, AUTHORIZATION};
use secrecy::{ExposeSecret, Secret};

/// Optional shared secret guarding the admin endpoints. `None` leaves them open.
#[derive(Clone)]
pub struct AdminToken(pub Option<Secret<String>>);

#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("The 'Authorization' header was missing.")]
    MissingCredentials,
    #[error("The 'Authorization' header was not a valid bearer token.")]
    MalformedCredentials,
    #[error("Invalid admin token.")]
    InvalidCredentials,
}

impl AdminToken {
    #[tracing::instrument(name = "Check admin credentials", skip_all)]
    pub fn authorize(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        let expected = match &self.0 {
            Some(token) => token,
            None => return Ok(()),
        };

        let provided = bearer_token(headers)?;

        if !constant_time_eq(provided.as_bytes(), expected.expose_secret().as_bytes()) {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(())
    }
}

// Only the length can short-circuit, the content is always compared in full
fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .zip(right)
            .fold(0u8, |diff, (l, r)| diff | (l ^ r))
            == 0
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::MalformedCredentials)?
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MalformedCredentials)
}
