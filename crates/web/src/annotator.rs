use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use storage::models::Scope;

use crate::error::WebError;

pub const ANNOTATOR_HEADER: &str = "x-annotator-id";
const MAX_ANNOTATOR_LEN: usize = 128;

/// Optional annotator identity taken from the `x-annotator-id` header.
///
/// Requests without the header work in the anonymous scope.
#[derive(Debug, Clone)]
pub struct Annotator(pub Scope);

#[async_trait]
impl<S> FromRequestParts<S> for Annotator
where
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(ANNOTATOR_HEADER) else {
            return Ok(Self(Scope::anonymous()));
        };

        let id = value
            .to_str()
            .map_err(|_| WebError::BadRequest(format!("{ANNOTATOR_HEADER} must be ASCII")))?
            .trim();

        if id.is_empty() {
            return Ok(Self(Scope::anonymous()));
        }
        if id.len() > MAX_ANNOTATOR_LEN {
            return Err(WebError::BadRequest(format!(
                "{ANNOTATOR_HEADER} must be at most {MAX_ANNOTATOR_LEN} characters"
            )));
        }

        Ok(Self(Scope::annotator(id)))
    }
}
