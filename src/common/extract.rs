use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::common::error::{AppError, AppResult};

/// JSON body that is rejected with a `VALIDATION_ERROR` envelope when it is
/// malformed, missing fields, or fails its `Validate` rules.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Path parameters whose rejection is reported as `VALIDATION_ERROR`.
pub struct ValidatedPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidatedPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Query string whose rejection is reported as `VALIDATION_ERROR`.
pub struct ValidatedQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Parses an optional JSON body; an empty body yields `None`.
pub fn optional_json<T>(body: &Bytes) -> AppResult<Option<T>>
where
    T: DeserializeOwned + Validate,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let value: T = serde_json::from_slice(body)
        .map_err(|e| AppError::validation(format!("Invalid request body: {}", e)))?;
    value.validate()?;
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Details {
        #[validate(range(min = 0.0))]
        km: f64,
    }

    #[test]
    fn empty_body_is_none() {
        assert!(optional_json::<Details>(&Bytes::new()).unwrap().is_none());
        assert!(optional_json::<Details>(&Bytes::from_static(b"  \n")).unwrap().is_none());
    }

    #[test]
    fn parses_and_validates() {
        let parsed = optional_json::<Details>(&Bytes::from_static(b"{\"km\": 12.5}")).unwrap();
        assert_eq!(parsed.map(|d| d.km), Some(12.5));

        let err = optional_json::<Details>(&Bytes::from_static(b"{\"km\": -1}")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = optional_json::<Details>(&Bytes::from_static(b"{oops")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
