//! Lenient body extractor for auth forms.

use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection},
        FromRequest, Request,
    },
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde::de::DeserializeOwned;
use std::convert::Infallible;
use tracing::debug;

/// Request body decoded from JSON or `application/x-www-form-urlencoded`.
///
/// Never rejects: an unreadable body is `None`, so handlers answer it with the
/// same `400` as a body with missing fields.
pub struct Payload<T>(pub Option<T>);

impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    Form<T>: FromRequest<S, Rejection = FormRejection>,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

        let value = if is_form {
            match Form::<T>::from_request(req, state).await {
                Ok(Form(value)) => Some(value),
                Err(rejection) => {
                    debug!("Unreadable form body: {rejection}");
                    None
                }
            }
        } else {
            match Json::<T>::from_request(req, state).await {
                Ok(Json(value)) => Some(value),
                Err(rejection) => {
                    debug!("Unreadable JSON body: {rejection}");
                    None
                }
            }
        };

        Ok(Self(value))
    }
}
