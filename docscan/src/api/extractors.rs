use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequest, FromRequestParts, Multipart, Request};

use crate::error::DocscanError;

/// `Path` with rejections rendered as the service's JSON error body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(DocscanError))]
pub struct AppPath<T>(pub T);

/// `Multipart` with rejections rendered as the service's JSON error body.
pub struct AppMultipart(pub Multipart);

impl<S> FromRequest<S> for AppMultipart
where
    S: Send + Sync,
{
    type Rejection = DocscanError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state).await?;
        Ok(Self(multipart))
    }
}

impl From<PathRejection> for DocscanError {
    fn from(rejection: PathRejection) -> Self {
        match rejection {
            PathRejection::FailedToDeserializePathParams(err) => {
                DocscanError::Validation(format!("Invalid path parameter: {}", err.body_text()))
            }
            other => DocscanError::Internal(other.body_text()),
        }
    }
}

impl From<MultipartRejection> for DocscanError {
    fn from(rejection: MultipartRejection) -> Self {
        DocscanError::Validation(format!("Invalid multipart request: {}", rejection.body_text()))
    }
}
