use actix_web::HttpResponse;
use actix_web::ResponseError;
use actix_web::http::StatusCode;
use mealshare_core::Error;
use serde::Serialize;

/// Workflow error on its way out as an HTTP response.
#[derive(Debug)]
pub struct Failure(pub Error);

impl From<Error> for Failure {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl ResponseError for Failure {
    fn status_code(&self) -> StatusCode {
        match self.0 {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::InvalidState(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::CapacityExceeded(_) => StatusCode::CONFLICT,
            Error::Invalid(_) => StatusCode::BAD_REQUEST,
            Error::Unauthenticated => StatusCode::UNAUTHORIZED,
            Error::Unauthorized => StatusCode::FORBIDDEN,
            Error::SessionUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
    fn error_response(&self) -> HttpResponse {
        let body = match &self.0 {
            Error::Infrastructure(e) => {
                log::error!("[http] infrastructure failure: {}", e);
                serde_json::json!({ "error": "internal error" })
            }
            Error::SessionUnavailable(user) => serde_json::json!({
                "error": self.0.to_string(),
                "user": user,
            }),
            e => serde_json::json!({ "error": e.to_string() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// 200 with the JSON body, or the mapped failure.
pub fn respond<T>(result: Result<T, Error>) -> HttpResponse
where
    T: Serialize,
{
    match result {
        Ok(body) => HttpResponse::Ok().json(body),
        Err(e) => Failure(e).error_response(),
    }
}

/// 201 with the JSON body, or the mapped failure.
pub fn created<T>(result: Result<T, Error>) -> HttpResponse
where
    T: Serialize,
{
    match result {
        Ok(body) => HttpResponse::Created().json(body),
        Err(e) => Failure(e).error_response(),
    }
}
