use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::{InternalError, JsonPayloadError},
    Error, HttpRequest, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

use crate::core::AppError;

/// Logs server-side failures; client errors stay at `info`
pub struct ErrorHandler;

impl<S, B> Transform<S, ServiceRequest> for ErrorHandler
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = ErrorHandlerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ErrorHandlerMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct ErrorHandlerMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for ErrorHandlerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let path = req.path().to_string();

        Box::pin(async move {
            let result = service.call(req).await;

            match &result {
                Ok(res) => {
                    let status = res.status();
                    if status.is_server_error() {
                        let failure = res.response().error();
                        let transient = failure
                            .and_then(|e| e.as_error::<AppError>())
                            .is_some_and(AppError::is_transient);
                        let error = failure.map(|e| e.to_string());
                        tracing::error!(
                            path = %path,
                            status = %status,
                            transient,
                            error = ?error,
                            "Request failed"
                        );
                    } else if status.is_client_error() {
                        tracing::info!(path = %path, status = %status, "Request rejected");
                    }
                }
                Err(err) => tracing::error!(path = %path, "Request error: {:?}", err),
            }

            result
        })
    }
}

/// Render malformed JSON bodies as `400 {"error": "..."}`
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    let message = err.to_string();
    let response = HttpResponse::BadRequest().json(serde_json::json!({ "error": message }));
    InternalError::from_response(err, response).into()
}
