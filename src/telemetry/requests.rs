use std::{convert::Infallible, fmt, sync::Arc, task, time::Duration};

use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, Request},
    response::Response,
};
use eyre::Report;
use futures::future::BoxFuture;
use tower::{Layer, Service};
use tower_http::{
    classify::{ClassifiedResponse, ClassifyResponse, NeverClassifyEos, SharedClassifier},
    trace::{DefaultOnBodyChunk, DefaultOnEos, TraceLayer},
};
use tracing::Span;
use uuid::Uuid;

pub(crate) const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlates log lines for one request. A valid UUID supplied by a proxy is kept.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RequestId(Uuid);

impl RequestId {
    fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value).ok())
            .map(Self)
            .unwrap_or_else(|| Self(Uuid::new_v4()))
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy)]
pub(crate) struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

#[derive(Clone)]
pub(crate) struct RequestIdService<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RequestIdService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>, Error = Infallible>,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut task::Context<'_>) -> task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let id = RequestId::from_headers(req.headers());
        req.extensions_mut().insert(id);

        let res = self.inner.call(req);

        Box::pin(async move {
            let mut res = res.await?;
            if let Ok(value) = HeaderValue::from_str(&id.to_string()) {
                res.headers_mut().insert(REQUEST_ID_HEADER, value);
            }
            Ok(res)
        })
    }
}

pub(crate) fn id_layer() -> RequestIdLayer {
    RequestIdLayer
}

pub(crate) fn trace_layer() -> TraceLayer<
    SharedClassifier<Classifier>,
    impl (FnMut(&Request<Body>) -> Span) + Clone,
    impl FnMut(&Request<Body>, &Span) + Clone,
    impl FnOnce(&Response, Duration, &Span) + Clone,
    DefaultOnBodyChunk,
    DefaultOnEos,
    impl FnMut(Arc<Report>, Duration, &Span) + Clone,
> {
    TraceLayer::new(SharedClassifier::new(Classifier::default()))
        .make_span_with(|request: &Request<Body>| {
            let id = request
                .extensions()
                .get::<RequestId>()
                .copied()
                .unwrap_or(RequestId(Uuid::nil()));
            tracing::debug_span!(
                "request",
                %id,
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|_request: &Request<Body>, _span: &Span| {
            tracing::debug!("started processing request")
        })
        .on_response(|response: &Response, latency: Duration, _span: &Span| {
            tracing::debug!(
                status = %response.status().as_u16(),
                latency = %format_args!("{}ms", latency.as_millis()),
                "finished processing request",
            )
        })
        .on_failure(|error: Arc<Report>, latency: Duration, _span: &Span| {
            tracing::error!(
                error = ?error.as_ref(),
                latency = %format_args!("{}ms", latency.as_millis()),
                "error processing request",
            );
        })
}

/// Treats responses carrying an attached report, and any other 5xx, as failures.
///
/// The record store being unreachable surfaces as a 502 with the report attached, so it is logged
/// with its cause chain even though visitors only see a generic message.
#[derive(Clone, Default)]
pub(crate) struct Classifier;

impl ClassifyResponse for Classifier {
    type FailureClass = Arc<Report>;
    type ClassifyEos = NeverClassifyEos<Self::FailureClass>;

    fn classify_response<B>(
        self,
        response: &Response<B>,
    ) -> ClassifiedResponse<Self::FailureClass, Self::ClassifyEos> {
        let error: Option<&Arc<Report>> = response.extensions().get();
        if let Some(error) = error {
            ClassifiedResponse::Ready(Err(error.clone()))
        } else if response.status().is_server_error() {
            ClassifiedResponse::Ready(Err(Arc::new(Report::msg(format!(
                "{} without a recorded error",
                response.status()
            )))))
        } else {
            ClassifiedResponse::Ready(Ok(()))
        }
    }

    fn classify_error<E>(self, error: &E) -> Self::FailureClass
    where
        E: std::fmt::Display + 'static,
    {
        Arc::new(Report::msg(error.to_string()))
    }
}
