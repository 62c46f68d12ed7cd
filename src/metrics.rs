use axum::routing::get;
use axum_prometheus::PrometheusMetricLayer;
use once_cell::sync::Lazy;
use prometheus::{Encoder, Opts, TextEncoder};
use crate::domain::HandlerError;

pub const METRICS_PATH: &str = "/metrics";

/// Register additional metrics of our own structs by using this registry instance.
static REGISTRY: Lazy<Registry> = Lazy::new(|| Registry(prometheus::Registry::new()));

pub static UPDATES_COUNTER: Lazy<Counter> = Lazy::new(|| {
    Counter::new("updates", Opts::new("updates_received_total", "count of well-formed updates received by the webhook"))
});
pub static CMD_START_COUNTER: Lazy<Counter> = Lazy::new(|| {
    Counter::new("command_start", Opts::new("start_replies_total", "count of /start invocations answered with the chat ID"))
});
pub static ERRORS_COUNTER: Lazy<ErrorCounters> = Lazy::new(|| {
    let opts = Opts::new("update_errors_total", "count of updates that couldn't be processed");
    ErrorCounters {
        malformed_input: Counter::new("errors (malformed input)", opts.clone().const_label("kind", "malformed_input")),
        rendering: Counter::new("errors (rendering)", opts.clone().const_label("kind", "rendering")),
        downstream: Counter::new("errors (downstream)", opts.const_label("kind", "downstream")),
    }
});

pub fn init() -> axum::Router {
    let prometheus = REGISTRY
        .register(&UPDATES_COUNTER)
        .register(&CMD_START_COUNTER)
        .register(&ERRORS_COUNTER.malformed_input)
        .register(&ERRORS_COUNTER.rendering)
        .register(&ERRORS_COUNTER.downstream)
        .unwrap();

    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
    axum::Router::new()
        .route(METRICS_PATH, get(|| async move {
            let mut buffer = vec![];
            let metrics = prometheus.gather();
            if let Err(e) = TextEncoder::new().encode(&metrics, &mut buffer) {
                log::error!("couldn't encode the custom metrics: {e}");
            }
            metric_handle.render() + String::from_utf8_lossy(&buffer).as_ref()
        }))
        .layer(prometheus_layer)
}

pub struct Counter {
    inner: prometheus::Counter,
    name: String
}
pub struct ErrorCounters {
    malformed_input: Counter,
    rendering: Counter,
    downstream: Counter,
}
struct Registry(prometheus::Registry);

impl Counter {
    fn new(name: &str, opts: Opts) -> Counter {
        let c = prometheus::Counter::with_opts(opts)
            .unwrap_or_else(|e| panic!("unable to create {name} counter: {e}"));
        Counter { inner: c, name: name.to_string() }
    }

    pub fn inc(&self) {
        self.inner.inc()
    }
}

impl ErrorCounters {
    pub fn inc(&self, err: &HandlerError) {
        match err {
            HandlerError::MalformedInput(_) => self.malformed_input.inc(),
            HandlerError::Rendering(_) => self.rendering.inc(),
            HandlerError::Downstream(_) => self.downstream.inc(),
        }
    }
}

impl Registry {
    fn register(&self, counter: &Counter) -> &Self {
        self.0.register(Box::new(counter.inner.clone()))
            .unwrap_or_else(|e| panic!("unable to register the {} counter: {e}", counter.name));
        self
    }

    fn unwrap(&self) -> prometheus::Registry {
        self.0.clone()
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use teloxide::{ApiError, RequestError};
    use tower::ServiceExt;
    use crate::config::AppConfig;
    use crate::domain::MalformedInputError;
    use crate::handlers::test::{RecordingSender, START_UPDATE};
    use crate::webhook;
    use super::*;

    async fn call(app: axum::Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    // the only test allowed to call init(): both registries are process-wide
    #[tokio::test]
    async fn test_metrics_route() {
        let app = axum::Router::new()
            .merge(init())
            .merge(webhook::router(Arc::new(RecordingSender::default()), AppConfig::default()));
        let updates_before = UPDATES_COUNTER.inner.get();
        let starts_before = CMD_START_COUNTER.inner.get();

        let start = Request::post("/webhook").body(Body::from(START_UPDATE)).unwrap();
        assert_eq!(call(app.clone(), start).await.0, StatusCode::OK);
        let garbage = Request::post("/webhook").body(Body::from("not-json")).unwrap();
        assert_eq!(call(app.clone(), garbage).await.0, StatusCode::INTERNAL_SERVER_ERROR);

        assert!(UPDATES_COUNTER.inner.get() >= updates_before + 1.0);
        assert!(CMD_START_COUNTER.inner.get() >= starts_before + 1.0);

        let (status, exposition) = call(app, Request::get(METRICS_PATH).body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert!(exposition.contains("updates_received_total"));
        assert!(exposition.contains("start_replies_total"));
        assert!(exposition.contains(r#"update_errors_total{kind="malformed_input"}"#));
        assert!(exposition.contains(r#"update_errors_total{kind="downstream"}"#));
    }

    #[test]
    fn test_error_counters() {
        let before = ERRORS_COUNTER.downstream.inner.get();
        ERRORS_COUNTER.inc(&HandlerError::Downstream(RequestError::Api(ApiError::BotBlocked)));
        assert!(ERRORS_COUNTER.downstream.inner.get() >= before + 1.0);

        let before = ERRORS_COUNTER.malformed_input.inner.get();
        ERRORS_COUNTER.inc(&HandlerError::MalformedInput(MalformedInputError::MissingBody));
        assert!(ERRORS_COUNTER.malformed_input.inner.get() >= before + 1.0);
    }
}
