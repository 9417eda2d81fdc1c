//! `GET /api/hello`: validate, count, time the simulated work, answer.
//!
//! Ordering matters here. Validation runs before either meter is touched,
//! so a rejected request leaves no trace in the business metrics. Once
//! validation passes the counter is bumped exactly once and the timer gets
//! exactly one sample, even when the work is zero-length or cut short.

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;

use hellometer_core::error::{HellometerError, Result};
use hellometer_core::protocol::hello::{HelloQuery, HelloResponse};
use hellometer_core::protocol::work::WorkPlan;

use super::error::ApiError;
use super::work::{simulate, WorkOutcome};
use crate::app_state::AppState;
use crate::obs::business::BusinessMeters;
use crate::obs::metrics::{Counter, Timer};
use crate::shutdown::Shutdown;

/// Request handler holding explicit references to the shared meters.
pub struct HelloHandler {
    events: Arc<Counter>,
    operation: Arc<Timer>,
    shutdown: Shutdown,
}

impl HelloHandler {
    pub fn new(meters: &BusinessMeters, shutdown: Shutdown) -> Self {
        Self {
            events: Arc::clone(&meters.events),
            operation: Arc::clone(&meters.operation),
            shutdown,
        }
    }

    pub async fn handle(&self, query: HelloQuery) -> Result<HelloResponse> {
        let req = query.validate().map_err(|e| {
            tracing::debug!(error = %e, "hello rejected");
            e
        })?;

        self.events.increment();

        let plan = WorkPlan::draw(req.work_ms);
        let sample = self.operation.start();
        let outcome = simulate(plan.total(), &self.shutdown).await;
        let elapsed = sample.stop();

        if outcome == WorkOutcome::Interrupted {
            tracing::debug!(work_ms = req.work_ms, "simulated work interrupted by shutdown");
        }
        tracing::debug!(
            name = %req.name,
            work_ms = req.work_ms,
            jitter_ms = plan.jitter_ms,
            elapsed_ms = elapsed.as_millis() as u64,
            "hello served"
        );

        Ok(HelloResponse::for_request(&req))
    }
}

/// Axum entry. A query string that cannot be decoded at all is a bad request;
/// field-level checks happen in `HelloQuery::validate`.
pub async fn hello(
    State(app): State<AppState>,
    query: std::result::Result<Query<HelloQuery>, QueryRejection>,
) -> std::result::Result<Json<HelloResponse>, ApiError> {
    let Query(query) = query.map_err(|e| HellometerError::BadRequest(e.body_text()))?;
    let resp = app.hello().handle(query).await?;
    Ok(Json(resp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obs::metrics::MetricsRegistry;
    use hellometer_core::protocol::work::jitter_upper_bound_ms;
    use std::time::Duration;

    fn handler() -> (HelloHandler, BusinessMeters) {
        let registry = MetricsRegistry::new();
        let meters = BusinessMeters::register(&registry).expect("meters");
        (HelloHandler::new(&meters, Shutdown::new()), meters)
    }

    #[tokio::test(start_paused = true)]
    async fn ada_25_sample_stays_in_jitter_window() {
        let (h, meters) = handler();
        let resp = h
            .handle(HelloQuery::new(Some("Ada"), Some(25)))
            .await
            .expect("valid");
        assert_eq!(resp.message, "Hello Ada!");
        assert_eq!(resp.work_ms_requested, 25);

        assert_eq!(meters.events.count(), 1);
        assert_eq!(meters.operation.count(), 1);
        let sample = meters.operation.total();
        assert!(sample >= Duration::from_millis(25), "{sample:?}");
        assert!(sample < Duration::from_millis(38), "{sample:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn samples_stay_inside_the_jitter_window_at_the_edges() {
        for work_ms in [0u32, 1, 2, 999, 1000] {
            let (h, meters) = handler();
            let resp = h
                .handle(HelloQuery::new(None, Some(i64::from(work_ms))))
                .await
                .expect("valid");
            assert_eq!(resp.work_ms_requested, work_ms);
            assert_eq!(meters.operation.count(), 1);

            let lo = Duration::from_millis(u64::from(work_ms));
            let hi = lo + Duration::from_millis(u64::from(jitter_upper_bound_ms(work_ms)));
            let sample = meters.operation.total();
            assert!(sample >= lo, "workMs={work_ms}: {sample:?} < {lo:?}");
            assert!(sample < hi, "workMs={work_ms}: {sample:?} >= {hi:?}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn defaults_and_zero_work() {
        let (h, meters) = handler();
        let resp = h.handle(HelloQuery::default()).await.expect("valid");
        assert_eq!(resp.message, "Hello JP!");
        assert_eq!(resp.work_ms_requested, 10);

        h.handle(HelloQuery::new(None, Some(0))).await.expect("valid");
        assert_eq!(meters.events.count(), 2);
        assert_eq!(meters.operation.count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_requests_touch_no_meter() {
        let (h, meters) = handler();
        for bad in [-1, 1001] {
            let err = h
                .handle(HelloQuery::new(None, Some(bad)))
                .await
                .expect_err("must reject");
            assert_eq!(err.client_code().as_str(), "VALIDATION_FAILED");
        }
        assert_eq!(meters.events.count(), 0);
        assert_eq!(meters.operation.count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn interrupted_work_still_answers_and_records() {
        let registry = MetricsRegistry::new();
        let meters = BusinessMeters::register(&registry).expect("meters");
        let shutdown = Shutdown::new();
        shutdown.trigger();
        let h = HelloHandler::new(&meters, shutdown.clone());

        let resp = h
            .handle(HelloQuery::new(Some("Ada"), Some(1000)))
            .await
            .expect("interruption is not an error");
        assert_eq!(resp.work_ms_requested, 1000);
        assert!(shutdown.is_triggered());
        assert_eq!(meters.events.count(), 1);
        assert_eq!(meters.operation.count(), 1);
        assert!(meters.operation.total() < Duration::from_millis(1000));
    }
}
