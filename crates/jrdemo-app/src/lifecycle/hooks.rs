use std::sync::Arc;

use axum::response::Response;

use jrdemo_core::error::{DemoError, Result};
use jrdemo_core::sample::RequestTags;

use crate::context::RequestContext;
use crate::obs::MetricsEmitter;

/// Runs before handler dispatch.
pub trait BeforeRequest: Send + Sync {
    fn name(&self) -> &'static str;
    fn before_request(&self, ctx: &RequestContext) -> Result<()>;
}

/// Runs after the handler; receives the response and passes it on.
pub trait AfterRequest: Send + Sync {
    fn name(&self) -> &'static str;
    fn after_request(&self, ctx: &RequestContext, response: Response) -> Result<Response>;
}

/// Ordered hook chain. After-hooks run in registration order.
#[derive(Default)]
pub struct LifecycleHooks {
    before: Vec<Arc<dyn BeforeRequest>>,
    after: Vec<Arc<dyn AfterRequest>>,
}

impl LifecycleHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_before(&mut self, hook: Arc<dyn BeforeRequest>) {
        self.before.push(hook);
    }

    pub fn register_after(&mut self, hook: Arc<dyn AfterRequest>) {
        self.after.push(hook);
    }

    pub fn registered_after(&self) -> Vec<&'static str> {
        self.after.iter().map(|h| h.name()).collect()
    }

    pub fn run_before(&self, ctx: &RequestContext) -> Result<()> {
        for hook in &self.before {
            hook.before_request(ctx)?;
        }
        Ok(())
    }

    pub fn run_after(&self, ctx: &RequestContext, mut response: Response) -> Result<Response> {
        for hook in &self.after {
            response = hook.after_request(ctx, response)?;
        }
        Ok(response)
    }
}

fn tags_for(ctx: &RequestContext, response: &Response) -> RequestTags {
    RequestTags::new(ctx.path(), ctx.method(), response.status().as_u16())
}

/// Record the request start time.
pub fn start_timer(ctx: &RequestContext) {
    ctx.mark_started();
}

/// Emit the request counter.
pub fn record_request_data(
    ctx: &RequestContext,
    emitter: &MetricsEmitter,
    response: Response,
) -> Response {
    emitter.increment_count(tags_for(ctx, &response));
    response
}

/// Emit elapsed wall time since [`start_timer`].
///
/// Fails with [`DemoError::TimerNotStarted`] instead of guessing a latency.
pub fn stop_timer(
    ctx: &RequestContext,
    emitter: &MetricsEmitter,
    response: Response,
) -> Result<Response> {
    let started = ctx.started_at().ok_or(DemoError::TimerNotStarted)?;
    emitter.observe_latency(started.elapsed().as_secs_f64(), tags_for(ctx, &response));
    Ok(response)
}

pub struct StartTimer;

impl BeforeRequest for StartTimer {
    fn name(&self) -> &'static str {
        "start_timer"
    }
    fn before_request(&self, ctx: &RequestContext) -> Result<()> {
        start_timer(ctx);
        Ok(())
    }
}

pub struct RecordRequestData {
    emitter: MetricsEmitter,
}

impl AfterRequest for RecordRequestData {
    fn name(&self) -> &'static str {
        "record_request_data"
    }
    fn after_request(&self, ctx: &RequestContext, response: Response) -> Result<Response> {
        Ok(record_request_data(ctx, &self.emitter, response))
    }
}

pub struct StopTimer {
    emitter: MetricsEmitter,
}

impl AfterRequest for StopTimer {
    fn name(&self) -> &'static str {
        "stop_timer"
    }
    fn after_request(&self, ctx: &RequestContext, response: Response) -> Result<Response> {
        stop_timer(ctx, &self.emitter, response)
    }
}

/// Register the metric hooks. The counter hook is registered before the
/// latency hook so `request_count` always precedes the latency sample.
pub fn setup_metrics(hooks: &mut LifecycleHooks, emitter: &MetricsEmitter) {
    hooks.register_before(Arc::new(StartTimer));
    hooks.register_after(Arc::new(RecordRequestData { emitter: emitter.clone() }));
    hooks.register_after(Arc::new(StopTimer { emitter: emitter.clone() }));
}
