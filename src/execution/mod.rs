//! The execution loop (§4.1) — composes signing, transport, classification,
//! retry and interceptors into the single `execute` entry point.

pub mod context;
pub mod metrics;

pub use context::ExecutionContext;
pub use metrics::ExecutionMetrics;

use metrics::Timer;

use crate::classify::{classify, Classification};
use crate::client::Client;
use crate::clock::SkewedClock;
use crate::config::ClientConfig;
use crate::error::{ClientError, ExecutionError};
use crate::request::{rewind_body, HttpRequest, Request};
use crate::response::{ErrorResponseHandler, Response, ResponseHandler};
use crate::retry::effective_max_retries;
use crate::signer::Signer;

/// Runs `request` to completion: signs, sends, classifies, retries and
/// redirects according to `client`'s retry policy, and invokes every
/// interceptor in `ctx` exactly once on the way out (`after_response` xor
/// `after_error`). On every loop exit, the response's content stream is
/// closed unless the handler that consumed it asked to leave the connection
/// open.
pub async fn execute<T>(
    client: &Client,
    request: &mut Request,
    on_success: &dyn ResponseHandler<T>,
    on_error: &dyn ErrorResponseHandler,
    ctx: &ExecutionContext,
) -> Result<Response<T>, ExecutionError> {
    if let Some(credentials) = &ctx.credentials {
        ctx.interceptors.inject_credentials(credentials);
    }
    ctx.interceptors.before_request(request);

    apply_user_agent_policy(client, request);

    let snapshot = crate::request::RequestSnapshot::capture(request);
    let mut metrics = ExecutionMetrics::default();
    let total_timer = Timer::start();

    let outcome = run_loop(client, request, on_success, on_error, ctx, &snapshot, &mut metrics).await;
    metrics.total_duration = total_timer.elapsed();
    tracing::debug!(attempts = metrics.attempts, total_duration = ?metrics.total_duration, "execute finished");

    match &outcome {
        Ok(response) => ctx.interceptors.after_response(request, &response.http_response),
        Err(error) => ctx.interceptors.after_error(request, error),
    }
    outcome
}

fn apply_user_agent_policy(client: &Client, request: &mut Request) {
    let mut user_agent = client.config.user_agent.clone();
    if user_agent != crate::config::DEFAULT_USER_AGENT {
        user_agent = ClientConfig::append_user_agent(&user_agent, crate::config::DEFAULT_USER_AGENT);
    }
    if let Some(marker) = &request.original.user_agent_marker {
        user_agent = ClientConfig::append_user_agent(&user_agent, marker);
    }
    request.headers.insert("User-Agent".to_string(), user_agent);
}

#[allow(clippy::too_many_arguments)]
async fn run_loop<T>(
    client: &Client,
    request: &mut Request,
    on_success: &dyn ResponseHandler<T>,
    on_error: &dyn ErrorResponseHandler,
    ctx: &ExecutionContext,
    snapshot: &crate::request::RequestSnapshot,
    metrics: &mut ExecutionMetrics,
) -> Result<Response<T>, ExecutionError> {
    let effective_max = effective_max_retries(client.config.retry_policy.as_ref(), client.config.max_error_retry);

    let mut attempt: u32 = 0;
    let mut redirect_uri: Option<String> = None;
    let mut prev_error: Option<ExecutionError> = None;
    let mut signer: Option<std::sync::Arc<dyn Signer>> = None;
    let mut leave_open = false;

    loop {
        attempt += 1;
        metrics.attempts = attempt;
        if attempt > 1 {
            snapshot.restore(request);
        }

        if signer.is_none() {
            signer = ctx.signer_resolver.signer_for(&request.service_name);
        }
        if let (Some(signer), Some(credentials)) = (&signer, &ctx.credentials) {
            let sign_timer = Timer::start();
            let skewed_clock = SkewedClock {
                clock: client.clock.as_ref(),
                skew: &client.clock_skew,
            };
            signer.sign(request, credentials, &skewed_clock)?;
            metrics.sign_duration += sign_timer.elapsed();
        }

        let http_request = HttpRequest::from_request(request, redirect_uri.as_deref());

        // A redirect-driven attempt (prev_error still unset) is not backed
        // off — only an actual error retry waits.
        if attempt > 1 {
            if let Some(prev) = &prev_error {
                let retries_so_far = attempt - 2;
                let delay = client.config.retry_policy.delay(prev, retries_so_far);
                let backoff_timer = Timer::start();
                crate::retry::wait(delay, &client.cancellation).await?;
                metrics.backoff_duration += backoff_timer.elapsed();
            }
        }

        if attempt == 1 {
            if let Some(body) = request.body.as_mut() {
                body.mark();
            }
        } else {
            rewind_body(request.body.as_mut())?;
        }

        let transport_timer = Timer::start();
        let sent = client.transport.execute(http_request).await;
        metrics.transport_duration += transport_timer.elapsed();

        let mut response = match sent {
            Ok(response) => response,
            Err(client_error) => {
                // The transport contract (§6) already returns a `ClientError`
                // shaped like "Unable to execute HTTP request: ..."; the
                // loop's job here is just to decide whether to retry it.
                let error = ExecutionError::Client(client_error);
                let retries_so_far = attempt - 1;
                if !client.config.retry_policy.should_retry(&error, retries_so_far) || retries_so_far >= effective_max {
                    return Err(error);
                }
                prev_error = Some(error);
                continue;
            }
        };

        match classify(&response) {
            Classification::Success => {
                leave_open = on_success.needs_connection_left_open();
                tracing::trace!(leave_open, status = response.status_code, "success response");
                let status_code = response.status_code;
                let body = on_success.handle(&response).map_err(|e| {
                    if e.is_io_error() {
                        ExecutionError::Client(e)
                    } else {
                        ExecutionError::Client(ClientError::with_cause(
                            format!("Unable to unmarshall response (status={status_code}): {e}"),
                            e,
                        ))
                    }
                })?;
                if !leave_open {
                    response.close();
                }
                return Ok(Response { body, http_response: response });
            }
            Classification::TemporaryRedirect(location) => {
                if !leave_open {
                    response.close();
                }
                redirect_uri = Some(location);
                continue;
            }
            Classification::ServiceError => {
                leave_open = on_error.needs_connection_left_open();
                let service_error = crate::unmarshal::unmarshal_error(on_error, &response, &request.service_name)?;
                let error = ExecutionError::Service(service_error.clone());

                let retries_so_far = attempt - 1;
                let should_retry = client.config.retry_policy.should_retry(&error, retries_so_far)
                    && retries_so_far < effective_max;

                if should_retry && service_error.is_clock_skew() {
                    let date_header = response.header("Date").map(|s| s.to_string());
                    let body_text = response
                        .body
                        .as_ref()
                        .map(|b| String::from_utf8_lossy(b).to_string())
                        .unwrap_or_default();
                    crate::clock::correct_clock_skew(
                        &client.clock_skew,
                        client.clock.as_ref(),
                        date_header.as_deref(),
                        &body_text,
                    );
                }

                if !leave_open {
                    response.close();
                }

                if !should_retry {
                    return Err(error);
                }
                prev_error = Some(error);
                continue;
            }
        }
    }
}

