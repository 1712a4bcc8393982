//! Bounded-retry call sites for the account recovery flows.
//!
//! Unlike the list loaders these calls never substitute data: exhaustion
//! surfaces the final error to the caller, which turns it into user
//! feedback. Both flows retry as a unit, so every attempt shares the
//! correlation id supplied up front.

use std::time::Duration;

use serde_json::{json, Value};

use crm_transport::{correlation_id, ApiRequest, GatewayError, RequestGateway, RetryPolicy, REQUEST_ID_HEADER};

const RECOVERY_ATTEMPTS: u32 = 3;
const RECOVERY_DELAY: Duration = Duration::from_millis(400);

/// Submit a password-reset request for `email`, retrying every failure up
/// to three times. The final error, if any, is the server's own.
pub fn submit_password_reset(gateway: &RequestGateway, email: &str) -> Result<(), GatewayError> {
    let policy = RetryPolicy::new(RECOVERY_ATTEMPTS, RECOVERY_DELAY);
    let request_id = correlation_id();
    policy.run(|| {
        gateway
            .send(
                ApiRequest::post("/auth/password-reset")
                    .header(REQUEST_ID_HEADER, request_id.clone())
                    .body(json!({ "email": email })),
            )
            .map(|_| ())
    })
}

/// Re-verify the current session after a token refresh. Only transport
/// failures and 5xx are worth reattempting; a 401 here means the refreshed
/// token is genuinely bad and retrying would just repeat the answer.
pub fn verify_session(gateway: &RequestGateway) -> Result<Value, GatewayError> {
    let policy = RetryPolicy::new(RECOVERY_ATTEMPTS, RECOVERY_DELAY);
    let request_id = correlation_id();
    policy.run_if(
        || {
            gateway.send(
                ApiRequest::get("/auth/verify").header(REQUEST_ID_HEADER, request_id.clone()),
            )
        },
        |err| err.status().map_or(true, |status| status >= 500),
    )
}
