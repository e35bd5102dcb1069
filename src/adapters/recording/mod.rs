//! Recording adapters that capture interactions to cassettes.

pub mod image_generator;

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::cassette::recorder::CassetteRecorder;

/// Record a `Result<T, E>` interaction using the Ok/Err JSON convention.
///
/// A value that fails to serialize is recorded as `null` with a warning
/// rather than aborting the batch.
pub(crate) fn record_result<T, E, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: std::fmt::Display,
    I: Serialize,
{
    let input_json = to_json_or_null(input);

    let output_json = match result {
        Ok(v) => serde_json::json!({ "Ok": to_json_or_null(v) }),
        Err(e) => serde_json::json!({ "Err": e.to_string() }),
    };

    match recorder.lock() {
        Ok(mut guard) => guard.record(port, method, input_json, output_json),
        Err(e) => tracing::warn!("recorder lock poisoned, interaction dropped: {e}"),
    }
}

fn to_json_or_null<V: Serialize>(value: &V) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or_else(|e| {
        tracing::warn!("failed to serialize recorded value: {e}");
        serde_json::Value::Null
    })
}
