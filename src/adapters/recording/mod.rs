//! Recording adapters that capture interactions to cassettes.

pub mod talking_video;

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::cassette::recorder::CassetteRecorder;

/// Record one interaction. Serialization or lock failures are logged and the
/// interaction is skipped; recording never changes the caller's result.
pub(crate) fn record_interaction<I, O>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    output: &O,
) where
    I: Serialize,
    O: Serialize,
{
    let (input_json, output_json) = match (serde_json::to_value(input), serde_json::to_value(output))
    {
        (Ok(i), Ok(o)) => (i, o),
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(port, method, "skipping interaction that failed to serialize: {e}");
            return;
        }
    };

    match recorder.lock() {
        Ok(mut guard) => guard.record(port, method, input_json, output_json),
        Err(e) => tracing::warn!(port, method, "recorder lock poisoned: {e}"),
    }
}
