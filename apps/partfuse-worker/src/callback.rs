use partfuse::partfuse_job::{CallbackBody, CallbackClient, CallbackError};

/// Callback client for transport-free runs: records the delivery in the log
/// and reports success. A deployment wires a real HTTP client instead.
#[derive(Debug, Default)]
pub struct LogCallback;

impl CallbackClient for LogCallback {
    fn patch(&mut self, url: &str, body: &CallbackBody) -> Result<(), CallbackError> {
        log::info!("PATCH {url} status={}", body.status);
        Ok(())
    }
}
