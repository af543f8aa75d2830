use partfuse_mesh::MeshCodec;
use uuid::Uuid;

use crate::capabilities::{CallbackBody, CallbackClient, CallbackStatus, Generator, ObjectStore};
use crate::message::JobMessage;
use crate::stages::{Disposition, StageOutcomes};

/// Drives one job end to end: parse, generate, upload, callback, and derive
/// the disposition. Stages catch their own failures and record a boolean
/// outcome; nothing propagates past this boundary.
pub struct JobRunner<G, S, X, C> {
    generator: G,
    store: S,
    codec: X,
    callback: C,
    secret: String,
}

impl<G, S, X, C> JobRunner<G, S, X, C>
where
    G: Generator,
    S: ObjectStore,
    X: MeshCodec,
    C: CallbackClient,
{
    pub fn new(generator: G, store: S, codec: X, callback: C, secret: impl Into<String>) -> Self {
        Self {
            generator,
            store,
            codec,
            callback,
            secret: secret.into(),
        }
    }

    /// Processes one inbound payload. Never panics, never returns an error;
    /// every failure path ends in a disposition.
    pub fn process(&mut self, payload: &[u8]) -> Disposition {
        let job_id = Uuid::new_v4();
        let mut outcomes = StageOutcomes::default();

        let message = match JobMessage::from_bytes(payload) {
            Ok(message) => message,
            Err(err) => {
                log::error!("job {job_id}: invalid message body: {err}");
                outcomes.parse_failed = true;
                return outcomes.disposition();
            }
        };

        log::info!(
            "job {job_id}: received task for {}",
            message.customizer_name
        );

        let final_mesh = match self.generator.generate(&message.metadata) {
            Ok(mesh) => {
                outcomes.generated = true;
                log::info!("job {job_id}: mesh generated");
                Some(mesh)
            }
            Err(err) => {
                log::error!("job {job_id}: generation failed: {err}");
                None
            }
        };

        if let Some(mesh) = final_mesh {
            let upload = self
                .codec
                .encode(&mesh)
                .map_err(|err| err.to_string())
                .and_then(|data| {
                    self.store
                        .put(&message.output_object_key, &data)
                        .map_err(|err| err.to_string())
                });
            match upload {
                Ok(()) => {
                    outcomes.uploaded = true;
                    log::info!(
                        "job {job_id}: mesh uploaded to {}",
                        message.output_object_key
                    );
                }
                Err(err) => log::error!("job {job_id}: upload failed: {err}"),
            }
        }

        if outcomes.uploaded {
            let body = CallbackBody::new(self.secret.clone(), CallbackStatus::Success);
            match self.callback.patch(&message.callback_url, &body) {
                Ok(()) => {
                    outcomes.patched = true;
                    log::info!("job {job_id}: callback patched");
                }
                Err(err) => log::error!("job {job_id}: {err}"),
            }
        }

        let disposition = outcomes.disposition();
        log::info!("job {job_id}: disposition {disposition:?}");
        disposition
    }
}
