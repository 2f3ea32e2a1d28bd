use std::time::Duration;

use chrono::Utc;
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use crate::config::TimingConfig;
use crate::error::{AppError, AppResult};

const REFERENCE_PREFIX: &str = "NCPR-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    /// The contact page's `#contact-form`.
    Contact,
    /// One of the `.enquiry-form` forms (adoption, fostering, ...).
    Enquiry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub kind: FormKind,
    /// Form `id`, used in logs and tracking.
    pub form: String,
    pub fields: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub reference: String,
}

impl SubmissionReceipt {
    pub fn now() -> Self {
        Self {
            reference: reference_token(Utc::now().timestamp_millis()),
        }
    }
}

/// `NCPR-` followed by the last six digits of `epoch_millis`.
pub fn reference_token(epoch_millis: i64) -> String {
    format!("{REFERENCE_PREFIX}{:06}", epoch_millis.rem_euclid(1_000_000))
}

/// Delivers a validated form somewhere.
///
/// The returned future must resolve promptly once `cancel` fires; its result
/// is discarded in that case.
pub trait Submitter: Send + Sync {
    fn submit(
        &self,
        request: SubmissionRequest,
        cancel: CancellationToken,
    ) -> BoxFuture<'static, AppResult<SubmissionReceipt>>;
}

/// Stands in for a backend: waits, then always succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedSubmitter {
    pub contact_delay: Duration,
    pub enquiry_delay: Duration,
}

impl SimulatedSubmitter {
    pub fn from_timing(timing: &TimingConfig) -> Self {
        Self {
            contact_delay: timing.contact_submit_delay(),
            enquiry_delay: timing.submit_delay(),
        }
    }

    fn delay_for(&self, kind: FormKind) -> Duration {
        match kind {
            FormKind::Contact => self.contact_delay,
            FormKind::Enquiry => self.enquiry_delay,
        }
    }
}

impl Default for SimulatedSubmitter {
    fn default() -> Self {
        Self::from_timing(&TimingConfig::default())
    }
}

impl Submitter for SimulatedSubmitter {
    fn submit(
        &self,
        request: SubmissionRequest,
        cancel: CancellationToken,
    ) -> BoxFuture<'static, AppResult<SubmissionReceipt>> {
        let delay = self.delay_for(request.kind);
        async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    Err(AppError::submission(request.form, "cancelled"))
                }
                _ = tokio::time::sleep(delay) => {
                    tracing::debug!(form = %request.form, fields = request.fields.len(), "simulated submission accepted");
                    Ok(SubmissionReceipt::now())
                }
            }
        }
        .boxed()
    }
}

/// Resolves immediately with a fixed outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstantSubmitter {
    failure: Option<String>,
}

impl InstantSubmitter {
    pub fn accepting() -> Self {
        Self { failure: None }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
        }
    }
}

impl Submitter for InstantSubmitter {
    fn submit(
        &self,
        request: SubmissionRequest,
        _cancel: CancellationToken,
    ) -> BoxFuture<'static, AppResult<SubmissionReceipt>> {
        let outcome = match &self.failure {
            Some(message) => Err(AppError::submission(request.form, message.clone())),
            None => Ok(SubmissionReceipt::now()),
        };
        futures_util::future::ready(outcome).boxed()
    }
}
