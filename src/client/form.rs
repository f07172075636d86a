//! Membership signup form state.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Mutex, MutexGuard};

use super::{ClientError, TytcClient};
use crate::models::JoinRequest;

/// Outcome shown to the user after a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

/// A submission is already in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormBusy;

impl std::fmt::Display for FormBusy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "a submission is already in progress")
    }
}

impl std::error::Error for FormBusy {}

/// The signup form: field values, the in-flight flag and the displayed count.
pub struct SubmissionForm {
    client: TytcClient,
    fields: Mutex<JoinRequest>,
    submitting: AtomicBool,
    member_count: AtomicI64,
}

/// Clears the in-flight flag when the submission ends, including on cancellation.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SubmissionForm {
    pub fn new(client: TytcClient) -> Self {
        Self {
            client,
            fields: Mutex::new(JoinRequest::default()),
            submitting: AtomicBool::new(false),
            member_count: AtomicI64::new(0),
        }
    }

    fn lock_fields(&self) -> MutexGuard<'_, JoinRequest> {
        self.fields.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Edit the field values.
    pub fn update(&self, edit: impl FnOnce(&mut JoinRequest)) {
        edit(&mut self.lock_fields());
    }

    /// Snapshot of the current field values.
    pub fn fields(&self) -> JoinRequest {
        self.lock_fields().clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Last member count fetched.
    pub fn member_count(&self) -> i64 {
        self.member_count.load(Ordering::Relaxed)
    }

    /// Re-fetch the member count, using the fallback value on failure.
    pub async fn refresh_count(&self) -> i64 {
        let count = self.client.member_count_or_fallback().await;
        self.member_count.store(count, Ordering::Relaxed);
        count
    }

    /// Submit the form.
    ///
    /// Returns [`FormBusy`] while another submission is pending. On success the
    /// fields are cleared and the count refreshed; on failure the fields are kept.
    pub async fn submit(&self) -> Result<Notification, FormBusy> {
        if self
            .submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(FormBusy);
        }
        let _in_flight = InFlight(&self.submitting);

        let request = self.fields();
        if let Err(msg) = request.validate() {
            let err = ClientError::Validation(msg);
            return Ok(Notification::Error(err.user_message()));
        }

        match self.client.join(&request).await {
            Ok(response) if response.success => {
                *self.lock_fields() = JoinRequest::default();
                self.refresh_count().await;
                Ok(Notification::Success(response.message))
            }
            Ok(_) => Ok(Notification::Error("Failed to join TYTC".to_string())),
            Err(e) => {
                tracing::warn!("Error joining TYTC: {}", e);
                Ok(Notification::Error(e.user_message()))
            }
        }
    }
}
