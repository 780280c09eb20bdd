// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Signup-request registry — the admin dashboard's data layer.
//
// The whole request list persists as one encrypted blob under a fixed key;
// every mutation is a full read-modify-write cycle through the encrypted
// store.  A missing or undecryptable blob reads as an empty list, so a
// fresh install and a damaged store look the same: no requests yet.

use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use anteroom_core::error::{AnteroomError, Result};
use anteroom_core::types::{
    RequestDraft, RequestFilter, RequestId, RequestStats, RequestStatus, SignupRequest,
};
use anteroom_core::validate::{is_not_empty, is_valid_email, is_valid_phone, sanitize_text};
use anteroom_security::EncryptedStore;

/// Storage key for the encrypted request list.
const REQUESTS_KEY: &str = "staff_requests";

/// Check every submitted field before anything is stored.
fn validate_draft(draft: &RequestDraft) -> Result<()> {
    if !is_not_empty(&draft.full_name) {
        return Err(AnteroomError::InvalidField {
            field: "full_name",
            reason: "must not be empty".into(),
        });
    }
    if !is_valid_email(&draft.email) {
        return Err(AnteroomError::InvalidField {
            field: "email",
            reason: "not a valid email address".into(),
        });
    }
    if !is_valid_phone(&draft.phone) {
        return Err(AnteroomError::InvalidField {
            field: "phone",
            reason: "must be a 10-digit Indian mobile number".into(),
        });
    }
    if !is_not_empty(&draft.location) {
        return Err(AnteroomError::InvalidField {
            field: "location",
            reason: "must not be empty".into(),
        });
    }
    if !is_not_empty(&draft.description) {
        return Err(AnteroomError::InvalidField {
            field: "description",
            reason: "must not be empty".into(),
        });
    }
    Ok(())
}

/// Escape the free-text fields for safe re-display.
///
/// Email and phone are shape-validated instead; nothing that passes
/// validation can carry markup.
fn sanitized(mut draft: RequestDraft) -> RequestDraft {
    draft.full_name = sanitize_text(&draft.full_name);
    draft.location = sanitize_text(&draft.location);
    draft.description = sanitize_text(&draft.description);
    draft.other_service = draft.other_service.map(|s| sanitize_text(&s));
    draft
}

/// The signup-request registry.
pub struct RequestRegistry {
    store: EncryptedStore,
}

impl RequestRegistry {
    pub fn new(store: EncryptedStore) -> Self {
        Self { store }
    }

    /// Validate `draft`, stamp it, and append it with `Pending` status.
    #[instrument(skip_all)]
    pub fn submit(&self, draft: RequestDraft) -> Result<SignupRequest> {
        validate_draft(&draft)?;
        let request = SignupRequest::new(sanitized(draft));

        let mut requests = self.load();
        requests.push(request.clone());
        self.save(&requests)?;

        info!(id = %request.id, "signup request submitted");
        Ok(request)
    }

    /// All stored requests in insertion order.
    pub fn all(&self) -> Vec<SignupRequest> {
        self.load()
    }

    /// Requests matching `filter`, newest first.
    pub fn filtered(&self, filter: RequestFilter) -> Vec<SignupRequest> {
        let mut requests: Vec<_> = self
            .load()
            .into_iter()
            .filter(|r| filter.matches(r.status))
            .collect();
        requests.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        requests
    }

    /// Counts per status.
    pub fn stats(&self) -> RequestStats {
        let requests = self.load();
        let mut stats = RequestStats {
            total: requests.len(),
            ..RequestStats::default()
        };
        for request in &requests {
            match request.status {
                RequestStatus::Pending => stats.pending += 1,
                RequestStatus::Approved => stats.approved += 1,
                RequestStatus::Rejected => stats.rejected += 1,
            }
        }
        stats
    }

    /// Look up a single request by id.
    pub fn get(&self, id: &RequestId) -> Option<SignupRequest> {
        self.load().into_iter().find(|r| r.id == *id)
    }

    /// Mark a request approved and stamp `approved_at`.
    pub fn approve(&self, id: &RequestId) -> Result<SignupRequest> {
        self.approve_at(id, Utc::now())
    }

    #[instrument(skip_all, fields(%id))]
    pub fn approve_at(&self, id: &RequestId, now: DateTime<Utc>) -> Result<SignupRequest> {
        let updated = self.update(id, |request| {
            request.status = RequestStatus::Approved;
            request.approved_at = Some(now);
        })?;
        info!(%id, "signup request approved");
        Ok(updated)
    }

    /// Mark a request rejected and stamp `rejected_at`.
    pub fn reject(&self, id: &RequestId) -> Result<SignupRequest> {
        self.reject_at(id, Utc::now())
    }

    #[instrument(skip_all, fields(%id))]
    pub fn reject_at(&self, id: &RequestId, now: DateTime<Utc>) -> Result<SignupRequest> {
        let updated = self.update(id, |request| {
            request.status = RequestStatus::Rejected;
            request.rejected_at = Some(now);
        })?;
        info!(%id, "signup request rejected");
        Ok(updated)
    }

    /// Delete a request permanently.
    #[instrument(skip_all, fields(%id))]
    pub fn remove(&self, id: &RequestId) -> Result<()> {
        let mut requests = self.load();
        let before = requests.len();
        requests.retain(|r| r.id != *id);

        if requests.len() == before {
            return Err(AnteroomError::RequestNotFound(id.to_string()));
        }

        self.save(&requests)?;
        info!(%id, "signup request removed");
        Ok(())
    }

    fn load(&self) -> Vec<SignupRequest> {
        self.store.retrieve(REQUESTS_KEY).unwrap_or_default()
    }

    fn save(&self, requests: &[SignupRequest]) -> Result<()> {
        self.store.store(REQUESTS_KEY, &requests)
    }

    fn update(
        &self,
        id: &RequestId,
        apply: impl FnOnce(&mut SignupRequest),
    ) -> Result<SignupRequest> {
        let mut requests = self.load();
        let Some(request) = requests.iter_mut().find(|r| r.id == *id) else {
            return Err(AnteroomError::RequestNotFound(id.to_string()));
        };

        apply(request);
        let updated = request.clone();
        self.save(&requests)?;
        Ok(updated)
    }
}
