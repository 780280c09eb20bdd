// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Anteroom admin portal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a vendor signup request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RequestId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Review states of a signup request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Submitted, awaiting an admin decision.
    Pending,
    /// Accepted — the vendor receives the company contact details.
    Approved,
    /// Declined.
    Rejected,
}

impl RequestStatus {
    /// Lowercase badge text shown next to a request.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service lines a vendor can sign up for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceCategory {
    Construction,
    Food,
    Travel,
    Gst,
    Marketing,
    It,
    /// Anything else — described in the request's `other_service` field.
    Other,
}

impl ServiceCategory {
    /// Display label for the category.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Construction => "Construction",
            Self::Food => "Food Services",
            Self::Travel => "Travel & Tourism",
            Self::Gst => "GST Services",
            Self::Marketing => "Digital Marketing",
            Self::It => "IT Solutions",
            Self::Other => "Other",
        }
    }

    /// Short code used in stored records and form submissions.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Construction => "construction",
            Self::Food => "food",
            Self::Travel => "travel",
            Self::Gst => "gst",
            Self::Marketing => "marketing",
            Self::It => "it",
            Self::Other => "other",
        }
    }

    /// Parse a category from its short code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_lowercase().as_str() {
            "construction" => Some(Self::Construction),
            "food" => Some(Self::Food),
            "travel" => Some(Self::Travel),
            "gst" => Some(Self::Gst),
            "marketing" => Some(Self::Marketing),
            "it" => Some(Self::It),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Fields collected from the vendor signup form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestDraft {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub service_category: ServiceCategory,
    /// Free-text service description when the category is `Other`.
    pub other_service: Option<String>,
    pub experience_years: u32,
    pub location: String,
    pub description: String,
}

/// A vendor signup request under admin review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub id: RequestId,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub service_category: ServiceCategory,
    pub other_service: Option<String>,
    pub experience_years: u32,
    pub location: String,
    pub description: String,
    pub submitted_at: DateTime<Utc>,
    pub status: RequestStatus,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
}

impl SignupRequest {
    pub fn new(draft: RequestDraft) -> Self {
        Self {
            id: RequestId::new(),
            full_name: draft.full_name,
            email: draft.email,
            phone: draft.phone,
            service_category: draft.service_category,
            other_service: draft.other_service,
            experience_years: draft.experience_years,
            location: draft.location,
            description: draft.description,
            submitted_at: Utc::now(),
            status: RequestStatus::Pending,
            approved_at: None,
            rejected_at: None,
        }
    }

    /// Category label with the `Other` free-text fallback.
    pub fn category_label(&self) -> &str {
        if self.service_category == ServiceCategory::Other {
            if let Some(other) = &self.other_service {
                if !other.trim().is_empty() {
                    return other;
                }
            }
        }
        self.service_category.label()
    }
}

/// Aggregate counts for the dashboard header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestStats {
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub total: usize,
}

/// Which requests to show in a dashboard listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestFilter {
    All,
    Pending,
    Approved,
    Rejected,
}

impl RequestFilter {
    pub fn matches(&self, status: RequestStatus) -> bool {
        match self {
            Self::All => true,
            Self::Pending => status == RequestStatus::Pending,
            Self::Approved => status == RequestStatus::Approved,
            Self::Rejected => status == RequestStatus::Rejected,
        }
    }

    /// Parse a filter from its dashboard code (`all`, `pending`, ...).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> RequestDraft {
        RequestDraft {
            full_name: "Asha Verma".into(),
            email: "asha@example.com".into(),
            phone: "9876543210".into(),
            service_category: ServiceCategory::Food,
            other_service: None,
            experience_years: 4,
            location: "Hamirpur".into(),
            description: "Catering for events".into(),
        }
    }

    #[test]
    fn new_request_starts_pending() {
        let request = SignupRequest::new(draft());
        assert_eq!(request.status, RequestStatus::Pending);
        assert!(request.approved_at.is_none());
        assert!(request.rejected_at.is_none());
    }

    #[test]
    fn category_labels() {
        assert_eq!(ServiceCategory::Food.label(), "Food Services");
        assert_eq!(ServiceCategory::Travel.label(), "Travel & Tourism");
        assert_eq!(ServiceCategory::Gst.label(), "GST Services");
        assert_eq!(ServiceCategory::It.label(), "IT Solutions");
    }

    #[test]
    fn other_category_uses_free_text() {
        let mut request = SignupRequest::new(draft());
        request.service_category = ServiceCategory::Other;
        request.other_service = Some("Tailoring".into());
        assert_eq!(request.category_label(), "Tailoring");
    }

    #[test]
    fn other_category_without_text_falls_back() {
        let mut request = SignupRequest::new(draft());
        request.service_category = ServiceCategory::Other;
        request.other_service = Some("   ".into());
        assert_eq!(request.category_label(), "Other");

        request.other_service = None;
        assert_eq!(request.category_label(), "Other");
    }

    #[test]
    fn category_code_roundtrip() {
        for category in [
            ServiceCategory::Construction,
            ServiceCategory::Food,
            ServiceCategory::Travel,
            ServiceCategory::Gst,
            ServiceCategory::Marketing,
            ServiceCategory::It,
            ServiceCategory::Other,
        ] {
            assert_eq!(ServiceCategory::from_code(category.code()), Some(category));
        }
        assert_eq!(ServiceCategory::from_code("plumbing"), None);
    }

    #[test]
    fn filter_matches() {
        assert!(RequestFilter::All.matches(RequestStatus::Rejected));
        assert!(RequestFilter::Pending.matches(RequestStatus::Pending));
        assert!(!RequestFilter::Approved.matches(RequestStatus::Pending));
        assert_eq!(RequestFilter::from_code("ALL"), Some(RequestFilter::All));
        assert_eq!(RequestFilter::from_code("done"), None);
    }

    #[test]
    fn request_id_parses_its_display_form() {
        let id = RequestId::new();
        let parsed: RequestId = id.to_string().parse().expect("parse id");
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<RequestId>().is_err());
    }
}
