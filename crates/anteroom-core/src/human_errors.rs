// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the admin console.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The taxonomy uses three severity levels that drive how the console
// presents the failure.

use crate::error::AnteroomError;

/// Severity of an error from the admin's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Storage blip, unlucky timing — safe to just try again.
    Transient,
    /// The admin must change something (fix a field, refresh the list).
    ActionRequired,
    /// Cannot be fixed by retrying — damaged data, wrong key, etc.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the admin should try (shown as body text).
    pub suggestion: String,
    /// Whether simply repeating the command is worthwhile.
    pub retriable: bool,
    /// Severity level.
    pub severity: Severity,
}

/// Convert an `AnteroomError` into a `HumanError` suitable for the console.
pub fn humanize_error(err: &AnteroomError) -> HumanError {
    match err {
        // -- Authentication --
        AnteroomError::TokenGeneration(_) => HumanError {
            message: "Could not create a login session.".into(),
            suggestion: "Try logging in again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Crypto --
        AnteroomError::Encryption(_) => HumanError {
            message: "The data could not be saved securely.".into(),
            suggestion: "Nothing was changed. Try the command again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        AnteroomError::Decryption(_) | AnteroomError::MalformedBlob(_) => HumanError {
            message: "Stored data could not be read.".into(),
            suggestion: "It may be damaged or saved with a different key. \
                         Removing the affected entry lets you start fresh."
                .into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        // -- Registry --
        AnteroomError::RequestNotFound(id) => HumanError {
            message: "That request could not be found.".into(),
            suggestion: format!("It may already have been deleted. Refresh the list and check the id ({id})."),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        AnteroomError::InvalidField { field, reason } => HumanError {
            message: "Some of the submitted details are invalid.".into(),
            suggestion: format!("Check the {field} field: {reason}."),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        // -- Storage --
        AnteroomError::Database(_) => HumanError {
            message: "The app's data storage had a problem.".into(),
            suggestion: "Try closing and reopening the app. Your saved requests should still be there.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        AnteroomError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "A data file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Restarting the app will recreate it.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "The app doesn't have permission to use its data directory.".into(),
                    suggestion: "Check the permissions on the data directory, or run the app as a user that owns it.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, the device's storage may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        AnteroomError::Serialization(_) => HumanError {
            message: "The app had an internal data problem.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decryption_failure_is_permanent() {
        let err = AnteroomError::Decryption("authentication failed".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Permanent);
        assert!(!human.retriable);
    }

    #[test]
    fn database_error_is_transient() {
        let err = AnteroomError::Database("locked".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.retriable);
    }

    #[test]
    fn missing_request_is_action_required() {
        let err = AnteroomError::RequestNotFound("abc".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(!human.retriable);
        assert!(human.suggestion.contains("abc"));
    }

    #[test]
    fn invalid_field_names_the_field() {
        let err = AnteroomError::InvalidField {
            field: "email",
            reason: "not a valid email address".into(),
        };
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.suggestion.contains("email"));
    }

    #[test]
    fn permission_denied_is_action_required() {
        let err = AnteroomError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
    }
}
