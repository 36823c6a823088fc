//! Distinguishing credential failures from other remote failures.

use std::fmt::Debug;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::Error;

/// The outcome of classifying a failed remote operation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// The remote needs (different) credentials.
    Unauthorized,

    /// Any other failure.
    Other,
}

/// Decides, from the raw text Git printed, whether a remote failure was an
/// authentication failure.
pub trait AuthFailureClassifier: Debug + Send + Sync {
    /// Classify the message of a failed remote operation.
    fn classify(&self, message: &str) -> FailureKind;
}

lazy_static! {
    static ref AUTH_FAILURE_RE: Regex = Regex::new(
        r"(?m)fatal: could not read (?:Username|Password) for '[^']*'|fatal: Authentication failed for '[^']*'|Permission denied \(publickey[^)]*\)|fatal: Could not read from remote repository"
    )
    .expect("Compiling authentication failure regex");
}

/// Matches the messages the `git` command-line client prints when
/// credentials are missing or rejected. The wording is tied to Git's English
/// output.
#[derive(Clone, Copy, Debug, Default)]
pub struct RegexAuthFailureClassifier;

impl AuthFailureClassifier for RegexAuthFailureClassifier {
    fn classify(&self, message: &str) -> FailureKind {
        if AUTH_FAILURE_RE.is_match(message) {
            FailureKind::Unauthorized
        } else {
            FailureKind::Other
        }
    }
}

/// Re-raise a failed remote operation against `uri` as
/// [`Error::Unauthorized`] if the classifier recognizes it as an
/// authentication failure. Other errors are returned unchanged.
pub fn classify_remote_failure(
    classifier: &dyn AuthFailureClassifier,
    uri: &str,
    error: Error,
) -> Error {
    match error {
        Error::GitFailed { message, args, exit_code } => match classifier.classify(&message) {
            FailureKind::Unauthorized => {
                debug!(?uri, "Remote operation failed with an authentication error");
                Error::Unauthorized {
                    uri: uri.to_owned(),
                    message,
                }
            }
            FailureKind::Other => Error::GitFailed {
                args,
                exit_code,
                message,
            },
        },
        error => error,
    }
}

#[cfg(test)]
mod tests {
    use crate::util::ExitCode;

    use super::*;

    #[test]
    fn test_classify_auth_failures() {
        let classifier = RegexAuthFailureClassifier;
        for message in [
            "fatal: Authentication failed for 'https://x'.",
            "remote: Invalid username or password.\nfatal: Authentication failed for 'https://github.com/foo/bar.git/'",
            "fatal: could not read Username for 'https://github.com': terminal prompts disabled",
            "fatal: could not read Password for 'https://user@example.com': No such device or address",
            "git@github.com: Permission denied (publickey).\nfatal: Could not read from remote repository.\n\nPlease make sure you have the correct access rights\nand the repository exists.",
            "Host key verification failed.\nfatal: Could not read from remote repository.\n\nPlease make sure you have the correct access rights\nand the repository exists.",
            "Connection closed by 192.0.2.1 port 22\nfatal: Could not read from remote repository.",
            "fatal: 'origin' does not appear to be a git repository\nfatal: Could not read from remote repository.",
        ] {
            assert_eq!(
                classifier.classify(message),
                FailureKind::Unauthorized,
                "{message}"
            );
        }
    }

    #[test]
    fn test_classify_other_failures() {
        let classifier = RegexAuthFailureClassifier;
        for message in [
            "",
            "fatal: unable to access 'https://127.0.0.1:1/': Failed to connect to 127.0.0.1 port 1",
            "error: failed to push some refs to 'https://example.com/repo.git'",
            "fatal: Unable to create '/repo/.git/index.lock': File exists.",
        ] {
            assert_eq!(classifier.classify(message), FailureKind::Other, "{message}");
        }
    }

    #[test]
    fn test_classify_remote_failure_rewraps_only_matching_errors() {
        let classifier = RegexAuthFailureClassifier;
        let error = classify_remote_failure(
            &classifier,
            "https://x",
            Error::GitFailed {
                args: vec!["fetch".to_string(), "origin".to_string()],
                exit_code: ExitCode(128),
                message: "fatal: Authentication failed for 'https://x'.".to_string(),
            },
        );
        assert!(error.is_unauthorized());
        insta::assert_snapshot!(error, @"not authorized to access https://x: fatal: Authentication failed for 'https://x'.");

        let error = classify_remote_failure(
            &classifier,
            "origin",
            Error::GitFailed {
                args: vec!["fetch".to_string(), "origin".to_string()],
                exit_code: ExitCode(128),
                message: "fatal: couldn't find remote ref nope".to_string(),
            },
        );
        match &error {
            Error::GitFailed { args, message, .. } => {
                assert_eq!(args, &["fetch", "origin"]);
                assert_eq!(message, "fatal: couldn't find remote ref nope");
            }
            other => panic!("Expected GitFailed, got {other:?}"),
        }

        let error = classify_remote_failure(
            &classifier,
            "origin",
            Error::NoSuchRemote {
                name: "origin".to_string(),
            },
        );
        assert!(matches!(error, Error::NoSuchRemote { .. }));
    }
}
