//! Shared HTTP helpers for the REST and GraphQL clients.

use crate::error::GitHubError;

/// Check an HTTP response status, labelling failures with `operation`.
pub async fn check_response(
    resp: reqwest::Response,
    operation: &'static str,
) -> Result<reqwest::Response, GitHubError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    Err(GitHubError::Api {
        operation,
        status: resp.status().as_u16(),
        message: resp.text().await.unwrap_or_default(),
    })
}

/// Whether a 422 body from the sub-issue endpoint means the link already
/// exists or the child already has a parent.
pub fn is_existing_parent_link(body: &str) -> bool {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return false;
    };
    let message = value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default();
    message.contains("duplicate sub-issues") || message.contains("only have one parent")
}

/// Percent-encode each segment of a repository content path.
pub fn escape_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_duplicate_link_messages() {
        let body = r#"{"message": "An error occurred while adding the sub-issue to the parent issue. Issue may not contain duplicate sub-issues and Sub issue may only have one parent"}"#;
        assert!(is_existing_parent_link(body));
        assert!(is_existing_parent_link(
            r#"{"message": "Sub issue may only have one parent"}"#
        ));
    }

    #[test]
    fn other_validation_failures_are_not_duplicates() {
        assert!(!is_existing_parent_link(r#"{"message": "Validation Failed"}"#));
        assert!(!is_existing_parent_link("<html>bad gateway</html>"));
        assert!(!is_existing_parent_link(""));
    }

    #[test]
    fn escapes_each_segment() {
        assert_eq!(
            escape_path("tp_attachments/UserStory/1/my file#1.png"),
            "tp_attachments/UserStory/1/my%20file%231.png"
        );
    }

    #[tokio::test]
    async fn check_response_labels_operation() {
        let resp = reqwest::Response::from(
            ::http::Response::builder()
                .status(403)
                .body("forbidden")
                .unwrap(),
        );
        let err = check_response(resp, "create issue").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "GitHub create issue failed (status=403): forbidden"
        );
    }
}
