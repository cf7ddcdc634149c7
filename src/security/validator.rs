use thiserror::Error;

/// Maximum length of a normalized branch name. Longer otherwise-valid names
/// are truncated, not rejected.
pub const MAX_BRANCH_NAME_LEN: usize = 100;

/// Maximum length of a normalized workspace name.
pub const MAX_WORKSPACE_NAME_LEN: usize = 50;

/// Maximum length of a project key. Unlike branch and workspace names, keys
/// over this length are rejected outright.
pub const MAX_PROJECT_KEY_LEN: usize = 20;

/// Upper bound for GitHub issue/PR identifiers. Six digits covers any
/// realistic issue number; anything above it is treated as malformed input.
pub const MAX_GITHUB_ID: u64 = 999_999;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    RequiredField { field: &'static str },

    #[error("invalid {field}: {value:?} (allowed: alphanumerics, '-', '_', max {max} chars)")]
    InvalidCharacters {
        field: &'static str,
        value: String,
        max: usize,
    },

    #[error("invalid {field} {value:?}: {reason}")]
    InvalidPattern {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("{field} {original:?} contains no valid characters")]
    NoValidCharacters {
        field: &'static str,
        original: String,
    },

    #[error("invalid GitHub id {raw:?}: expected a positive integer between 1 and 999999")]
    InvalidId { raw: String },
}

/// Validate and normalize a branch name.
///
/// Characters outside the safe set (alphanumerics, `-`, `_`, `/`, `.`) are
/// stripped, not escaped. A name that strips down to nothing is rejected.
/// After stripping, names that start with `-` (would read as a CLI flag) or
/// contain `..` (path traversal) are rejected.
/// Over-length names are truncated to [`MAX_BRANCH_NAME_LEN`].
///
/// Idempotent: re-validating the returned string yields it unchanged.
pub fn validate_branch_name(input: &str) -> Result<String, ValidationError> {
    if input.trim().is_empty() {
        return Err(ValidationError::RequiredField {
            field: "branch name",
        });
    }

    let stripped: String = input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '/' | '.'))
        .collect();

    if stripped.is_empty() {
        return Err(ValidationError::NoValidCharacters {
            field: "branch name",
            original: input.to_string(),
        });
    }

    if stripped.starts_with('-') {
        return Err(ValidationError::InvalidPattern {
            field: "branch name",
            value: stripped,
            reason: "must not start with '-'",
        });
    }

    if stripped.contains("..") {
        return Err(ValidationError::InvalidPattern {
            field: "branch name",
            value: stripped,
            reason: "must not contain '..'",
        });
    }

    Ok(stripped.chars().take(MAX_BRANCH_NAME_LEN).collect())
}

/// Validate and normalize a workspace name.
///
/// Keeps only alphanumerics, `-`, and `_`. A non-empty input that strips down
/// to nothing is an error (the caller gave us garbage, not a name).
pub fn validate_workspace_name(input: &str) -> Result<String, ValidationError> {
    if input.trim().is_empty() {
        return Err(ValidationError::RequiredField {
            field: "workspace name",
        });
    }

    let stripped: String = input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .collect();

    if stripped.is_empty() {
        return Err(ValidationError::NoValidCharacters {
            field: "workspace name",
            original: input.to_string(),
        });
    }

    Ok(stripped.chars().take(MAX_WORKSPACE_NAME_LEN).collect())
}

/// Validate a project key.
///
/// Strict: any character outside alphanumerics/`-`/`_`, or a length over
/// [`MAX_PROJECT_KEY_LEN`], is a hard error. No stripping or truncation:
/// project keys index the configuration file and must match it exactly. On
/// success the input is returned unchanged.
pub fn validate_project_key(input: &str) -> Result<String, ValidationError> {
    if input.is_empty() {
        return Err(ValidationError::RequiredField {
            field: "project key",
        });
    }

    let conformant = input.len() <= MAX_PROJECT_KEY_LEN
        && input
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'));

    if !conformant {
        return Err(ValidationError::InvalidCharacters {
            field: "project key",
            value: input.to_string(),
            max: MAX_PROJECT_KEY_LEN,
        });
    }

    Ok(input.to_string())
}

/// Parse a list of GitHub issue/PR identifiers.
///
/// Each element must parse as a positive integer no greater than
/// [`MAX_GITHUB_ID`]. Order and duplicates are preserved.
pub fn validate_github_ids<S: AsRef<str>>(inputs: &[S]) -> Result<Vec<u64>, ValidationError> {
    inputs
        .iter()
        .map(|raw| {
            let raw = raw.as_ref();
            match raw.trim().parse::<u64>() {
                Ok(id) if id > 0 && id <= MAX_GITHUB_ID => Ok(id),
                _ => Err(ValidationError::InvalidId {
                    raw: raw.to_string(),
                }),
            }
        })
        .collect()
}
