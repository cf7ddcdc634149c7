use thiserror::Error;

/// Shell metacharacters associated with command chaining and substitution.
///
/// The executor never invokes a shell, so nothing here can actually be
/// reinterpreted; this check is defense in depth. An argument that looks
/// like an injection attempt is refused outright rather than rewritten.
const FORBIDDEN_SEQUENCES: &[&str] = &[";", "&", "|", "`", "$(", "\n", "\r"];

#[derive(Debug, Error)]
pub enum SanitizeError {
    #[error("argument {argument:?} contains shell metacharacter {metacharacter:?}")]
    UnsafeArgument {
        argument: String,
        metacharacter: &'static str,
    },
}

/// Check a single subprocess argument for shell-metacharacter risk.
///
/// Rejection, not escaping: a dangerous argument aborts the whole call before
/// any process is spawned.
pub fn sanitize_shell_arg(arg: &str) -> Result<&str, SanitizeError> {
    for seq in FORBIDDEN_SEQUENCES {
        if arg.contains(seq) {
            return Err(SanitizeError::UnsafeArgument {
                argument: arg.to_string(),
                metacharacter: seq,
            });
        }
    }
    Ok(arg)
}
