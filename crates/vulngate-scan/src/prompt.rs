use std::borrow::Cow;

/// Appended to a diff that was cut at the character bound.
///
/// The finished prompt is not trimmed, so a truncated prompt ends with the
/// whole marker, trailing newline included.
pub const TRUNCATION_MARKER: &str = "\n...[TRUNCATED]...\n";

const SCAN_INSTRUCTIONS: &str = "\
Check this PR diff for OWASP Top 10 security vulnerabilities.

Answer ONLY one word:

PASS or FAIL

Diff:
";

/// Cut `diff` to its first `max_chars` characters and append
/// [`TRUNCATION_MARKER`] if it is longer than that.
///
/// Counts characters, not bytes, so multibyte text is never split.
///
/// # Examples
///
/// ```
/// use vulngate_scan::prompt::{truncate_diff, TRUNCATION_MARKER};
///
/// assert_eq!(truncate_diff("+short", 100), "+short");
/// assert_eq!(truncate_diff("+abcdef", 3), format!("+ab{TRUNCATION_MARKER}"));
/// ```
pub fn truncate_diff(diff: &str, max_chars: usize) -> Cow<'_, str> {
    match diff.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            tracing::debug!(
                max_chars,
                dropped_bytes = diff.len() - cut,
                "diff exceeds bound, truncating"
            );
            Cow::Owned(format!("{}{TRUNCATION_MARKER}", &diff[..cut]))
        }
        None => Cow::Borrowed(diff),
    }
}

/// Build the classification prompt sent to the model.
///
/// The instruction text is fixed; only the (possibly truncated) diff
/// varies, and it always ends the prompt.
///
/// # Examples
///
/// ```
/// use vulngate_scan::prompt::build_scan_prompt;
///
/// let prompt = build_scan_prompt("+eval(input)", 12_000);
/// assert!(prompt.contains("OWASP Top 10"));
/// assert!(prompt.ends_with("+eval(input)"));
/// ```
pub fn build_scan_prompt(diff: &str, max_chars: usize) -> String {
    let body = truncate_diff(diff, max_chars);
    let mut prompt = String::with_capacity(SCAN_INSTRUCTIONS.len() + body.len());
    prompt.push_str(SCAN_INSTRUCTIONS);
    prompt.push_str(&body);
    prompt
}
