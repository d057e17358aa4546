use std::path::Path;

use vulngate_core::{Verdict, VulngateError};

/// File name of the result artifact, relative to the working directory.
pub const RESULT_FILE: &str = "result.txt";

/// Classify a model answer.
///
/// FAIL only when the text contains `FAIL` and does not contain `PASS`,
/// compared case-insensitively. Anything else, including empty or garbled
/// output, is PASS.
///
/// # Examples
///
/// ```
/// use vulngate_core::Verdict;
/// use vulngate_scan::verdict::classify;
///
/// assert_eq!(classify("fail"), Verdict::Fail);
/// assert_eq!(classify("FAIL? no, PASS"), Verdict::Pass);
/// assert_eq!(classify(""), Verdict::Pass);
/// ```
pub fn classify(text: &str) -> Verdict {
    let upper = text.to_uppercase();
    if upper.contains("FAIL") && !upper.contains("PASS") {
        Verdict::Fail
    } else {
        Verdict::Pass
    }
}

/// Two-line record read by the CI runner: the verdict, then a detail line.
///
/// # Examples
///
/// ```
/// use vulngate_core::Verdict;
/// use vulngate_scan::verdict::ResultArtifact;
///
/// let artifact = ResultArtifact::for_model(Verdict::Fail, "org/model");
/// assert_eq!(artifact.render(), "FAIL\nMODEL: org/model\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultArtifact {
    /// Gate decision.
    pub verdict: Verdict,
    /// Second line: the model used, or why no model was consulted.
    pub detail: String,
}

impl ResultArtifact {
    /// Artifact for a run that consulted `model`.
    pub fn for_model(verdict: Verdict, model: &str) -> Self {
        Self {
            verdict,
            detail: format!("MODEL: {model}"),
        }
    }

    /// Artifact for the empty-diff fast path.
    pub fn empty_diff() -> Self {
        Self {
            verdict: Verdict::Pass,
            detail: "Empty diff.".into(),
        }
    }

    /// File contents, newline-terminated.
    pub fn render(&self) -> String {
        format!("{}\n{}\n", self.verdict, self.detail)
    }

    /// Overwrite `path` with this artifact.
    ///
    /// # Errors
    ///
    /// Returns [`VulngateError::Io`] if the file cannot be written.
    pub fn write(&self, path: &Path) -> Result<(), VulngateError> {
        std::fs::write(path, self.render())?;
        tracing::debug!(path = %path.display(), verdict = %self.verdict, "wrote result artifact");
        Ok(())
    }
}
