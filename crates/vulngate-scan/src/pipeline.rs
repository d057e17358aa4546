use std::path::Path;

use vulngate_core::{Settings, Verdict, VulngateError};

use crate::input;
use crate::llm::InferenceClient;
use crate::prompt;
use crate::verdict::{self, ResultArtifact};

/// Result of a completed scan.
///
/// # Examples
///
/// ```
/// use vulngate_core::Verdict;
/// use vulngate_scan::pipeline::Outcome;
///
/// let outcome = Outcome::Classified {
///     verdict: Verdict::Fail,
///     model: "org/model".into(),
///     raw_output: "FAIL".into(),
/// };
/// assert_eq!(outcome.exit_code(), 1);
/// assert_eq!(Outcome::EmptyDiff.verdict(), Verdict::Pass);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The diff was blank; the model was not consulted.
    EmptyDiff,
    /// The model answered and its text was classified.
    Classified {
        /// Gate decision.
        verdict: Verdict,
        /// Model the prompt was posted to.
        model: String,
        /// Normalized model output, before classification.
        raw_output: String,
    },
}

impl Outcome {
    /// Gate decision for this outcome.
    pub fn verdict(&self) -> Verdict {
        match self {
            Outcome::EmptyDiff => Verdict::Pass,
            Outcome::Classified { verdict, .. } => *verdict,
        }
    }

    /// Process exit status for this outcome.
    pub fn exit_code(&self) -> i32 {
        self.verdict().exit_code()
    }
}

/// Scan the diff at `diff_path` and write the artifact to `result_path`.
///
/// A blank diff short-circuits to PASS without touching the network,
/// requiring a token, or calling `settings`. Otherwise settings are
/// resolved, the diff is truncated, wrapped in the scan prompt, sent to
/// the model, and the answer classified.
///
/// # Errors
///
/// Returns an error if the diff cannot be read, `settings` fails, the
/// token is missing, the inference call fails, or the artifact cannot be
/// written. No artifact is written when the inference stage fails.
pub async fn scan_diff_file<F>(
    diff_path: &Path,
    result_path: &Path,
    settings: F,
) -> Result<Outcome, VulngateError>
where
    F: FnOnce() -> Result<Settings, VulngateError>,
{
    let diff = input::read_diff(diff_path)?;

    if diff.is_empty() {
        tracing::info!(path = %diff_path.display(), "empty diff, skipping inference");
        ResultArtifact::empty_diff().write(result_path)?;
        return Ok(Outcome::EmptyDiff);
    }

    let settings = settings()?;
    tracing::debug!(?settings, "resolved settings");

    let client = InferenceClient::new(&settings.inference)?;
    let prompt = prompt::build_scan_prompt(&diff, settings.max_diff_chars);
    let raw_output = client.generate(&prompt).await?;

    let verdict = verdict::classify(&raw_output);
    tracing::info!(%verdict, model = client.model(), "classified model output");

    ResultArtifact::for_model(verdict, client.model()).write(result_path)?;

    Ok(Outcome::Classified {
        verdict,
        model: client.model().to_string(),
        raw_output,
    })
}
