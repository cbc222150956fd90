use serde::Serialize;

/// How a recognition run ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    Accepted,
    Rejected,
    /// The configured step ceiling was reached before the grammar accepted or rejected.
    StepLimitExceeded,
}

/// Final state of a recognition run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseResult<S> {
    pub outcome: Outcome,
    /// Number of iterations of the decide loop, including the terminating one.
    pub steps: usize,
    pub subject: S,
}

impl<S> ParseResult<S> {
    pub(crate) fn new(outcome: Outcome, steps: usize, subject: S) -> Self {
        Self {
            outcome,
            steps,
            subject,
        }
    }

    pub fn success(&self) -> bool {
        self.outcome == Outcome::Accepted
    }

    pub fn into_subject(self) -> S {
        self.subject
    }
}
