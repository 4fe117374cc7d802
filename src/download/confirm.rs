//! Interactive confirmation gate for large downloads.

use std::io::{self, BufRead, Write};

use crate::config::CONFIRMATION_THRESHOLD;

/// Asks the operator whether a download of `total` rows should proceed.
///
/// A trait so the gate can be scripted in tests and so non-interactive
/// callers can supply their own policy.
pub trait ConfirmPrompt: Send {
    /// Returns `true` to proceed with the download.
    fn confirm(&mut self, total: u64) -> io::Result<bool>;
}

/// Prompts on stderr and reads the answer from stdin.
pub struct StdinPrompt;

impl ConfirmPrompt for StdinPrompt {
    fn confirm(&mut self, total: u64) -> io::Result<bool> {
        eprint!("{total} rows match; download all of them? [y/N] ");
        io::stderr().flush()?;
        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        let answer = answer.trim();
        Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
    }
}

/// Outcome of the confirmation gate.
#[derive(Debug, PartialEq, Eq)]
pub enum GateDecision {
    /// Fetching may begin.
    Proceed,
    /// The operator declined; this is a graceful cancellation, not an error.
    Declined,
}

/// Applies the large-download gate: totals above the threshold require an
/// affirmative answer before any page is fetched. An unknown total passes
/// (the caller suppressed the pre-count explicitly).
pub fn confirm_large_download(
    total: Option<u64>,
    prompt: &mut dyn ConfirmPrompt,
) -> io::Result<GateDecision> {
    let Some(total) = total else {
        return Ok(GateDecision::Proceed);
    };
    if total <= CONFIRMATION_THRESHOLD {
        return Ok(GateDecision::Proceed);
    }
    if prompt.confirm(total)? {
        Ok(GateDecision::Proceed)
    } else {
        Ok(GateDecision::Declined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ScriptedPrompt {
        answer: bool,
        calls: Vec<u64>,
    }

    impl ScriptedPrompt {
        fn new(answer: bool) -> Self {
            Self {
                answer,
                calls: Vec::new(),
            }
        }
    }

    impl ConfirmPrompt for ScriptedPrompt {
        fn confirm(&mut self, total: u64) -> io::Result<bool> {
            self.calls.push(total);
            Ok(self.answer)
        }
    }

    #[test]
    fn test_totals_at_threshold_skip_the_prompt() {
        let mut prompt = ScriptedPrompt::new(false);
        let decision =
            confirm_large_download(Some(CONFIRMATION_THRESHOLD), &mut prompt).unwrap();
        assert_eq!(decision, GateDecision::Proceed);
        assert!(prompt.calls.is_empty());
    }

    #[test]
    fn test_totals_above_threshold_ask() {
        let mut prompt = ScriptedPrompt::new(true);
        let decision = confirm_large_download(Some(60_000), &mut prompt).unwrap();
        assert_eq!(decision, GateDecision::Proceed);
        assert_eq!(prompt.calls, vec![60_000]);
    }

    #[test]
    fn test_negative_answer_declines() {
        let mut prompt = ScriptedPrompt::new(false);
        let decision = confirm_large_download(Some(60_000), &mut prompt).unwrap();
        assert_eq!(decision, GateDecision::Declined);
    }

    #[test]
    fn test_unknown_total_passes_without_asking() {
        let mut prompt = ScriptedPrompt::new(false);
        let decision = confirm_large_download(None, &mut prompt).unwrap();
        assert_eq!(decision, GateDecision::Proceed);
        assert!(prompt.calls.is_empty());
    }
}
