//! Conflict resolution.
//!
//! Each [`ConflictGroup`] resolves to exactly one winning entry; the other
//! members are dropped from the merge. Two policies exist:
//!
//! - **Automatic**: the member that appeared first in overall input order
//!   wins. Re-running on the same inputs in the same order always produces
//!   the same result.
//! - **Interactive**: a [`ChoicePrompt`] implementation presents the
//!   members and returns the index of the chosen one. The prompt is a
//!   synchronous capability supplied by the caller (a CLI, a test script);
//!   this crate only defines the request/response contract, not the
//!   rendering.
//!
//! Groups do not interact, so resolution order across groups is free; in
//! automatic mode groups may be resolved in parallel without changing the
//! outcome.

use crate::check::ConflictGroup;
use thiserror::Error;

/// Errors that end a merge run without output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("interactive resolution requested but no interaction channel is available")]
    ChannelUnavailable,

    #[error("conflict resolution aborted")]
    Aborted,

    #[error("selection {given} is out of range for {candidates} candidates")]
    InvalidChoice { given: usize, candidates: usize },
}

/// Synchronous capability for choosing a conflict winner.
///
/// Implementations block until a selection is made. An implementation that
/// has no way to reach a user returns [`ResolveError::ChannelUnavailable`]
/// rather than guessing; a user declining to choose maps to
/// [`ResolveError::Aborted`].
pub trait ChoicePrompt {
    /// Present the group's members and return the index of the chosen one.
    fn choose(&mut self, group: &ConflictGroup) -> Result<usize, ResolveError>;
}

/// First-occurrence resolution. Group members are kept in overall input
/// order, so the winner is always the member at index 0.
pub(crate) fn resolve_automatic(group: &ConflictGroup) -> usize {
    debug_assert!(!group.entries.is_empty());
    0
}

/// Resolve one group through the prompt, validating the returned index.
pub(crate) fn resolve_interactive(
    group: &ConflictGroup,
    prompt: &mut dyn ChoicePrompt,
) -> Result<usize, ResolveError> {
    let choice = prompt.choose(group)?;
    if choice >= group.entries.len() {
        return Err(ResolveError::InvalidChoice {
            given: choice,
            candidates: group.entries.len(),
        });
    }
    Ok(choice)
}

/// Replays a fixed list of selections; used to drive interactive
/// resolution from tests.
#[cfg(test)]
pub(crate) struct ScriptedPrompt {
    choices: Vec<usize>,
    next: usize,
}

#[cfg(test)]
impl ScriptedPrompt {
    pub(crate) fn new(choices: &[usize]) -> Self {
        Self {
            choices: choices.to_vec(),
            next: 0,
        }
    }
}

#[cfg(test)]
impl ChoicePrompt for ScriptedPrompt {
    fn choose(&mut self, _group: &ConflictGroup) -> Result<usize, ResolveError> {
        let choice = self
            .choices
            .get(self.next)
            .copied()
            .ok_or(ResolveError::Aborted)?;
        self.next += 1;
        Ok(choice)
    }
}
