//! All-or-nothing application of compiled triggers to a scenario.

use chk_data::{DocumentError, Scenario, Scope, Trigger};
use log::{info, warn};
use thiserror::Error;

use crate::strings::{PendingString, StringField};

/// Failure after the text compiled cleanly but the scenario could not take the result.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Range(#[from] DocumentError),
    #[error("no free {scope} string slot for \"{content}\"")]
    StringCapacity { scope: Scope, content: String },
}

/// Applies one compile's output to a scenario. The scenario is either fully updated or left as
/// it was.
pub struct MapCommitter<'a> {
    scenario: &'a mut Scenario,
}

impl<'a> MapCommitter<'a> {
    pub fn new(scenario: &'a mut Scenario) -> Self {
        Self { scenario }
    }

    /// Replace triggers `begin..end` with `triggers`, drop strings nothing refers to any more,
    /// then store every pending string and patch its id into the actions waiting for it.
    /// Returns the number of triggers written.
    ///
    /// # Errors
    /// On failure the trigger range and both string sections are restored before returning.
    pub fn commit(
        &mut self,
        begin: usize,
        end: usize,
        triggers: Vec<Trigger>,
        pending: Vec<PendingString>,
    ) -> Result<usize, BuildError> {
        let count = triggers.len();
        let snapshot = self.scenario.strings.backup();
        let previous = self.scenario.replace_range(begin, end, triggers)?;

        match self.assign_strings(begin, &pending) {
            Ok(removed) => {
                info!(
                    "committed {count} trigger(s) over {begin}..{end}: {} new string(s), {removed} unused string(s) removed",
                    pending.len()
                );
                Ok(count)
            },
            Err(err) => {
                warn!("rolling back trigger range {begin}..{end}: {err}");
                let restored = self.scenario.replace_range(begin, begin + count, previous);
                debug_assert!(restored.is_ok(), "rollback of {begin}..{} failed", begin + count);
                self.scenario.strings.restore(snapshot);
                Err(err)
            },
        }
    }

    fn assign_strings(&mut self, begin: usize, pending: &[PendingString]) -> Result<usize, BuildError> {
        let removed = self.scenario.delete_unused_strings();
        for string in pending {
            let id = self
                .scenario
                .strings
                .add(&string.content, string.scope)
                .ok_or_else(|| BuildError::StringCapacity {
                    scope: string.scope,
                    content: String::from_utf8_lossy(&string.content).into_owned(),
                })?;
            for slot in &string.assignees {
                let action = self
                    .scenario
                    .triggers
                    .get_mut(begin + slot.trigger)
                    .and_then(|trigger| trigger.actions.get_mut(slot.action));
                if let Some(action) = action {
                    match slot.field {
                        StringField::Text => action.string_id = id,
                        StringField::Sound => action.sound_string_id = id,
                    }
                }
            }
        }
        Ok(removed)
    }
}
