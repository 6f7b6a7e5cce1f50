//! Explicit command objects for backend-confirmed mutations.
//!
//! DESIGN
//! ======
//! A mutation starts `Pending`, and settles exactly once as `Confirmed` or
//! `Failed`. Local mirrors are only touched on confirmation, so a failure
//! needs no rollback; the log keeps the outcome around for the UI.

#[cfg(test)]
#[path = "command_test.rs"]
mod command_test;

use std::collections::VecDeque;

/// Maximum number of settled commands retained in a [`CommandLog`].
pub const COMMAND_LOG_CAP: usize = 64;

/// Lifecycle of a command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandState {
    Pending,
    Confirmed,
    Failed(String),
}

/// Error returned when settling a command twice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("command {0} is already settled")]
    AlreadySettled(u64),
    #[error("unknown command {0}")]
    Unknown(u64),
}

/// A mutation request and its lifecycle state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command<Op> {
    pub id: u64,
    pub op: Op,
    pub state: CommandState,
}

impl<Op> Command<Op> {
    #[must_use]
    pub fn new(id: u64, op: Op) -> Self {
        Self {
            id,
            op,
            state: CommandState::Pending,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state == CommandState::Pending
    }

    /// Mark the command confirmed by the backend.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::AlreadySettled`] unless the command is pending.
    pub fn confirm(&mut self) -> Result<(), CommandError> {
        self.settle(CommandState::Confirmed)
    }

    /// Mark the command failed with a user-facing message.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::AlreadySettled`] unless the command is pending.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), CommandError> {
        self.settle(CommandState::Failed(message.into()))
    }

    fn settle(&mut self, next: CommandState) -> Result<(), CommandError> {
        if !self.is_pending() {
            return Err(CommandError::AlreadySettled(self.id));
        }
        self.state = next;
        Ok(())
    }
}

/// Ordered history of commands with bounded retention.
#[derive(Clone, Debug)]
pub struct CommandLog<Op> {
    next_id: u64,
    entries: VecDeque<Command<Op>>,
}

impl<Op> Default for CommandLog<Op> {
    fn default() -> Self {
        Self {
            next_id: 1,
            entries: VecDeque::new(),
        }
    }
}

impl<Op> CommandLog<Op> {
    /// Record a new pending command and return its id.
    pub fn begin(&mut self, op: Op) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push_back(Command::new(id, op));
        self.evict();
        id
    }

    /// Drop every entry. Ids keep counting, so an id issued before the
    /// clear never names a later command.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Confirm a pending command.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] if the id is unknown or already settled.
    pub fn confirm(&mut self, id: u64) -> Result<(), CommandError> {
        self.get_mut(id)?.confirm()
    }

    /// Fail a pending command.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] if the id is unknown or already settled.
    pub fn fail(&mut self, id: u64, message: impl Into<String>) -> Result<(), CommandError> {
        self.get_mut(id)?.fail(message)
    }

    #[must_use]
    pub fn get(&self, id: u64) -> Option<&Command<Op>> {
        self.entries.iter().find(|c| c.id == id)
    }

    /// Commands still waiting for the backend.
    pub fn pending(&self) -> impl Iterator<Item = &Command<Op>> {
        self.entries.iter().filter(|c| c.is_pending())
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending().next().is_some()
    }

    /// Message of the most recent failed command, if any.
    #[must_use]
    pub fn last_failure(&self) -> Option<&str> {
        self.entries.iter().rev().find_map(|c| match &c.state {
            CommandState::Failed(message) => Some(message.as_str()),
            _ => None,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn get_mut(&mut self, id: u64) -> Result<&mut Command<Op>, CommandError> {
        self.entries
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(CommandError::Unknown(id))
    }

    /// Drop the oldest settled commands beyond the cap. Pending ones stay.
    fn evict(&mut self) {
        while self.entries.len() > COMMAND_LOG_CAP {
            let Some(pos) = self.entries.iter().position(|c| !c.is_pending()) else {
                return;
            };
            self.entries.remove(pos);
        }
    }
}
