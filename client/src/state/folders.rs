//! Sidebar folder state: the folder mirror and the folder being browsed.

#[cfg(test)]
#[path = "folders_test.rs"]
mod folders_test;

use fleet::error::FleetError;
use fleet::folders::{FolderError, FolderLedger, FolderOp};
use fleet::model::{Assignment, Folder, Tenant};

/// Folder mirror plus navigation for the tenant sidebar.
#[derive(Clone, Debug, Default)]
pub struct FolderState {
    pub ledger: FolderLedger,
    /// Folder being browsed; `None` is the root.
    pub current: Option<String>,
    pub loading: bool,
}

impl FolderState {
    /// Clear everything tied to the scope. Command ids keep counting.
    pub fn reset(&mut self) {
        self.ledger.reset();
        self.current = None;
        self.loading = false;
    }

    /// Replace the mirror. Navigation falls back to the root if the current
    /// folder is gone.
    pub fn load(&mut self, folders: Vec<Folder>, assignments: Vec<Assignment>) {
        self.ledger.load(folders, assignments);
        self.loading = false;
        self.fix_current();
    }

    pub fn open(&mut self, folder_id: Option<String>) {
        self.current = folder_id.filter(|id| self.ledger.tree().contains(id));
    }

    /// Go to the parent of the current folder.
    pub fn up(&mut self) {
        let parent = self
            .current
            .as_deref()
            .and_then(|id| self.ledger.tree().get(id))
            .and_then(|f| f.parent_id.clone());
        self.open(parent);
    }

    /// Root-to-current path.
    ///
    /// # Errors
    ///
    /// [`FolderError::Cycle`] when the parent chain loops.
    pub fn breadcrumb(&self) -> Result<Vec<Folder>, FolderError> {
        let Some(id) = self.current.as_deref() else {
            return Ok(Vec::new());
        };
        let path = self.ledger.tree().folder_path(id)?;
        Ok(path.into_iter().cloned().collect())
    }

    #[must_use]
    pub fn subfolders(&self) -> Vec<Folder> {
        self.ledger
            .tree()
            .child_folders(self.current.as_deref())
            .into_iter()
            .cloned()
            .collect()
    }

    /// Tenants filed in the current folder (unfiled ones at the root).
    #[must_use]
    pub fn visible_tenants(&self, all: &[Tenant]) -> Vec<Tenant> {
        self.ledger
            .tree()
            .tenants_in_folder(self.current.as_deref(), all)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Validate and record a folder command.
    ///
    /// # Errors
    ///
    /// The validation failure; nothing is sent.
    pub fn begin(&mut self, op: FolderOp) -> Result<(u64, FolderOp), FolderError> {
        self.ledger.begin(op)
    }

    /// Apply the backend outcome of a command started with [`FolderState::begin`].
    ///
    /// # Errors
    ///
    /// The backend or mirror error; the mirror is unchanged.
    pub fn settle(&mut self, cmd: u64, outcome: Result<Option<Folder>, FleetError>) -> Result<Option<Folder>, FleetError> {
        let result = self.ledger.settle(cmd, outcome);
        self.fix_current();
        result
    }

    #[must_use]
    pub fn busy(&self) -> bool {
        self.ledger.commands().has_pending()
    }

    #[must_use]
    pub fn last_failure(&self) -> Option<&str> {
        self.ledger.commands().last_failure()
    }

    fn fix_current(&mut self) {
        if self
            .current
            .as_deref()
            .is_some_and(|id| !self.ledger.tree().contains(id))
        {
            self.current = None;
        }
    }
}
