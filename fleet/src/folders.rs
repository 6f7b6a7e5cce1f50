//! Folder organizer: a local mirror of the sidebar folder tree.
//!
//! SYSTEM CONTEXT
//! ==============
//! Folders group tenants in the console sidebar. The backend stores folders
//! and tenant assignments; this module keeps a local cache of both and answers
//! the synchronous tree queries rendering needs (children, breadcrumb path,
//! tenants per folder).
//!
//! DESIGN
//! ======
//! Mutations are split in two halves. `validate_*` checks an operation against
//! the mirror without touching it; the matching apply method (`insert`,
//! `rename`, `remove`, `reparent`, `assign`) runs only after the backend has
//! confirmed. [`FolderLedger`] pairs the mirror with a [`CommandLog`] and
//! [`FolderOrganizer`] drives a ledger against a [`FolderBackend`].
//!
//! Parent links are data from a remote store, so traversal never trusts them:
//! path walks detect cycles and fail with [`FolderError::Cycle`].

#[cfg(test)]
#[path = "folders_test.rs"]
mod folders_test;

use std::collections::{HashMap, HashSet, VecDeque};

use crate::command::CommandLog;
use crate::error::{FleetError, ValidationError};
use crate::model::{Assignment, Folder, Tenant};

/// Folder tree integrity or lookup failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FolderError {
    #[error("unknown folder {0}")]
    UnknownFolder(String),
    #[error("folder {0} already exists")]
    DuplicateFolder(String),
    #[error("folder {0} has a cyclic parent chain")]
    Cycle(String),
    #[error("folder {id} cannot be moved under {parent}")]
    InvalidParent { id: String, parent: String },
    #[error("unknown folder command {0}")]
    UnknownCommand(u64),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Folder mutation recorded in the command log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FolderOp {
    Create { name: String, parent_id: Option<String> },
    Rename { id: String, name: String },
    Delete { id: String },
    Move { id: String, parent_id: Option<String> },
    Assign { tenant_id: String, folder_id: Option<String> },
}

/// Local mirror of folders and tenant assignments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FolderTree {
    folders: Vec<Folder>,
    assignments: HashMap<String, String>,
}

impl FolderTree {
    /// Build a mirror from backend lists. Assignments with no folder are skipped.
    #[must_use]
    pub fn from_parts(folders: Vec<Folder>, assignments: Vec<Assignment>) -> Self {
        let assignments = assignments
            .into_iter()
            .filter_map(|a| a.folder_id.map(|folder_id| (a.tenant_id, folder_id)))
            .collect();
        Self { folders, assignments }
    }

    #[must_use]
    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Direct children of `parent_id`; `None` selects root-level folders.
    ///
    /// Folders whose parent is not in the mirror are listed at the root so
    /// they stay reachable.
    #[must_use]
    pub fn child_folders(&self, parent_id: Option<&str>) -> Vec<&Folder> {
        self.folders
            .iter()
            .filter(|f| match (parent_id, f.parent_id.as_deref()) {
                (None, None) => true,
                (None, Some(parent)) => !self.contains(parent),
                (Some(wanted), Some(parent)) => wanted == parent,
                (Some(_), None) => false,
            })
            .collect()
    }

    /// Breadcrumb from the root down to `id`, inclusive.
    ///
    /// # Errors
    ///
    /// [`FolderError::UnknownFolder`] if `id` is not mirrored,
    /// [`FolderError::Cycle`] if the parent chain revisits a folder.
    pub fn folder_path(&self, id: &str) -> Result<Vec<&Folder>, FolderError> {
        let mut current = self.get(id).ok_or_else(|| FolderError::UnknownFolder(id.to_owned()))?;
        let mut visited = HashSet::new();
        let mut path = Vec::new();
        loop {
            if !visited.insert(current.id.as_str()) {
                return Err(FolderError::Cycle(current.id.clone()));
            }
            path.push(current);
            match current.parent_id.as_deref().and_then(|parent| self.get(parent)) {
                Some(parent) => current = parent,
                None => break,
            }
        }
        path.reverse();
        Ok(path)
    }

    /// Every folder below `id`, breadth first.
    #[must_use]
    pub fn descendants(&self, id: &str) -> Vec<&Folder> {
        let mut out = Vec::new();
        let mut visited: HashSet<&str> = HashSet::from([id]);
        let mut queue = VecDeque::from([id]);
        while let Some(parent) = queue.pop_front() {
            for child in self.folders.iter().filter(|f| f.parent_id.as_deref() == Some(parent)) {
                if visited.insert(child.id.as_str()) {
                    out.push(child);
                    queue.push_back(child.id.as_str());
                }
            }
        }
        out
    }

    /// Folder a tenant is filed under, if any.
    #[must_use]
    pub fn folder_of(&self, tenant_id: &str) -> Option<&str> {
        self.assignments.get(tenant_id).map(String::as_str)
    }

    /// Tenants shown in a folder view.
    ///
    /// The root view lists unfiled tenants and tenants assigned to a folder
    /// missing from the mirror.
    #[must_use]
    pub fn tenants_in_folder<'a>(&self, folder_id: Option<&str>, all: &'a [Tenant]) -> Vec<&'a Tenant> {
        all.iter()
            .filter(|t| self.visible_folder_of(&t.id) == folder_id)
            .collect()
    }

    fn visible_folder_of(&self, tenant_id: &str) -> Option<&str> {
        self.folder_of(tenant_id).filter(|id| self.contains(id))
    }

    /// Validate a create request and return the trimmed name.
    ///
    /// # Errors
    ///
    /// Empty name, or a parent that is not mirrored.
    pub fn validate_create(&self, name: &str, parent_id: Option<&str>) -> Result<String, FolderError> {
        let name = normalized_name(name)?;
        if let Some(parent) = parent_id {
            self.require(parent)?;
        }
        Ok(name)
    }

    /// Validate a rename request and return the trimmed name.
    ///
    /// # Errors
    ///
    /// Unknown folder or empty name.
    pub fn validate_rename(&self, id: &str, name: &str) -> Result<String, FolderError> {
        self.require(id)?;
        normalized_name(name)
    }

    /// # Errors
    ///
    /// Unknown folder.
    pub fn validate_delete(&self, id: &str) -> Result<(), FolderError> {
        self.require(id).map(|_| ())
    }

    /// Reject moves that would put a folder under itself or a descendant.
    ///
    /// # Errors
    ///
    /// Unknown folder or parent, or [`FolderError::InvalidParent`].
    pub fn validate_move(&self, id: &str, parent_id: Option<&str>) -> Result<(), FolderError> {
        self.require(id)?;
        let Some(parent) = parent_id else {
            return Ok(());
        };
        self.require(parent)?;
        let invalid = parent == id || self.descendants(id).iter().any(|f| f.id == parent);
        if invalid {
            return Err(FolderError::InvalidParent {
                id: id.to_owned(),
                parent: parent.to_owned(),
            });
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Blank tenant id or unknown folder.
    pub fn validate_assign(&self, tenant_id: &str, folder_id: Option<&str>) -> Result<(), FolderError> {
        if tenant_id.trim().is_empty() {
            return Err(ValidationError::MissingFields.into());
        }
        if let Some(folder) = folder_id {
            self.require(folder)?;
        }
        Ok(())
    }

    /// Add a backend-confirmed folder.
    ///
    /// # Errors
    ///
    /// [`FolderError::DuplicateFolder`] if the id is already mirrored.
    pub fn insert(&mut self, folder: Folder) -> Result<(), FolderError> {
        if self.contains(&folder.id) {
            return Err(FolderError::DuplicateFolder(folder.id));
        }
        self.folders.push(folder);
        Ok(())
    }

    /// # Errors
    ///
    /// Unknown folder.
    pub fn rename(&mut self, id: &str, name: &str) -> Result<(), FolderError> {
        let folder = self
            .folders
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| FolderError::UnknownFolder(id.to_owned()))?;
        name.trim().clone_into(&mut folder.name);
        Ok(())
    }

    /// Remove a folder. Its children move up to its parent and tenants filed
    /// in it become unfiled.
    ///
    /// # Errors
    ///
    /// Unknown folder.
    pub fn remove(&mut self, id: &str) -> Result<Folder, FolderError> {
        let pos = self
            .folders
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| FolderError::UnknownFolder(id.to_owned()))?;
        let removed = self.folders.remove(pos);
        for child in self.folders.iter_mut().filter(|f| f.parent_id.as_deref() == Some(id)) {
            child.parent_id.clone_from(&removed.parent_id);
        }
        self.assignments.retain(|_, folder| folder != id);
        Ok(removed)
    }

    /// # Errors
    ///
    /// Same as [`FolderTree::validate_move`].
    pub fn reparent(&mut self, id: &str, parent_id: Option<&str>) -> Result<(), FolderError> {
        self.validate_move(id, parent_id)?;
        if let Some(folder) = self.folders.iter_mut().find(|f| f.id == id) {
            folder.parent_id = parent_id.map(str::to_owned);
        }
        Ok(())
    }

    /// File a tenant under `folder_id`; `None` unfiles it.
    pub fn assign(&mut self, tenant_id: &str, folder_id: Option<&str>) {
        match folder_id {
            Some(folder) => {
                self.assignments.insert(tenant_id.to_owned(), folder.to_owned());
            }
            None => {
                self.assignments.remove(tenant_id);
            }
        }
    }

    fn require(&self, id: &str) -> Result<&Folder, FolderError> {
        self.get(id).ok_or_else(|| FolderError::UnknownFolder(id.to_owned()))
    }
}

fn normalized_name(name: &str) -> Result<String, FolderError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName.into());
    }
    Ok(trimmed.to_owned())
}

/// Backend store for folders and assignments.
#[allow(async_fn_in_trait)]
pub trait FolderBackend {
    async fn create_folder(&self, name: &str, parent_id: Option<&str>) -> Result<Folder, FleetError>;
    async fn rename_folder(&self, id: &str, name: &str) -> Result<(), FleetError>;
    async fn delete_folder(&self, id: &str) -> Result<(), FleetError>;
    async fn move_folder(&self, id: &str, parent_id: Option<&str>) -> Result<(), FleetError>;
    async fn assign_tenant(&self, tenant_id: &str, folder_id: Option<&str>) -> Result<(), FleetError>;
}

/// Send one validated operation to the backend.
///
/// Only `Create` yields a folder.
///
/// # Errors
///
/// Whatever the backend reports.
pub async fn dispatch<B: FolderBackend>(backend: &B, op: &FolderOp) -> Result<Option<Folder>, FleetError> {
    match op {
        FolderOp::Create { name, parent_id } => backend
            .create_folder(name, parent_id.as_deref())
            .await
            .map(Some),
        FolderOp::Rename { id, name } => backend.rename_folder(id, name).await.map(|()| None),
        FolderOp::Delete { id } => backend.delete_folder(id).await.map(|()| None),
        FolderOp::Move { id, parent_id } => backend
            .move_folder(id, parent_id.as_deref())
            .await
            .map(|()| None),
        FolderOp::Assign { tenant_id, folder_id } => backend
            .assign_tenant(tenant_id, folder_id.as_deref())
            .await
            .map(|()| None),
    }
}

/// Folder mirror plus the commands issued against it.
///
/// `begin` validates and records a pending command; `settle` applies the
/// backend outcome. The two halves can be split across an await point
/// without holding a borrow.
#[derive(Clone, Debug, Default)]
pub struct FolderLedger {
    tree: FolderTree,
    commands: CommandLog<FolderOp>,
}

impl FolderLedger {
    #[must_use]
    pub fn tree(&self) -> &FolderTree {
        &self.tree
    }

    #[must_use]
    pub fn commands(&self) -> &CommandLog<FolderOp> {
        &self.commands
    }

    /// Forget the mirror and command history for a new scope.
    ///
    /// Command ids keep counting, so a reply for a command issued before the
    /// reset settles nothing.
    pub fn reset(&mut self) {
        self.tree = FolderTree::default();
        self.commands.clear();
    }

    /// Replace the mirror with fresh backend lists. The command log is kept.
    pub fn load(&mut self, folders: Vec<Folder>, assignments: Vec<Assignment>) {
        self.tree = FolderTree::from_parts(folders, assignments);
    }

    /// Validate `op` and record it as pending.
    ///
    /// Returns the command id and the normalized operation to send.
    ///
    /// # Errors
    ///
    /// The validation failure; nothing is recorded.
    pub fn begin(&mut self, op: FolderOp) -> Result<(u64, FolderOp), FolderError> {
        let op = self.validate(op)?;
        let cmd = self.commands.begin(op.clone());
        Ok((cmd, op))
    }

    /// Apply the backend outcome of command `cmd`.
    ///
    /// On success the mirror changes and the command is confirmed. On failure
    /// the mirror is untouched and the command records the message.
    ///
    /// # Errors
    ///
    /// The backend error, or a mirror error if the confirmed change no longer
    /// applies.
    pub fn settle(&mut self, cmd: u64, outcome: Result<Option<Folder>, FleetError>) -> Result<Option<Folder>, FleetError> {
        let op = self
            .commands
            .get(cmd)
            .map(|c| c.op.clone())
            .ok_or(FolderError::UnknownCommand(cmd))?;
        let result = outcome.and_then(|created| self.apply(&op, created));
        // Settling only fails for unknown or settled ids; a repeat settle
        // leaves the first outcome in place.
        let _ = match &result {
            Ok(_) => self.commands.confirm(cmd),
            Err(e) => self.commands.fail(cmd, e.to_string()),
        };
        result
    }

    fn validate(&self, op: FolderOp) -> Result<FolderOp, FolderError> {
        let tree = &self.tree;
        Ok(match op {
            FolderOp::Create { name, parent_id } => FolderOp::Create {
                name: tree.validate_create(&name, parent_id.as_deref())?,
                parent_id,
            },
            FolderOp::Rename { id, name } => {
                let name = tree.validate_rename(&id, &name)?;
                FolderOp::Rename { id, name }
            }
            FolderOp::Delete { id } => {
                tree.validate_delete(&id)?;
                FolderOp::Delete { id }
            }
            FolderOp::Move { id, parent_id } => {
                tree.validate_move(&id, parent_id.as_deref())?;
                FolderOp::Move { id, parent_id }
            }
            FolderOp::Assign { tenant_id, folder_id } => {
                tree.validate_assign(&tenant_id, folder_id.as_deref())?;
                FolderOp::Assign { tenant_id, folder_id }
            }
        })
    }

    fn apply(&mut self, op: &FolderOp, created: Option<Folder>) -> Result<Option<Folder>, FleetError> {
        match op {
            FolderOp::Create { .. } => {
                let folder = created.ok_or_else(|| FleetError::Decode("backend returned no folder".to_owned()))?;
                self.tree.insert(folder.clone())?;
                return Ok(Some(folder));
            }
            FolderOp::Rename { id, name } => self.tree.rename(id, name)?,
            FolderOp::Delete { id } => {
                self.tree.remove(id)?;
            }
            FolderOp::Move { id, parent_id } => self.tree.reparent(id, parent_id.as_deref())?,
            FolderOp::Assign { tenant_id, folder_id } => self.tree.assign(tenant_id, folder_id.as_deref()),
        }
        Ok(None)
    }
}

/// [`FolderLedger`] bound to a backend, one awaited call per operation.
#[derive(Debug)]
pub struct FolderOrganizer<B> {
    backend: B,
    ledger: FolderLedger,
}

impl<B: FolderBackend> FolderOrganizer<B> {
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            ledger: FolderLedger::default(),
        }
    }

    #[must_use]
    pub fn tree(&self) -> &FolderTree {
        self.ledger.tree()
    }

    #[must_use]
    pub fn commands(&self) -> &CommandLog<FolderOp> {
        self.ledger.commands()
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn load(&mut self, folders: Vec<Folder>, assignments: Vec<Assignment>) {
        self.ledger.load(folders, assignments);
    }

    /// # Errors
    ///
    /// Validation failure (no backend call) or backend failure (tree unchanged).
    pub async fn create_folder(&mut self, name: &str, parent_id: Option<&str>) -> Result<Folder, FleetError> {
        let created = self
            .run(FolderOp::Create {
                name: name.to_owned(),
                parent_id: parent_id.map(str::to_owned),
            })
            .await?;
        created.ok_or_else(|| FleetError::Decode("backend returned no folder".to_owned()))
    }

    /// # Errors
    ///
    /// Validation failure (no backend call) or backend failure (tree unchanged).
    pub async fn rename_folder(&mut self, id: &str, new_name: &str) -> Result<(), FleetError> {
        self.run(FolderOp::Rename {
            id: id.to_owned(),
            name: new_name.to_owned(),
        })
        .await
        .map(|_| ())
    }

    /// # Errors
    ///
    /// Validation failure (no backend call) or backend failure (tree unchanged).
    pub async fn delete_folder(&mut self, id: &str) -> Result<(), FleetError> {
        self.run(FolderOp::Delete { id: id.to_owned() }).await.map(|_| ())
    }

    /// # Errors
    ///
    /// Validation failure (no backend call) or backend failure (tree unchanged).
    pub async fn move_folder(&mut self, id: &str, parent_id: Option<&str>) -> Result<(), FleetError> {
        self.run(FolderOp::Move {
            id: id.to_owned(),
            parent_id: parent_id.map(str::to_owned),
        })
        .await
        .map(|_| ())
    }

    /// # Errors
    ///
    /// Validation failure (no backend call) or backend failure (tree unchanged).
    pub async fn assign_tenant_to_folder(&mut self, tenant_id: &str, folder_id: Option<&str>) -> Result<(), FleetError> {
        self.run(FolderOp::Assign {
            tenant_id: tenant_id.to_owned(),
            folder_id: folder_id.map(str::to_owned),
        })
        .await
        .map(|_| ())
    }

    async fn run(&mut self, op: FolderOp) -> Result<Option<Folder>, FleetError> {
        let (cmd, op) = self.ledger.begin(op)?;
        let outcome = dispatch(&self.backend, &op).await;
        self.ledger.settle(cmd, outcome)
    }
}
