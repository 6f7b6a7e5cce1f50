use std::cell::{Cell, RefCell};

use futures::executor::block_on;

use super::*;
use crate::command::CommandState;

fn tree() -> FolderTree {
    // root
    // ├── a
    // │   └── a1
    // │       └── a1x
    // └── b
    FolderTree::from_parts(
        vec![
            Folder::new("a", "A", None),
            Folder::new("a1", "A1", Some("a")),
            Folder::new("a1x", "A1x", Some("a1")),
            Folder::new("b", "B", None),
        ],
        vec![
            Assignment { tenant_id: "t1".into(), folder_id: Some("a1".into()) },
            Assignment { tenant_id: "t2".into(), folder_id: None },
        ],
    )
}

fn tenant(id: &str) -> Tenant {
    Tenant {
        id: id.to_owned(),
        name: id.to_uppercase(),
        api_key: None,
        region: None,
    }
}

fn ids(folders: &[&Folder]) -> Vec<String> {
    folders.iter().map(|f| f.id.clone()).collect()
}

// =============================================================
// Queries
// =============================================================

#[test]
fn child_folders_of_root_and_nested() {
    let t = tree();
    assert_eq!(ids(&t.child_folders(None)), ["a", "b"]);
    assert_eq!(ids(&t.child_folders(Some("a"))), ["a1"]);
    assert!(t.child_folders(Some("b")).is_empty());
}

#[test]
fn orphaned_folder_surfaces_at_root() {
    let t = FolderTree::from_parts(vec![Folder::new("x", "X", Some("gone"))], Vec::new());
    assert_eq!(ids(&t.child_folders(None)), ["x"]);
    assert_eq!(ids(&t.folder_path("x").unwrap()), ["x"]);
}

#[test]
fn folder_path_runs_root_to_leaf() {
    let t = tree();
    assert_eq!(ids(&t.folder_path("a1x").unwrap()), ["a", "a1", "a1x"]);
    assert_eq!(ids(&t.folder_path("a").unwrap()), ["a"]);
    assert_eq!(t.folder_path("nope"), Err(FolderError::UnknownFolder("nope".into())));
}

#[test]
fn folder_path_detects_cycles() {
    let t = FolderTree::from_parts(
        vec![Folder::new("p", "P", Some("q")), Folder::new("q", "Q", Some("p"))],
        Vec::new(),
    );
    assert!(matches!(t.folder_path("p"), Err(FolderError::Cycle(_))));
}

#[test]
fn descendants_cover_all_levels() {
    let t = tree();
    assert_eq!(ids(&t.descendants("a")), ["a1", "a1x"]);
    assert!(t.descendants("b").is_empty());
}

#[test]
fn tenants_in_folder_and_root_view() {
    let t = tree();
    let all = [tenant("t1"), tenant("t2"), tenant("t3")];
    let in_a1: Vec<_> = t.tenants_in_folder(Some("a1"), &all).iter().map(|x| x.id.clone()).collect();
    assert_eq!(in_a1, ["t1"]);
    let unfiled: Vec<_> = t.tenants_in_folder(None, &all).iter().map(|x| x.id.clone()).collect();
    assert_eq!(unfiled, ["t2", "t3"]);
    assert_eq!(t.folder_of("t1"), Some("a1"));
    assert_eq!(t.folder_of("t2"), None);
}

#[test]
fn tenant_in_unknown_folder_shows_at_root() {
    let t = FolderTree::from_parts(
        vec![Folder::new("a", "A", None)],
        vec![Assignment { tenant_id: "t1".into(), folder_id: Some("gone".into()) }],
    );
    let all = [tenant("t1")];
    let root: Vec<_> = t.tenants_in_folder(None, &all).iter().map(|x| x.id.clone()).collect();
    assert_eq!(root, ["t1"]);
    assert!(t.tenants_in_folder(Some("gone"), &all).is_empty());
}

// =============================================================
// Validation
// =============================================================

#[test]
fn create_trims_and_rejects_empty_names() {
    let t = tree();
    assert_eq!(t.validate_create("  Ops  ", Some("a")).unwrap(), "Ops");
    assert_eq!(
        t.validate_create("   ", None),
        Err(FolderError::Validation(ValidationError::EmptyName))
    );
    assert_eq!(
        t.validate_create("X", Some("zz")),
        Err(FolderError::UnknownFolder("zz".into()))
    );
}

#[test]
fn move_rejects_self_and_descendants() {
    let t = tree();
    assert!(t.validate_move("a", Some("b")).is_ok());
    assert!(t.validate_move("a1", None).is_ok());
    assert!(matches!(t.validate_move("a", Some("a")), Err(FolderError::InvalidParent { .. })));
    assert!(matches!(t.validate_move("a", Some("a1x")), Err(FolderError::InvalidParent { .. })));
}

#[test]
fn assign_requires_tenant_and_known_folder() {
    let t = tree();
    assert!(t.validate_assign("t9", Some("b")).is_ok());
    assert!(t.validate_assign("t9", None).is_ok());
    assert!(t.validate_assign(" ", None).is_err());
    assert!(t.validate_assign("t9", Some("zz")).is_err());
}

// =============================================================
// Confirmed mutations
// =============================================================

#[test]
fn remove_reparents_children_and_unfiles_tenants() {
    let mut t = tree();
    let removed = t.remove("a1").unwrap();
    assert_eq!(removed.id, "a1");
    assert_eq!(t.get("a1x").unwrap().parent_id.as_deref(), Some("a"));
    assert_eq!(t.folder_of("t1"), None);
    assert_eq!(ids(&t.folder_path("a1x").unwrap()), ["a", "a1x"]);
}

#[test]
fn insert_rejects_duplicate_ids() {
    let mut t = tree();
    assert_eq!(
        t.insert(Folder::new("b", "B2", None)),
        Err(FolderError::DuplicateFolder("b".into()))
    );
}

#[test]
fn reparent_and_assign_update_mirror() {
    let mut t = tree();
    t.reparent("b", Some("a1x")).unwrap();
    assert_eq!(ids(&t.folder_path("b").unwrap()), ["a", "a1", "a1x", "b"]);
    t.assign("t2", Some("b"));
    assert_eq!(t.folder_of("t2"), Some("b"));
    t.assign("t2", None);
    assert_eq!(t.folder_of("t2"), None);
}

// =============================================================
// FolderOrganizer
// =============================================================

#[derive(Default)]
struct FakeBackend {
    calls: RefCell<Vec<String>>,
    fail: Cell<bool>,
    next_id: Cell<u32>,
}

impl FakeBackend {
    fn outcome(&self, call: String) -> Result<(), FleetError> {
        self.calls.borrow_mut().push(call);
        if self.fail.get() {
            return Err(FleetError::Api("boom".into()));
        }
        Ok(())
    }
}

impl FolderBackend for FakeBackend {
    async fn create_folder(&self, name: &str, parent_id: Option<&str>) -> Result<Folder, FleetError> {
        self.outcome(format!("create {name}"))?;
        let n = self.next_id.get() + 1;
        self.next_id.set(n);
        Ok(Folder::new(format!("new{n}"), name, parent_id))
    }

    async fn rename_folder(&self, id: &str, name: &str) -> Result<(), FleetError> {
        self.outcome(format!("rename {id} {name}"))
    }

    async fn delete_folder(&self, id: &str) -> Result<(), FleetError> {
        self.outcome(format!("delete {id}"))
    }

    async fn move_folder(&self, id: &str, _parent_id: Option<&str>) -> Result<(), FleetError> {
        self.outcome(format!("move {id}"))
    }

    async fn assign_tenant(&self, tenant_id: &str, _folder_id: Option<&str>) -> Result<(), FleetError> {
        self.outcome(format!("assign {tenant_id}"))
    }
}

fn organizer() -> FolderOrganizer<FakeBackend> {
    let mut org = FolderOrganizer::new(FakeBackend::default());
    let t = tree();
    org.load(t.folders().to_vec(), vec![Assignment { tenant_id: "t1".into(), folder_id: Some("a1".into()) }]);
    org
}

#[test]
fn create_applies_after_backend_confirms() {
    let mut org = organizer();
    let folder = block_on(org.create_folder(" New ", Some("b"))).unwrap();
    assert_eq!(folder.name, "New");
    assert_eq!(ids(&org.tree().child_folders(Some("b"))), [folder.id.clone()]);
    assert!(!org.commands().has_pending());
    assert_eq!(org.commands().get(1).map(|c| c.state.clone()), Some(CommandState::Confirmed));
}

#[test]
fn validation_failure_makes_no_backend_call() {
    let mut org = organizer();
    let err = block_on(org.create_folder("", None)).unwrap_err();
    assert_eq!(err, FleetError::Folder(FolderError::Validation(ValidationError::EmptyName)));
    assert!(org.backend().calls.borrow().is_empty());
    assert!(org.commands().is_empty());
}

#[test]
fn backend_failure_leaves_tree_unchanged() {
    let mut org = organizer();
    let before = org.tree().clone();
    org.backend().fail.set(true);

    assert!(block_on(org.rename_folder("a", "Renamed")).is_err());
    assert!(block_on(org.delete_folder("a1")).is_err());
    assert!(block_on(org.move_folder("b", Some("a"))).is_err());
    assert!(block_on(org.assign_tenant_to_folder("t1", None)).is_err());

    assert_eq!(org.tree(), &before);
    assert_eq!(org.commands().last_failure(), Some("boom"));
    assert_eq!(org.backend().calls.borrow().len(), 4);
}

#[test]
fn confirmed_mutations_update_tree() {
    let mut org = organizer();
    block_on(org.rename_folder("a", "Alpha")).unwrap();
    block_on(org.move_folder("b", Some("a"))).unwrap();
    block_on(org.assign_tenant_to_folder("t1", Some("b"))).unwrap();
    block_on(org.delete_folder("a1")).unwrap();

    let t = org.tree();
    assert_eq!(t.get("a").unwrap().name, "Alpha");
    assert_eq!(t.get("a1x").unwrap().parent_id.as_deref(), Some("a"));
    assert_eq!(ids(&t.child_folders(Some("a"))), ["a1x", "b"]);
    assert_eq!(t.folder_of("t1"), Some("b"));
    assert_eq!(org.commands().len(), 4);
}

#[test]
fn move_into_descendant_is_rejected_locally() {
    let mut org = organizer();
    let err = block_on(org.move_folder("a", Some("a1x"))).unwrap_err();
    assert!(matches!(err, FleetError::Folder(FolderError::InvalidParent { .. })));
    assert!(org.backend().calls.borrow().is_empty());
}

// =============================================================
// FolderLedger (split begin / settle)
// =============================================================

#[test]
fn ledger_begin_normalizes_and_records_pending() {
    let mut ledger = FolderLedger::default();
    ledger.load(tree().folders().to_vec(), Vec::new());
    let (cmd, op) = ledger
        .begin(FolderOp::Rename { id: "b".into(), name: "  Beta ".into() })
        .unwrap();
    assert_eq!(op, FolderOp::Rename { id: "b".into(), name: "Beta".into() });
    assert!(ledger.commands().get(cmd).is_some_and(|c| c.is_pending()));
    // Not applied until settled.
    assert_eq!(ledger.tree().get("b").unwrap().name, "B");

    ledger.settle(cmd, Ok(None)).unwrap();
    assert_eq!(ledger.tree().get("b").unwrap().name, "Beta");
}

#[test]
fn ledger_settle_failure_records_message() {
    let mut ledger = FolderLedger::default();
    ledger.load(tree().folders().to_vec(), Vec::new());
    let (cmd, _) = ledger.begin(FolderOp::Delete { id: "a".into() }).unwrap();
    let err = ledger.settle(cmd, Err(FleetError::Network("offline".into()))).unwrap_err();
    assert_eq!(err, FleetError::Network("offline".into()));
    assert!(ledger.tree().contains("a"));
    assert_eq!(ledger.commands().last_failure(), Some("network error: offline"));
}

#[test]
fn ledger_create_without_folder_fails() {
    let mut ledger = FolderLedger::default();
    let (cmd, _) = ledger
        .begin(FolderOp::Create { name: "X".into(), parent_id: None })
        .unwrap();
    assert!(matches!(ledger.settle(cmd, Ok(None)), Err(FleetError::Decode(_))));
    assert!(ledger.tree().folders().is_empty());
}

#[test]
fn ledger_reset_keeps_ids_unique() {
    let mut ledger = FolderLedger::default();
    ledger.load(tree().folders().to_vec(), Vec::new());
    let (before, _) = ledger.begin(FolderOp::Delete { id: "b".into() }).unwrap();
    ledger.reset();
    assert!(ledger.tree().folders().is_empty());
    assert!(ledger.commands().is_empty());

    ledger.load(vec![Folder::new("keep", "Keep", None)], Vec::new());
    let (after, _) = ledger.begin(FolderOp::Delete { id: "keep".into() }).unwrap();
    assert!(after > before);
    assert_eq!(
        ledger.settle(before, Ok(None)),
        Err(FleetError::Folder(FolderError::UnknownCommand(before)))
    );
    assert!(ledger.tree().contains("keep"));
}

#[test]
fn ledger_settle_unknown_command() {
    let mut ledger = FolderLedger::default();
    assert_eq!(
        ledger.settle(42, Ok(None)),
        Err(FleetError::Folder(FolderError::UnknownCommand(42)))
    );
}
