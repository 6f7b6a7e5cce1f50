use fleet::freshness::PrinterStatus;
use fleet::model::{Assignment, Folder, Supply, Telemetry};

use super::*;

fn tenant(id: &str, name: &str) -> Tenant {
    Tenant {
        id: id.to_owned(),
        name: name.to_owned(),
        api_key: None,
        region: None,
    }
}

fn printer(id: &str, status: PrinterStatus, latest: Option<Telemetry>) -> DecoratedPrinter {
    let mut record = PrinterRecord::bare(id);
    record.latest = latest;
    DecoratedPrinter {
        record,
        last_seen_at: None,
        hold_until: None,
        status,
    }
}

#[test]
fn printer_table_shows_counts_and_lowest_supply() {
    let telemetry = Telemetry {
        last_page_count: Some(4200),
        supplies: vec![
            Supply { name: "Black".into(), level: Some(80.0), max: Some(100.0) },
            Supply { name: "Drum".into(), level: Some(15.0), max: Some(100.0) },
        ],
        ..Telemetry::default()
    };
    let table = printer_table(&[
        printer("p1", PrinterStatus::OnlineFresh, Some(telemetry)),
        printer("p2", PrinterStatus::Unseen, None),
    ]);
    let lines: Vec<_> = table.lines().collect();
    assert_eq!(lines[1], "Online\tp1\tp1\t4200\t15%");
    assert_eq!(lines[2], "Offline\tp2\tp2\t-\t-");
}

#[test]
fn summary_counts_online() {
    let printers = [
        printer("a", PrinterStatus::OnlineSticky, None),
        printer("b", PrinterStatus::OfflineStale, None),
    ];
    assert_eq!(online_summary(&printers), "1/2 online");
}

#[test]
fn folder_tree_nests_folders_and_tenants() {
    let tree = FolderTree::from_parts(
        vec![Folder::new("n", "North", None), Folder::new("p", "Plant", Some("n"))],
        vec![Assignment { tenant_id: "t1".into(), folder_id: Some("p".into()) }],
    );
    let tenants = [tenant("t1", "Acme"), tenant("t2", "Globex")];
    assert_eq!(
        folder_tree(&tree, &tenants),
        "North/ (n)\n  Plant/ (p)\n    - Acme (t1)\n- Globex (t2)\n"
    );
}

#[test]
fn tenant_lines_are_tab_separated() {
    assert_eq!(tenant_lines(&[tenant("t1", "Acme")]), "t1\tAcme\n");
}
