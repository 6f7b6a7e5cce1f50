//! Plain-text rendering of tenants, printers and folders.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::fmt::Write as _;

use fleet::folders::FolderTree;
use fleet::freshness::DecoratedPrinter;
use fleet::model::{PrinterRecord, Tenant};

const DASH: &str = "-";

fn or_dash(value: Option<u64>) -> String {
    value.map_or_else(|| DASH.to_owned(), |n| n.to_string())
}

pub fn tenant_lines(tenants: &[Tenant]) -> String {
    let mut out = String::new();
    for tenant in tenants {
        let _ = writeln!(out, "{}\t{}", tenant.id, tenant.name);
    }
    out
}

/// Lowest supply percentage of a printer, if it reports any.
fn lowest_supply(record: &PrinterRecord) -> Option<u8> {
    record
        .latest
        .as_ref()
        .and_then(|t| t.supplies.iter().map(fleet::model::Supply::percent).min())
}

/// One row per printer: status, id, label, total pages, lowest supply.
pub fn printer_table(printers: &[DecoratedPrinter]) -> String {
    let mut out = String::from("STATUS\tID\tNAME\tPAGES\tSUPPLY\n");
    for printer in printers {
        let pages = printer.record.latest.as_ref().and_then(|t| t.last_page_count);
        let supply = lowest_supply(&printer.record).map_or_else(|| DASH.to_owned(), |p| format!("{p}%"));
        let _ = writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}",
            printer.status.label(),
            printer.record.id,
            printer.record.label(),
            or_dash(pages),
            supply
        );
    }
    out
}

pub fn online_summary(printers: &[DecoratedPrinter]) -> String {
    let online = printers.iter().filter(|p| p.is_online()).count();
    format!("{online}/{} online", printers.len())
}

/// Indented folder tree with the tenants filed in each folder.
pub fn folder_tree(tree: &FolderTree, tenants: &[Tenant]) -> String {
    let mut out = String::new();
    write_level(tree, tenants, None, 0, &mut out);
    out
}

fn write_level(tree: &FolderTree, tenants: &[Tenant], parent: Option<&str>, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    for folder in tree.child_folders(parent) {
        let _ = writeln!(out, "{indent}{}/ ({})", folder.name, folder.id);
        write_level(tree, tenants, Some(&folder.id), depth + 1, out);
    }
    for tenant in tree.tenants_in_folder(parent, tenants) {
        let _ = writeln!(out, "{indent}- {} ({})", tenant.name, tenant.id);
    }
}
