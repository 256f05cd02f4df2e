//! Plain-text rendering of the two panes.

use twinpane_core::fs::icons::{glyph, overlay_glyph};
use twinpane_core::nav::entry::ListEntry;
use twinpane_core::tree::Tree;

/// Formats a byte count for display (e.g. "1.2K", "3.4M").
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "K", "M", "G", "T"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes}B")
    } else {
        format!("{size:.1}{}", UNITS[unit])
    }
}

/// One list row: index, selection mark, icon, name and size.
pub fn format_row(index: usize, entry: &ListEntry, selected: bool) -> String {
    let mark = if selected { '*' } else { ' ' };
    let icons = entry.icons();
    let badge = icons.overlay.map(overlay_glyph).unwrap_or("");
    let pending = if entry.is_resolved() { "" } else { " ~" };
    let size = if entry.is_folder() {
        String::new()
    } else {
        format_size(entry.size_bytes())
    };
    let name = if entry.is_folder() && !entry.is_parent_pseudo_entry() {
        format!("{}/", entry.raw_name())
    } else {
        entry.raw_name().to_owned()
    };
    format!(
        "{index:>4} {mark} {}{badge} {name:<40} {size:>8}{pending}",
        glyph(icons.normal)
    )
}

/// Rows of the list, with the selected indices marked.
pub fn format_list(entries: &[ListEntry], selected: &[usize]) -> Vec<String> {
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| format_row(i, e, selected.contains(&i)))
        .collect()
}

/// The expanded part of the tree, indented by depth.
pub fn format_tree(tree: &Tree) -> Vec<String> {
    let selected = tree.selected();
    tree.visible_rows()
        .into_iter()
        .filter_map(|(id, depth)| {
            let node = tree.node(id)?;
            let expander = if !node.is_expandable() {
                ' '
            } else if node.is_expanded() {
                '-'
            } else {
                '+'
            };
            let icon = if node.is_expanded() {
                node.icons().selected
            } else {
                node.icons().normal
            };
            let mark = if selected == Some(id) { " <" } else { "" };
            Some(format!(
                "{}{expander} {} {}{mark}",
                "  ".repeat(depth),
                glyph(icon),
                node.name()
            ))
        })
        .collect()
}
