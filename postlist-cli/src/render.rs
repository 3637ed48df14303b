//! Plain-text rendering of the table.

use postlist_lib::TableState;
use postlist_lib::api::query::Direction;
use postlist_lib::table::CheckState;
use postlist_lib::table::Column;
use postlist_lib::table::ColumnKind;
use postlist_lib::table::RowMode;
use postlist_lib::table::RowView;

fn checkbox(state: CheckState) -> &'static str {
    match state {
        CheckState::Unchecked => "[ ]",
        CheckState::Checked => "[x]",
        CheckState::Indeterminate => "[-]",
    }
}

fn header(state: &TableState, column: &Column) -> String {
    match column.kind {
        ColumnKind::Selection => checkbox(state.header_state()).to_string(),
        ColumnKind::Actions => column.header.to_string(),
        ColumnKind::Data => match state.query().sort_direction(column.id) {
            Some(Direction::Asc) => format!("{} ^", column.header),
            Some(Direction::Desc) => format!("{} v", column.header),
            None => column.header.to_string(),
        },
    }
}

fn cell(row: &RowView<'_>, column: &Column) -> String {
    match (column.kind, row.mode) {
        (ColumnKind::Selection, _) => {
            let state = if row.selected {
                CheckState::Checked
            } else {
                CheckState::Unchecked
            };
            checkbox(state).to_string()
        }
        (ColumnKind::Actions, RowMode::Display) => "edit delete".to_string(),
        (ColumnKind::Actions, RowMode::Editing(editing)) if editing.submitting => "saving...".to_string(),
        (ColumnKind::Actions, RowMode::Editing(_)) => "save cancel".to_string(),
        (ColumnKind::Data, RowMode::Editing(editing)) if column.id == "title" => format!("<{}>", editing.draft.title),
        (ColumnKind::Data, RowMode::Editing(editing)) if column.id == "status" => format!("<{}>", editing.draft.status),
        (ColumnKind::Data, _) => column.value(row.post).to_string(),
    }
}

fn join_cells(cells: &[String], widths: &[usize]) -> String {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(text, &width)| format!("{:<width$}", text, width = width))
        .collect::<Vec<_>>()
        .join(" | ");
    line.trim_end().to_string()
}

/// Renders the table, its footer and any pending prompt.
pub fn render(state: &TableState) -> String {
    let columns: Vec<&Column> = state.columns().iter().collect();
    let views = state.row_views();

    let mut grid = Vec::with_capacity(views.len() + 1);
    grid.push(columns.iter().map(|c| header(state, c)).collect::<Vec<_>>());
    for view in &views {
        grid.push(columns.iter().map(|c| cell(view, c)).collect());
    }
    let widths: Vec<usize> = (0..columns.len())
        .map(|i| grid.iter().map(|row| row[i].chars().count()).max().unwrap_or(0))
        .collect();

    let mut lines = Vec::new();

    let filters: Vec<String> = columns
        .iter()
        .filter_map(|c| {
            state
                .query()
                .filter_value(c.id)
                .map(|value| format!("{} contains \"{}\"", c.header, value))
        })
        .collect();
    if !filters.is_empty() {
        lines.push(format!("Filters: {}", filters.join(", ")));
    }

    lines.push(join_cells(&grid[0], &widths));
    lines.push(widths.iter().map(|&w| "-".repeat(w)).collect::<Vec<_>>().join("-+-"));
    for (view, cells) in views.iter().zip(&grid[1..]) {
        lines.push(join_cells(cells, &widths));
        if let RowMode::Editing(editing) = view.mode {
            for error in &editing.errors.errors {
                lines.push(format!("      ! {}", error));
            }
        }
    }
    if views.is_empty() {
        lines.push(if state.is_loaded() {
            "No records.".to_string()
        } else {
            "Loading...".to_string()
        });
    }

    let query = state.query();
    let sizes: Vec<String> = query.page_sizes().iter().map(|s| s.to_string()).collect();
    lines.push(String::new());
    lines.push(format!(
        "{} | {} records | Rows per page: {} ({}) | {} selected{}",
        state.page_label(),
        query.total_count().unwrap_or(0),
        query.page_size(),
        sizes.join("/"),
        state.selection().selected_in(&state.rendered_ids()).len(),
        if state.is_loading() { " | loading" } else { "" },
    ));

    if let Some(pending) = state.pending_delete() {
        let ids: Vec<String> = pending.ids.iter().map(|id| id.to_string()).collect();
        lines.push(format!("{} Delete {}? [yes/no]", pending.message, ids.join(", ")));
    }

    lines.join("\n")
}
