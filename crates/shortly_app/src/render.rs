use shortly_core::{AppViewModel, LinkRowView};

const MAX_ORIGINAL_WIDTH: usize = 48;

/// Renders the view as terminal lines: input bar, inline error, then rows.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::with_capacity(view.rows.len() + 3);

    let input = if view.input.is_empty() {
        "Shorten a link here..."
    } else {
        view.input.as_str()
    };
    let button = if view.submit_enabled {
        format!("[ {} ]", view.submit_label)
    } else {
        format!("( {} )", view.submit_label)
    };
    lines.push(format!("{input}  {button}"));

    if let Some(error) = &view.error {
        lines.push(format!("  ! {error}"));
    }

    if view.rows.is_empty() {
        lines.push("  (no links yet)".to_string());
    } else {
        lines.extend(view.rows.iter().map(render_row));
    }

    lines
}

fn render_row(row: &LinkRowView) -> String {
    format!(
        "  {:>2}. {}  ->  {}  [{}]",
        row.position + 1,
        truncate(&row.original, MAX_ORIGINAL_WIDTH),
        row.short,
        row.copy_label
    )
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}
