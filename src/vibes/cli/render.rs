//! # Rendering Module
//!
//! Every function here builds a `String`; the menu decides where it goes. Message
//! colors come from `colored`, panel and table styles from [`VIBES_THEME`].
//!
//! Layout math (column widths, truncation, padding) is Unicode-aware and done on
//! plain text before styling, so ANSI codes never count towards a width.

use super::styles::VIBES_THEME;
use chrono::{DateTime, Utc};
use colored::Colorize;
use console::Style;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use vibes::commands::{CmdMessage, MessageLevel};
use vibes::error::VibesError;
use vibes::index::{IndexedVibe, CANCEL_SENTINEL};
use vibes::model::Vibe;

pub const RULE_WIDTH: usize = 50;
pub const DESCRIPTION_WIDTH: usize = 50;
pub const CANDIDATE_TITLE_WIDTH: usize = 30;
pub const SHORT_ID_LEN: usize = 8;

const EMULATOR_HINT: &str = "Make sure the Cosmos DB emulator is running";

pub fn welcome(target: &str) -> String {
    panel(
        "Vibes Manager",
        &[
            "Welcome to the Vibes Manager!",
            "",
            "Add new vibes, remove existing ones, and view your entire collection.",
            "",
            format!("Store: {}", target).as_str(),
        ],
        &VIBES_THEME.welcome_border,
    )
}

pub fn menu() -> String {
    let mut out = "=".repeat(RULE_WIDTH);
    out.push('\n');
    out.push_str(&panel(
        "Main Menu",
        &[
            "1. Add a new vibe",
            "2. Remove a vibe",
            "3. List all vibes",
            "4. Exit",
        ],
        &VIBES_THEME.menu_border,
    ));
    out
}

pub fn heading(text: &str) -> String {
    format!("\n{}", VIBES_THEME.heading.apply_to(text))
}

pub fn status(text: &str) -> String {
    VIBES_THEME.status.apply_to(text).to_string()
}

pub fn messages(messages: &[CmdMessage]) -> String {
    let mut out = String::new();
    for message in messages {
        let line = match message.level {
            MessageLevel::Info => message.content.blue(),
            MessageLevel::Success => message.content.green(),
            MessageLevel::Warning => message.content.yellow(),
            MessageLevel::Error => message.content.red(),
        };
        out.push_str(&format!("{}\n", line));
    }
    out
}

/// A failed operation, with a hint when the store could not be reached.
pub fn failure(error: &VibesError) -> String {
    let mut out = format!("{}\n", error.to_string().red());
    if error.is_unavailable() {
        out.push_str(&unavailable_hint());
    }
    out
}

pub fn unavailable_hint() -> String {
    format!("{}\n", EMULATOR_HINT.yellow())
}

/// The list view: one row per vibe, then the total.
pub fn vibe_table(vibes: &[IndexedVibe]) -> String {
    let theme = &*VIBES_THEME;
    let headers = ["ID", "Title", "Description", "Category", "Created"];
    let rows: Vec<[String; 5]> = vibes
        .iter()
        .map(|iv| {
            let v = &iv.vibe;
            [
                short_id(v),
                v.title.clone(),
                truncate_to_width(&v.description, DESCRIPTION_WIDTH),
                v.category.clone(),
                v.created_at.format("%Y-%m-%d %H:%M").to_string(),
            ]
        })
        .collect();

    let mut widths = headers.map(|h| h.width());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.width());
        }
    }
    let column_styles = [
        &theme.id,
        &theme.title,
        &Style::new(),
        &theme.category,
        &theme.time,
    ];

    let mut out = String::new();
    out.push_str(&format!("{}\n", theme.heading.apply_to("Vibes Database")));
    let header_cells: Vec<_> = headers
        .iter()
        .zip(widths.iter())
        .map(|(h, w)| theme.table_header.apply_to(pad_to_width(h, *w)).to_string())
        .collect();
    out.push_str(&format!("{}\n", header_cells.join("  ").trim_end()));
    let rule: Vec<_> = widths.iter().map(|w| "─".repeat(*w)).collect();
    out.push_str(&format!("{}\n", rule.join("  ")));

    for row in &rows {
        let cells: Vec<_> = row
            .iter()
            .zip(widths.iter())
            .zip(column_styles.iter())
            .map(|((cell, w), style)| style.apply_to(pad_to_width(cell, *w)).to_string())
            .collect();
        out.push_str(&format!("{}\n", cells.join("  ").trim_end()));
    }

    out.push_str(&format!(
        "\n{}\n",
        status(&format!("Total vibes: {}", vibes.len()))
    ));
    out
}

/// Numbered lines offered at the removal prompt.
pub fn candidates(vibes: &[IndexedVibe]) -> String {
    let theme = &*VIBES_THEME;
    let mut out = format!(
        "{}\n\nAvailable vibes:\n",
        theme
            .heading
            .apply_to(format!("Select a vibe to remove ({} total):", vibes.len()))
    );
    for iv in vibes {
        let line = format!(
            "  {}. {} [{}] ({})",
            iv.index,
            truncate_to_width(&iv.vibe.title, CANDIDATE_TITLE_WIDTH),
            iv.vibe.category,
            iv.vibe.created_at.format("%m/%d/%y")
        );
        out.push_str(&format!("{}\n", theme.candidate.apply_to(line)));
    }
    out.push_str(&format!(
        "{}\n",
        theme
            .dim
            .apply_to(format!("  {}. Go back to main menu", CANCEL_SENTINEL))
    ));
    out
}

/// Full details of the vibe about to be deleted.
pub fn preview(vibe: &Vibe) -> String {
    let theme = &*VIBES_THEME;
    let created = format_timestamp(vibe.created_at);
    let updated = format_timestamp(vibe.updated_at);
    let id = vibe.id.to_string();
    let fields = [
        ("Title:", vibe.title.as_str()),
        ("Description:", vibe.description.as_str()),
        ("Category:", vibe.category.as_str()),
        ("ID:", id.as_str()),
        ("Created:", created.as_str()),
        ("Updated:", updated.as_str()),
    ];
    let label_width = fields.iter().map(|(l, _)| l.width()).max().unwrap_or(0);

    let mut out = format!("{}\n", theme.heading.apply_to("Selected vibe details:"));
    for (label, value) in fields {
        out.push_str(&format!(
            "  {}  {}\n",
            theme.field.apply_to(pad_to_width(label, label_width)),
            value
        ));
    }
    out
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    format!("{} ({})", at.format("%Y-%m-%d %H:%M UTC"), format_time_ago(at))
}

fn short_id(vibe: &Vibe) -> String {
    vibe.id.to_string().chars().take(SHORT_ID_LEN).collect()
}

fn panel(title: &str, lines: &[&str], border: &Style) -> String {
    let inner = lines
        .iter()
        .map(|l| l.width())
        .chain(std::iter::once(title.width() + 2))
        .max()
        .unwrap_or(0);

    let top_fill = inner + 2 - (title.width() + 2);
    let left = top_fill / 2;
    let right = top_fill - left;
    let mut out = format!(
        "{}\n",
        border.apply_to(format!(
            "╭{} {} {}╮",
            "─".repeat(left),
            title,
            "─".repeat(right)
        ))
    );
    for line in lines {
        out.push_str(&format!(
            "{} {} {}\n",
            border.apply_to("│"),
            pad_to_width(line, inner),
            border.apply_to("│")
        ));
    }
    out.push_str(&format!(
        "{}\n",
        border.apply_to(format!("╰{}╯", "─".repeat(inner + 2)))
    ));
    out
}

fn pad_to_width(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(fill))
}

/// Cuts `s` to at most `max_width` columns, marking the cut with an ellipsis.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    let limit = max_width.saturating_sub(1);

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    timeago::Formatter::new().convert(duration.to_std().unwrap_or_default())
}
