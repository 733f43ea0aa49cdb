//! Terminal presentation helpers
//!
//! Everything renders into a `String` so command handlers can print, write to
//! a file, or assert on the output in tests.

pub mod csv;

use colored::*;
use unicode_width::UnicodeWidthStr;

const BAR_WIDTH: usize = 40;

/// Column alignment for [`table`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Append `line` and a newline
pub fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

pub fn section(out: &mut String, title: &str) {
    push_line(out, "");
    push_line(out, &title.bright_cyan().bold().to_string());
    push_line(out, &"─".repeat(title.width()).dimmed().to_string());
}

pub fn metric(out: &mut String, label: &str, value: &str) {
    push_line(
        out,
        &format!("  {:<32} {}", format!("{}:", label), value.bright_green().bold()),
    );
}

pub fn no_data(out: &mut String, message: &str) {
    push_line(out, &format!("  {}", message.yellow()));
}

fn pad(text: &str, width: usize, align: Align) -> String {
    let fill = " ".repeat(width.saturating_sub(text.width()));
    match align {
        Align::Left => format!("{}{}", text, fill),
        Align::Right => format!("{}{}", fill, text),
    }
}

/// Aligned table with a bold header row
pub fn table(out: &mut String, headers: &[(&str, Align)], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|(h, _)| h.width()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.width());
            }
        }
    }

    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|((h, align), w)| pad(h, *w, *align))
        .collect();
    push_line(out, &format!("  {}", header_line.join("  ").bold()));

    for row in rows {
        let line: Vec<String> = row
            .iter()
            .zip(headers.iter().zip(&widths))
            .map(|(cell, ((_, align), w))| pad(cell, *w, *align))
            .collect();
        push_line(out, &format!("  {}", line.join("  ")));
    }
}

/// Horizontal bar chart scaled to the largest value
pub fn bar_chart(out: &mut String, items: &[(String, f64)], format_value: impl Fn(f64) -> String) {
    let label_width = items.iter().map(|(l, _)| l.width()).max().unwrap_or(0);
    let max = items.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);

    for (label, value) in items {
        let len = if max > 0.0 {
            ((value / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        push_line(
            out,
            &format!(
                "  {}  {} {}",
                pad(label, label_width, Align::Left),
                "█".repeat(len).blue(),
                format_value(*value)
            ),
        );
    }
}

/// Whole-number display with thousands separators
pub fn format_count(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}
