use chrono::{DateTime, Utc};
use colored::Colorize;
use papernotes::api::{CmdMessage, MessageLevel};
use papernotes::index::DisplayRecord;
use papernotes::model::Field;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const LABEL_WIDTH: usize = 18;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => eprintln!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_record_list(records: &[DisplayRecord]) {
    print!("{}", render_record_list(records));
}

pub(super) fn print_full_records(records: &[DisplayRecord]) {
    print!("{}", render_full_records(records));
}

/// One line per record: position, title with authors and year, age.
pub(super) fn render_record_list(records: &[DisplayRecord]) -> String {
    let mut out = String::new();
    for dr in records {
        let idx_str = format!("{:>3}. ", dr.index);
        let available = LINE_WIDTH.saturating_sub(idx_str.width() + TIME_WIDTH + 2);

        let summary = summary_line(dr);
        let summary = truncate_to_width(&summary, available);
        let padding = available.saturating_sub(summary.width());

        let time_ago = dr
            .record
            .created_at
            .map(format_time_ago)
            .unwrap_or_else(|| " ".repeat(TIME_WIDTH));

        out.push_str(&format!(
            "{}{}{}  {}\n",
            idx_str.yellow(),
            summary,
            " ".repeat(padding),
            time_ago.dimmed()
        ));
    }
    out
}

fn summary_line(dr: &DisplayRecord) -> String {
    let fields = &dr.record.fields;
    let mut line = dr.record.display_title().to_string();
    if !fields.authors.trim().is_empty() {
        line.push_str(&format!(" · {}", fields.authors.trim()));
    }
    if !fields.year.trim().is_empty() {
        line.push_str(&format!(" ({})", fields.year.trim()));
    }
    line.replace('\n', " ")
}

/// Every field of every record, blank fields included so the layout stays stable.
pub(super) fn render_full_records(records: &[DisplayRecord]) -> String {
    let mut out = String::new();
    for (i, dr) in records.iter().enumerate() {
        if i > 0 {
            out.push_str("\n================================\n\n");
        }
        out.push_str(&format!(
            "{} {}\n",
            format!("{}.", dr.index).yellow(),
            dr.record.display_title().bold()
        ));
        out.push_str(&format!("{}\n", dr.record.id.to_string().dimmed()));
        out.push_str("--------------------------------\n");
        for field in Field::ALL.iter().filter(|f| **f != Field::Title) {
            let value = dr.record.fields.get(*field);
            let mut lines = value.lines();
            let first = lines.next().unwrap_or("");
            out.push_str(&format!(
                "{:<width$} {}\n",
                format!("{}:", field.label()),
                first,
                width = LABEL_WIDTH
            ));
            for rest in lines {
                out.push_str(&format!("{:<width$} {}\n", "", rest, width = LABEL_WIDTH));
            }
        }
    }
    out
}

pub(super) fn render_config(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{} = {}\n", k, v))
        .collect()
}

pub(super) fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }
    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let time_str = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
