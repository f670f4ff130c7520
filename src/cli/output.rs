//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use std::io::{self, Write};

use colored::{ColoredString, Colorize};

use crate::domain::{Color, Report};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print `label: value` with the label padded to `width`
pub fn field(label: &str, width: usize, value: &(impl std::fmt::Display + ?Sized)) {
    println!("  {:<width$} {}", format!("{}:", label), value, width = width + 1);
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color, for data lines)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// Paint text in a dashboard color.
pub fn paint(text: &str, color: Color) -> ColoredString {
    match color {
        Color::Black => text.normal(),
        Color::LimeGreen => text.truecolor(50, 205, 50),
        Color::Red => text.red(),
        Color::RoyalBlue => text.truecolor(65, 105, 225),
        Color::Gray => text.bright_black(),
        Color::Orange => text.truecolor(255, 165, 0),
    }
}

/// Quote a CSV field when it contains a separator, quote or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_line<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| csv_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Write a report as CSV: header line, then one line per row.
pub fn write_csv(out: &mut impl Write, report: &Report) -> io::Result<()> {
    writeln!(out, "{}", csv_line(&report.headers))?;
    for row in &report.rows {
        writeln!(out, "{}", csv_line(row))?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ReportKind;

    #[test]
    fn given_fields_with_separators_when_writing_csv_then_quotes_them() {
        let report = Report {
            kind: ReportKind::MasterSheet,
            headers: vec!["SiteID".into(), "Region".into()],
            rows: vec![vec!["S1".into(), "North, \"upper\"".into()]],
        };
        let mut buf = Vec::new();

        write_csv(&mut buf, &report).unwrap();

        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "SiteID,Region\nS1,\"North, \"\"upper\"\"\"\n"
        );
    }
}
