use crate::error;
use colored::*;

pub fn format_error(f: &mut std::fmt::Formatter<'_>, err: &error::Error) -> std::fmt::Result {
    writeln!(
        f,
        "{}: {}",
        "Error".color(Color::BrightRed).bold(),
        err.title().bold()
    )?;
    let trace = match err.trace() {
        None => {
            if let Some(command) = err.command() {
                writeln!(f, "  while running {command}")?;
            }
            return fmt_notes(f, 2, err.notes());
        }
        Some(trace) => trace,
    };
    let margin = trace.line_number.to_string().len() + 1;
    let location = match err.command() {
        None => format!("line {}, column {}", trace.line_number, trace.column + 1),
        Some(command) => format!(
            "{command} at line {}, column {}",
            trace.line_number,
            trace.column + 1
        ),
    };
    writeln!(f, "{}{} {location}", " ".repeat(margin - 1), "-->".bright_blue())?;
    writeln!(f, "{}{}", " ".repeat(margin), "|".bright_blue())?;
    writeln!(
        f,
        "{}{}{} {}",
        trace.line_number.to_string().bright_blue(),
        " ".repeat(margin - trace.line_number.to_string().len()),
        "|".bright_blue(),
        trace.line_content
    )?;
    writeln!(
        f,
        "{}{} {}{}",
        " ".repeat(margin),
        "|".bright_blue(),
        " ".repeat(trace.column),
        "^".color(Color::BrightRed).bold()
    )?;
    fmt_notes(f, margin, err.notes())
}

fn fmt_notes(f: &mut std::fmt::Formatter<'_>, margin: usize, notes: &[String]) -> std::fmt::Result {
    for note in notes {
        let mut lines = note.trim_end().lines();
        let first = match lines.next() {
            None => continue,
            Some(s) => s,
        };
        writeln!(f, "{}{} {} {first}", " ".repeat(margin), "=".bright_blue(), "note:".bold())?;
        for line in lines {
            writeln!(f, "{}        {line}", " ".repeat(margin))?;
        }
    }
    Ok(())
}
