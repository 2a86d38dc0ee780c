//! Text rendering of the participants table and chart summaries.

use std::io::Write;

use serde_json::json;

use crate::aggregate::{slice_color, ChartSeries};
use crate::error::Result;
use crate::registration::{Field, Registration};

/// Shown in place of the participants table when there is nothing to list.
pub const EMPTY_MESSAGE: &str = "No registrations found.";

const ID_HEADING: &str = "ID";

/// Collapse control characters so a value stays on one table row.
fn cell(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

fn width(text: &str) -> usize {
    text.chars().count()
}

/// Write the participants as an aligned table, one row per record.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_table<W: Write>(out: &mut W, records: &[Registration]) -> Result<()> {
    if records.is_empty() {
        writeln!(out, "{EMPTY_MESSAGE}")?;
        return Ok(());
    }

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            std::iter::once(cell(record.id.as_str()))
                .chain(Field::ALL.iter().map(|&field| cell(record.get(field))))
                .collect()
        })
        .collect();

    let headings: Vec<&str> = std::iter::once(ID_HEADING)
        .chain(Field::ALL.iter().map(|field| field.heading()))
        .collect();

    let widths: Vec<usize> = headings
        .iter()
        .enumerate()
        .map(|(i, heading)| {
            rows.iter()
                .map(|row| width(&row[i]))
                .fold(width(heading), usize::max)
        })
        .collect();

    write_row(out, &headings, &widths)?;
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    write_row(out, &rule, &widths)?;
    for row in &rows {
        write_row(out, row, &widths)?;
    }
    Ok(())
}

fn write_row<W: Write, S: AsRef<str>>(out: &mut W, cells: &[S], widths: &[usize]) -> Result<()> {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(value, &w)| format!("{:<w$}", value.as_ref()))
        .collect();
    writeln!(out, "{}", line.join("  ").trim_end())?;
    Ok(())
}

/// Write the participants as indented blocks, skipping blank fields.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_plain<W: Write>(out: &mut W, records: &[Registration]) -> Result<()> {
    if records.is_empty() {
        writeln!(out, "{EMPTY_MESSAGE}")?;
        return Ok(());
    }

    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        writeln!(
            out,
            "[{}] {}",
            cell(record.id.as_str()),
            cell(&record.details.full_name)
        )?;
        for field in Field::ALL.into_iter().skip(1) {
            let value = record.get(field);
            if !value.trim().is_empty() {
                writeln!(out, "    {}: {}", field.heading(), cell(value))?;
            }
        }
    }
    Ok(())
}

/// Write the participants as a pretty-printed JSON array in wire format.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<W: Write>(out: &mut W, records: &[Registration]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, records)?;
    writeln!(out)?;
    Ok(())
}

/// Write one chart as a legend: label, count, share and slice colour.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_chart<W: Write>(out: &mut W, title: &str, series: &ChartSeries) -> Result<()> {
    writeln!(out, "{title}")?;
    if series.is_empty() {
        writeln!(out, "  (no data)")?;
        return Ok(());
    }

    let label_width = series
        .slices()
        .iter()
        .map(|slice| width(&slice.name))
        .max()
        .unwrap_or(0);
    let count_width = series.total().to_string().len();

    for (i, slice) in series.slices().iter().enumerate() {
        let share = series.percentage(i).unwrap_or(0.0);
        writeln!(
            out,
            "  {:<label_width$}  {:>count_width$}  {:>5.1}%  {}",
            cell(&slice.name),
            slice.value,
            share,
            slice_color(i),
        )?;
    }
    writeln!(out, "  total: {}", series.total())?;
    Ok(())
}

/// Write both dashboard charts as text.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_stats<W: Write>(out: &mut W, age: &ChartSeries, gender: &ChartSeries) -> Result<()> {
    write_chart(out, "Age Distribution", age)?;
    writeln!(out)?;
    write_chart(out, "Gender Distribution", gender)
}

/// Write both dashboard charts as JSON, one array of `{name, value}` each.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_stats_json<W: Write>(
    out: &mut W,
    age: &ChartSeries,
    gender: &ChartSeries,
) -> Result<()> {
    let doc = json!({ "age": age, "gender": gender });
    serde_json::to_writer_pretty(&mut *out, &doc)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{age_distribution, gender_distribution};
    use crate::registration::RegistrationForm;

    fn record(id: &str, name: &str, age: &str, gender: &str) -> Registration {
        Registration::new(
            id,
            RegistrationForm {
                full_name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
                age: age.to_string(),
                gender: gender.to_string(),
                ..RegistrationForm::default()
            },
        )
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_empty_list_message() {
        assert_eq!(render(|out| write_table(out, &[])), "No registrations found.\n");
        assert_eq!(render(|out| write_plain(out, &[])), "No registrations found.\n");
    }

    #[test]
    fn test_empty_list_json_is_empty_array() {
        assert_eq!(render(|out| write_json(out, &[])).trim(), "[]");
    }

    #[test]
    fn test_table_headings_in_order() {
        let text = render(|out| write_table(out, &[record("5", "Eve", "29", "Female")]));
        let header = text.lines().next().unwrap();
        let positions: Vec<usize> = [
            "ID",
            "Full Name",
            "Email",
            "Phone",
            "Age",
            "Gender",
            "Meet-up Area",
            "Message",
        ]
        .iter()
        .map(|heading| header.find(heading).unwrap())
        .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_table_columns_align() {
        let records = vec![
            record("5", "Eve", "29", "Female"),
            record("abcdef", "Bartholomew", "61", "Male"),
        ];
        let text = render(|out| write_table(out, &records));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);

        let column = lines[0].find("Email").unwrap();
        assert_eq!(&lines[2][column..column + 3], "eve");
        assert_eq!(&lines[3][column..column + 3], "bar");
    }

    #[test]
    fn test_table_keeps_multiline_message_on_one_row() {
        let mut r = record("5", "Eve", "29", "Female");
        r.details.message = "line one\nline two".to_string();
        let text = render(|out| write_table(out, &[r]));
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("line one line two"));
    }

    #[test]
    fn test_plain_skips_blank_fields() {
        let text = render(|out| write_plain(out, &[record("7", "A", "44", "Male")]));
        assert!(text.starts_with("[7] A\n"));
        assert!(text.contains("    Age: 44\n"));
        assert!(!text.contains("Phone"));
    }

    #[test]
    fn test_plain_keeps_control_characters_out_of_id() {
        let text = render(|out| write_plain(out, &[record("a\nb", "Eve", "29", "Female")]));
        assert!(text.starts_with("[a b] Eve\n"));
        assert!(text.lines().all(|line| line.starts_with('[') || line.starts_with("    ")));
    }

    #[test]
    fn test_json_uses_wire_names() {
        let text = render(|out| write_json(out, &[record("7", "A", "44", "Male")]));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["_id"], "7");
        assert_eq!(value[0]["fullName"], "A");
        assert_eq!(value[0]["meetupArea"], "");
    }

    #[test]
    fn test_chart_legend() {
        let records = vec![
            record("1", "A", "25", "Female"),
            record("2", "B", "25", "Male"),
            record("3", "C", "50", "Male"),
            record("4", "D", "17", "Male"),
        ];
        let text = render(|out| write_chart(out, "Age Distribution", &age_distribution(&records)));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Age Distribution");
        assert!(lines[1].contains("18-30"));
        assert!(lines[1].contains(" 50.0%"));
        assert!(lines[1].ends_with("#3B82F6"));
        assert!(lines[2].contains("46-60"));
        assert!(lines[2].ends_with("#10B981"));
        assert!(lines[3].contains("Under 18"));
        assert_eq!(lines[4], "  total: 4");
    }

    #[test]
    fn test_chart_without_data() {
        let text = render(|out| write_chart(out, "Gender Distribution", &ChartSeries::default()));
        assert_eq!(text, "Gender Distribution\n  (no data)\n");
    }

    #[test]
    fn test_stats_json_shape() {
        let records = vec![
            record("1", "A", "30", "Female"),
            record("2", "B", "31", "Female"),
        ];
        let text = render(|out| {
            write_stats_json(
                out,
                &age_distribution(&records),
                &gender_distribution(&records),
            )
        });
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["age"][0]["name"], "18-30");
        assert_eq!(value["age"][1]["name"], "31-45");
        assert_eq!(value["gender"][0]["value"], 2);
    }

    #[test]
    fn test_stats_text_has_both_charts() {
        let text = render(|out| {
            write_stats(out, &ChartSeries::default(), &ChartSeries::default())
        });
        assert!(text.contains("Age Distribution"));
        assert!(text.contains("Gender Distribution"));
    }
}
