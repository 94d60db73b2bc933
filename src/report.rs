// Text and CSV rendering of query results
// Author: Gabriel Demetrios Lafis

use std::fmt::Write as _;
use std::io::Write;

use crate::data::Student;
use crate::processing::{AggregateTable, PivotTable, Summary};

/// Per-student grade report: name, major, GPA and each course
pub fn grade_report(student: &Student) -> String {
    let mut report = format!(
        "Student: {}\nMajor: {}\nGPA: {:.2}\nCourses:\n",
        student.name, student.major, student.gpa
    );

    for course in &student.courses {
        let _ = writeln!(
            report,
            "  {} ({}): {:.2}",
            course.name, course.semester, course.grade
        );
    }

    report
}

/// One line per statistic
pub fn format_summary(label: &str, summary: &Summary) -> String {
    format!(
        "{}: n={}, mean={:.2}, median={:.2}, std_dev={:.2}, min={:.2}, max={:.2}",
        label, summary.count, summary.mean, summary.median, summary.std_dev, summary.min, summary.max
    )
}

/// Aligned text table of an aggregate result
pub fn format_aggregate_table(table: &AggregateTable) -> String {
    let header: Vec<String> = table
        .key_names
        .iter()
        .chain(table.aggregate_names.iter())
        .cloned()
        .collect();

    let body: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            row.key
                .values()
                .iter()
                .chain(row.values.iter())
                .map(|v| v.to_string())
                .collect()
        })
        .collect();

    render_table(&header, &body)
}

/// Dense text grid of a pivot table; empty cells are shown as `-`
pub fn format_pivot(table: &PivotTable, columns: &[String]) -> String {
    let mut header = vec![String::new()];
    header.extend(columns.iter().cloned());

    let body: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| {
            let mut line = vec![row.to_string()];
            line.extend(columns.iter().map(|column| {
                table
                    .get(row, column)
                    .map_or_else(|| "-".to_string(), |v| v.to_string())
            }));
            line
        })
        .collect();

    render_table(&header, &body)
}

/// Write the non-empty pivot cells as `row,column,value` CSV records
pub fn write_pivot_csv<W: Write>(table: &PivotTable, writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["row", "column", "value"])?;

    for cell in table.cells() {
        csv_writer.write_record([
            cell.row.to_string(),
            cell.column.clone(),
            cell.value.to_string(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write an aggregate table as CSV with a header row
pub fn write_aggregate_csv<W: Write>(table: &AggregateTable, writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(table.key_names.iter().chain(table.aggregate_names.iter()))?;

    for row in &table.rows {
        csv_writer.write_record(
            row.key
                .values()
                .iter()
                .chain(row.values.iter())
                .map(|v| v.to_string()),
        )?;
    }

    csv_writer.flush()?;
    Ok(())
}

fn render_table(header: &[String], body: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for line in body {
        for (i, cell) in line.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }

    let mut out = String::new();
    for line in std::iter::once(header).chain(body.iter().map(Vec::as_slice)) {
        let cells: Vec<String> = line
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{:<width$}", cell, width = width))
            .collect();
        let _ = writeln!(out, "{}", cells.join("  ").trim_end());
    }
    out
}
