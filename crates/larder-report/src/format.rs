//! Rendering of assembled report records as text or CSV.
//!
//! All formatters are pure: a list of records in, a [`ReportOutput`] out.
//! Text and CSV render the same column set in the same order; CSV adds
//! standard quoting. Missing values always render an explicit placeholder
//! token, never a blank that could be mistaken for "not yet fetched".

use larder_core::{CookbookRecord, NodeReportItem};

/// Placeholder for an empty node/cookbook/violation list
const NONE: &str = "none";
/// Placeholder for a missing version or OS attribute
const UNKNOWN: &str = "unknown";
/// Placeholder for a missing policy group
const NO_GROUP: &str = "no group";
/// Placeholder for a missing policy name
const NO_POLICY: &str = "no policy";
/// Placeholder for a missing policy revision
const NO_REVISION: &str = "no revision";

/// A rendered report: the report body and the aggregated error text.
///
/// `errors` is empty when no record carried an error slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportOutput {
    /// The rendered report
    pub report: String,
    /// Aggregated per-record errors, one line each
    pub errors: String,
}

fn cookbook_columns(run_cookstyle: bool) -> Vec<&'static str> {
    let mut columns = vec![
        "Cookbook Name",
        "Version",
        "Policy Group",
        "Policy",
        "Policy Revision",
    ];
    if run_cookstyle {
        columns.extend(["File", "Offense", "Auto-correctable", "Message"]);
    }
    columns.push("Nodes");
    columns
}

/// Rows for one cookbook record: one row per record with the analyzer off,
/// one row per (file, offense) pair with it on.
fn cookbook_rows(record: &CookbookRecord, run_cookstyle: bool) -> Vec<Vec<String>> {
    let mut nodes = record.nodes.clone();
    nodes.sort();
    let nodes_cell = if nodes.is_empty() {
        NONE.to_string()
    } else {
        nodes.join(", ")
    };

    let base = |extra: Vec<String>| {
        let mut row = vec![
            record.name.clone(),
            record.version.clone(),
            record.policy_group.clone().unwrap_or_else(|| NO_GROUP.into()),
            record.policy.clone().unwrap_or_else(|| NO_POLICY.into()),
            record
                .policy_revision
                .clone()
                .unwrap_or_else(|| NO_REVISION.into()),
        ];
        row.extend(extra);
        row.push(nodes_cell.clone());
        row
    };

    if !run_cookstyle {
        return vec![base(Vec::new())];
    }

    record
        .files
        .iter()
        .flat_map(|file| {
            file.offenses.iter().map(|offense| {
                base(vec![
                    file.path.clone(),
                    offense.cop_name.clone(),
                    if offense.correctable { "yes" } else { "no" }.to_string(),
                    offense.message.clone(),
                ])
            })
        })
        .collect()
}

fn sorted_records(records: &[CookbookRecord]) -> Vec<&CookbookRecord> {
    let mut sorted: Vec<&CookbookRecord> = records.iter().collect();
    sorted.sort_by(|a, b| (&a.name, &a.version).cmp(&(&b.name, &b.version)));
    sorted
}

fn cookbook_errors(records: &[CookbookRecord]) -> String {
    let mut lines = Vec::new();
    for record in sorted_records(records) {
        for (label, slot) in [
            ("download error", &record.download_error),
            ("usage lookup error", &record.usage_error),
            ("cookstyle error", &record.cookstyle_error),
        ] {
            if let Some(message) = slot {
                lines.push(format!(
                    " - {} ({}): {label}: {message}",
                    record.name, record.version
                ));
            }
        }
    }
    if lines.is_empty() {
        String::new()
    } else {
        format!("{}\n", lines.join("\n"))
    }
}

/// Render the cookbook report as aligned text columns.
///
/// The optional `node_filter` annotates the report header only; it never
/// changes which records render.
#[must_use]
pub fn cookbooks_text(
    records: &[CookbookRecord],
    run_cookstyle: bool,
    node_filter: Option<&str>,
) -> ReportOutput {
    let columns = cookbook_columns(run_cookstyle);
    let rows: Vec<Vec<String>> = sorted_records(records)
        .iter()
        .flat_map(|r| cookbook_rows(r, run_cookstyle))
        .collect();

    let mut report = String::new();
    match node_filter {
        Some(filter) => report.push_str(&format!("-- COOKBOOKS REPORT (node: {filter}) --\n\n")),
        None => report.push_str("-- COOKBOOKS REPORT --\n\n"),
    }
    report.push_str(&aligned_table(&columns, &rows));

    ReportOutput {
        report,
        errors: cookbook_errors(records),
    }
}

/// Render the cookbook report as CSV with the same columns as the text
/// report.
pub fn cookbooks_csv(
    records: &[CookbookRecord],
    run_cookstyle: bool,
) -> Result<ReportOutput, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(cookbook_columns(run_cookstyle))?;
    for record in sorted_records(records) {
        for row in cookbook_rows(record, run_cookstyle) {
            writer.write_record(&row)?;
        }
    }

    let report = String::from_utf8(writer.into_inner().map_err(std::io::Error::other)?)
        .map_err(std::io::Error::other)?;

    Ok(ReportOutput {
        report,
        errors: cookbook_errors(records),
    })
}

fn node_fields(item: &NodeReportItem) -> Vec<(&'static str, String)> {
    let or = |value: &Option<String>, placeholder: &str| {
        value.clone().unwrap_or_else(|| placeholder.to_string())
    };
    let cookbooks = if item.cookbooks.is_empty() {
        NONE.to_string()
    } else {
        let mut sorted = item.cookbooks.clone();
        sorted.sort();
        sorted
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };

    vec![
        ("Node Name", item.name.clone()),
        ("Chef Version", or(&item.chef_version, UNKNOWN)),
        ("Operating System", or(&item.os, UNKNOWN)),
        ("Operating System Version", or(&item.os_version, UNKNOWN)),
        ("Policy Group", or(&item.policy_group, NO_GROUP)),
        ("Policy", or(&item.policy, NO_POLICY)),
        ("Policy Revision", or(&item.policy_revision, NO_REVISION)),
        ("Cookbooks Applied", cookbooks),
    ]
}

fn sorted_items(items: &[NodeReportItem]) -> Vec<&NodeReportItem> {
    let mut sorted: Vec<&NodeReportItem> = items.iter().collect();
    // case-sensitive lexical order: uppercase sorts before lowercase
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    sorted
}

/// Render the node report as one block per node.
#[must_use]
pub fn nodes_text(items: &[NodeReportItem]) -> ReportOutput {
    let mut report = String::from("-- NODES REPORT --\n");
    for item in sorted_items(items) {
        let mut fields = node_fields(item).into_iter();
        let (_, name) = fields.next().unwrap_or(("Node Name", String::new()));
        report.push_str(&format!("\n{name}\n"));
        for (label, value) in fields {
            report.push_str(&format!("  {label}: {value}\n"));
        }
    }

    ReportOutput {
        report,
        errors: String::new(),
    }
}

/// Render the node report as CSV with the same fields as the text report.
pub fn nodes_csv(items: &[NodeReportItem]) -> Result<ReportOutput, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let headers: Vec<&str> = items
        .first()
        .map_or_else(default_node_headers, |item| {
            node_fields(item).iter().map(|(label, _)| *label).collect()
        });
    writer.write_record(&headers)?;

    for item in sorted_items(items) {
        let row: Vec<String> = node_fields(item).into_iter().map(|(_, v)| v).collect();
        writer.write_record(&row)?;
    }

    let report = String::from_utf8(writer.into_inner().map_err(std::io::Error::other)?)
        .map_err(std::io::Error::other)?;

    Ok(ReportOutput {
        report,
        errors: String::new(),
    })
}

fn default_node_headers() -> Vec<&'static str> {
    node_fields(&NodeReportItem::default())
        .iter()
        .map(|(label, _)| *label)
        .collect()
}

/// Left-aligned fixed-width table used by the text formatters.
/// Widths are measured in chars, not bytes, so non-ASCII names line up.
fn aligned_table(columns: &[&str], rows: &[Vec<String>]) -> String {
    let width_of = |s: &str| s.chars().count();
    let mut widths: Vec<usize> = columns.iter().map(|c| width_of(c)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if width_of(cell) > widths[i] {
                widths[i] = width_of(cell);
            }
        }
    }

    let render_row = |cells: &[String]| {
        let mut line = String::new();
        for (i, cell) in cells.iter().enumerate() {
            if i + 1 == cells.len() {
                line.push_str(cell);
            } else {
                line.push_str(&format!("{cell:<width$}  ", width = widths[i]));
            }
        }
        line.trim_end().to_string()
    };

    let mut out = String::new();
    let header: Vec<String> = columns.iter().map(ToString::to_string).collect();
    out.push_str(&render_row(&header));
    out.push('\n');
    for row in rows {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder_core::{CookbookFile, CookbookVersion, Offense};

    fn offense(correctable: bool) -> Offense {
        Offense {
            cop_name: "Chef/Style/X".into(),
            message: "msg".into(),
            correctable,
        }
    }

    fn record_with_offenses(name: &str, pairs: &[usize]) -> CookbookRecord {
        let mut record = CookbookRecord::new(name, "1.0.0");
        record.files = pairs
            .iter()
            .enumerate()
            .map(|(i, n)| CookbookFile {
                path: format!("recipes/r{i}.rb"),
                offenses: (0..*n).map(|_| offense(false)).collect(),
            })
            .collect();
        record
    }

    fn csv_data_lines(output: &ReportOutput) -> usize {
        output
            .report
            .lines()
            .skip(1)
            .filter(|l| !l.is_empty())
            .count()
    }

    #[test]
    fn csv_header_without_cookstyle() {
        let records = vec![CookbookRecord::new("foo", "0.1.0")];
        let output = cookbooks_csv(&records, false).unwrap();
        let header = output.report.lines().next().unwrap();
        assert_eq!(
            header,
            "Cookbook Name,Version,Policy Group,Policy,Policy Revision,Nodes"
        );
    }

    #[test]
    fn csv_header_with_cookstyle() {
        let records = vec![CookbookRecord::new("foo", "0.1.0")];
        let output = cookbooks_csv(&records, true).unwrap();
        let header = output.report.lines().next().unwrap();
        assert_eq!(
            header,
            "Cookbook Name,Version,Policy Group,Policy,Policy Revision,\
             File,Offense,Auto-correctable,Message,Nodes"
        );
    }

    #[test]
    fn csv_row_count_matches_file_offense_pairs() {
        let records = vec![
            record_with_offenses("a", &[2, 1]), // 3 pairs
            record_with_offenses("b", &[]),     // 0 pairs
            record_with_offenses("c", &[0, 4]), // 4 pairs (zero-offense file adds none)
        ];

        let with = cookbooks_csv(&records, true).unwrap();
        assert_eq!(csv_data_lines(&with), 7);

        let without = cookbooks_csv(&records, false).unwrap();
        assert_eq!(csv_data_lines(&without), 3);
    }

    #[test]
    fn records_sort_by_name_then_version() {
        let records = vec![
            CookbookRecord::new("zebra", "1.0.0"),
            CookbookRecord::new("apache2", "5.0.1"),
            CookbookRecord::new("apache2", "4.2.0"),
        ];
        let output = cookbooks_csv(&records, false).unwrap();
        let firsts: Vec<&str> = output
            .report
            .lines()
            .skip(1)
            .map(|l| l.split(',').next().unwrap())
            .collect();
        assert_eq!(firsts, vec!["apache2", "apache2", "zebra"]);
        let versions: Vec<&str> = output
            .report
            .lines()
            .skip(1)
            .map(|l| l.split(',').nth(1).unwrap())
            .collect();
        assert_eq!(versions, vec!["4.2.0", "5.0.1", "1.0.0"]);
    }

    #[test]
    fn text_columns_align_with_non_ascii_names() {
        let records = vec![
            CookbookRecord::new("café", "0.1.0"),
            CookbookRecord::new("mysql", "8.0.0"),
        ];
        let output = cookbooks_text(&records, false, None);

        // multi-byte names must not shift later columns
        let char_pos = |line: &str, needle: &str| {
            let byte = line.find(needle).unwrap();
            line[..byte].chars().count()
        };
        // line 0 is the report banner, line 1 the blank separator
        let lines: Vec<&str> = output.report.lines().collect();
        let header = char_pos(lines[2], "Version");
        assert_eq!(char_pos(lines[3], "0.1.0"), header);
        assert_eq!(char_pos(lines[4], "8.0.0"), header);
    }

    #[test]
    fn empty_node_list_renders_none_token() {
        let mut record = CookbookRecord::new("foo", "0.1.0");
        record.nodes = vec![];
        let output = cookbooks_text(&[record], false, None);
        assert!(output.report.contains("none"));
        assert!(output.errors.is_empty());
    }

    #[test]
    fn node_filter_annotates_header_only() {
        let records = vec![CookbookRecord::new("foo", "0.1.0")];
        let filtered = cookbooks_text(&records, false, Some("web1"));
        assert!(filtered
            .report
            .starts_with("-- COOKBOOKS REPORT (node: web1) --"));

        let unfiltered = cookbooks_text(&records, false, None);
        assert!(unfiltered.report.starts_with("-- COOKBOOKS REPORT --"));
        // same rows either way
        assert_eq!(
            filtered.report.lines().count(),
            unfiltered.report.lines().count()
        );
    }

    #[test]
    fn error_text_aggregates_all_slots() {
        let mut record = CookbookRecord::new("foo", "0.1.0");
        record.download_error = Some("connection reset".into());
        record.usage_error = Some("index unavailable".into());
        let output = cookbooks_text(&[record], false, None);

        assert!(output.errors.contains("foo (0.1.0): download error: connection reset"));
        assert!(output
            .errors
            .contains("foo (0.1.0): usage lookup error: index unavailable"));
    }

    #[test]
    fn node_text_renders_none_for_missing_cookbooks() {
        let item = NodeReportItem {
            name: "node3".into(),
            chef_version: Some("15.00".into()),
            os: Some("ubuntu".into()),
            os_version: Some("16.04".into()),
            ..NodeReportItem::default()
        };
        let output = nodes_text(&[item]);

        assert!(output.report.contains("node3"));
        assert!(output.report.contains("  Chef Version: 15.00\n"));
        assert!(output.report.contains("  Operating System: ubuntu\n"));
        assert!(output.report.contains("  Operating System Version: 16.04\n"));
        assert!(output.report.contains("  Policy Group: no group\n"));
        assert!(output.report.contains("  Policy: no policy\n"));
        assert!(output.report.contains("  Cookbooks Applied: none\n"));
    }

    #[test]
    fn node_text_renders_cookbook_pairs_in_order() {
        let item = NodeReportItem {
            name: "node1".into(),
            cookbooks: vec![
                CookbookVersion {
                    name: "zebra".into(),
                    version: "1.0.0".into(),
                },
                CookbookVersion {
                    name: "apache2".into(),
                    version: "5.0.1".into(),
                },
            ],
            ..NodeReportItem::default()
        };
        let output = nodes_text(&[item]);
        assert!(output
            .report
            .contains("Cookbooks Applied: apache2(5.0.1), zebra(1.0.0)"));
    }

    #[test]
    fn nodes_sort_case_sensitively() {
        let items = vec![
            NodeReportItem {
                name: "node1".into(),
                ..NodeReportItem::default()
            },
            NodeReportItem {
                name: "Node2".into(),
                ..NodeReportItem::default()
            },
        ];
        let output = nodes_csv(&items).unwrap();
        let names: Vec<&str> = output
            .report
            .lines()
            .skip(1)
            .map(|l| l.split(',').next().unwrap())
            .collect();
        assert_eq!(names, vec!["Node2", "node1"]);
    }

    #[test]
    fn nodes_csv_header_matches_text_fields() {
        let output = nodes_csv(&[]).unwrap();
        assert_eq!(
            output.report.trim_end(),
            "Node Name,Chef Version,Operating System,Operating System Version,\
             Policy Group,Policy,Policy Revision,Cookbooks Applied"
        );
    }
}
