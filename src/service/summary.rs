use serde::Serialize;

use crate::models::MatchReport;

const WIDTH: usize = 60;

/// 生成可读文本摘要 (纯格式化，结果稳定可做 golden 比对)
pub fn generate_summary(report: &MatchReport) -> String {
    let heavy = "=".repeat(WIDTH);
    let light = "-".repeat(WIDTH);
    let refs = &report.document_refs;
    let summary = &report.match_summary;

    let mut lines = vec![
        heavy.clone(),
        "  3-WAY MATCH REPORT".to_string(),
        heavy.clone(),
        String::new(),
        format!("  PO: {}", refs.po_number),
        format!("  DN: {}", refs.dn_number),
        format!("  INV: {}", refs.inv_number),
        String::new(),
        format!("  Status: {}", summary.status),
        format!("  Total items: {}", summary.total_items),
        format!("  Matched: {} | Mismatched: {}", summary.matched, summary.mismatched),
        String::new(),
        light.clone(),
    ];

    for item in &report.details {
        lines.push(String::new());
        lines.push(format!("  [{}] {} - {}", item.status, item.item_code, item.item_name));
        for (kind, check) in &item.checks {
            let icon = if check.matched { "✓" } else { "✗" };
            lines.push(format!(
                "    {} {}: {} vs {}",
                icon, kind, check.source_a, check.source_b
            ));
            if let Some(note) = &check.note {
                lines.push(format!("      → {}", note));
            }
        }
    }

    lines.push(String::new());
    lines.push(light);
    lines.push(format!("  {}", report.recommendation));
    lines.push(heavy);

    lines.join("\n")
}

/// CSV 导出行: 每个检查项一行
#[derive(Debug, Serialize)]
struct CheckRow<'a> {
    item_code: &'a str,
    item_name: &'a str,
    status: String,
    check: &'static str,
    source_a: &'a str,
    source_b: &'a str,
    #[serde(rename = "match")]
    matched: bool,
    note: Option<&'a str>,
}

/// 导出检查明细为 CSV
pub fn export_csv(report: &MatchReport) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for item in &report.details {
        for (kind, check) in &item.checks {
            writer.serialize(CheckRow {
                item_code: &item.item_code,
                item_name: &item.item_name,
                status: item.status.to_string(),
                check: kind.as_str(),
                source_a: &check.source_a,
                source_b: &check.source_b,
                matched: check.matched,
                note: check.note.as_deref(),
            })?;
        }
    }

    let bytes = writer.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CheckKind, DocumentRefs, FieldCheck, ItemMatchResult};
    use indexmap::IndexMap;

    fn report() -> MatchReport {
        let checks = IndexMap::from([(
            CheckKind::QuantityPoVsDn,
            FieldCheck {
                source_a: "PO (ordered): 10".into(),
                source_b: "DN (delivered): 8".into(),
                matched: false,
                note: Some("Short delivery, verify".into()),
            },
        )]);
        MatchReport::new(
            DocumentRefs {
                po_number: "PO-1".into(),
                dn_number: "DN-1".into(),
                inv_number: "INV-1".into(),
            },
            vec![ItemMatchResult::new("A1", "Widget, large", checks)],
        )
    }

    #[test]
    fn summary_lists_checks_and_notes() {
        let text = generate_summary(&report());
        assert!(text.contains("  Status: MISMATCH DETECTED"));
        assert!(text.contains("  [MISMATCH] A1 - Widget, large"));
        assert!(text.contains("    ✗ quantity_po_vs_dn: PO (ordered): 10 vs DN (delivered): 8"));
        assert!(text.contains("      → Short delivery, verify"));
        assert!(text.ends_with(&"=".repeat(WIDTH)));
    }

    #[test]
    fn csv_has_header_and_one_row_per_check() {
        let csv = export_csv(&report()).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "item_code,item_name,status,check,source_a,source_b,match,note");
        assert_eq!(
            lines[1],
            "A1,\"Widget, large\",MISMATCH,quantity_po_vs_dn,PO (ordered): 10,DN (delivered): 8,false,\"Short delivery, verify\""
        );
        assert_eq!(lines.len(), 2);
    }
}
