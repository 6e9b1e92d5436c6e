use crate::models::ConsistencyReport;
use chrono::Utc;
use std::path::Path;

/// 将 Option<String> 转换为 CSV 字符串
fn option_to_csv(val: &Option<String>) -> String {
    val.clone().unwrap_or_default()
}

/// 导出批量审计告警到 CSV 文件 (每条告警一行)
pub fn export_alerts_to_csv(
    audits: &[(String, ConsistencyReport)],
    output_path: &Path,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use csv::Writer;
    use std::fs::File;

    let file = File::create(output_path)?;
    let mut writer = Writer::from_writer(file);
    let audited_at = Utc::now();

    writer.write_record(["dossier_ref", "severity", "field", "message", "audited_at"])?;

    for (dossier_ref, report) in audits {
        for alert in &report.alerts {
            writer.write_record(&[
                dossier_ref.clone(),
                alert.severity.as_str().to_string(),
                option_to_csv(&alert.field),
                alert.message.clone(),
                audited_at.to_rfc3339(),
            ])?;
        }
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Alert, AlertSeverity, ReportSummary};
    use tempfile::tempdir;

    fn sample_audits() -> Vec<(String, ConsistencyReport)> {
        vec![(
            "SHIP-001".to_string(),
            ConsistencyReport {
                is_consistent: false,
                alerts: vec![
                    Alert {
                        severity: AlertSeverity::Error,
                        message: "Quantity mismatch: invoice total 500 vs packing list total 480"
                            .to_string(),
                        field: Some("totalQuantity".to_string()),
                    },
                    Alert {
                        severity: AlertSeverity::Missing,
                        message: "Missing Document: Bill of Lading not detected".to_string(),
                        field: None,
                    },
                ],
                summary: ReportSummary {
                    total_value: 10000.0,
                    currency: "USD".to_string(),
                    document_count: 2,
                },
            },
        )]
    }

    #[test]
    fn export_writes_one_row_per_alert() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("alerts.csv");

        export_alerts_to_csv(&sample_audits(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3); // 表头 + 2 条告警
        assert!(lines[0].starts_with("dossier_ref,severity,field,message"));
        assert!(lines[1].contains("SHIP-001"));
        assert!(lines[1].contains("error"));
        assert!(lines[2].contains("missing"));
    }

    #[test]
    fn export_with_no_alerts_writes_header_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        let audits = vec![(
            "SHIP-002".to_string(),
            ConsistencyReport {
                is_consistent: true,
                alerts: vec![],
                summary: ReportSummary {
                    total_value: 0.0,
                    currency: "USD".to_string(),
                    document_count: 3,
                },
            },
        )];
        export_alerts_to_csv(&audits, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
    }
}
