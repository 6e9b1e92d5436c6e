use serde::{Deserialize, Serialize};

/// 告警级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Error,
    Warning,
    Missing,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Missing => "missing",
        }
    }
}

/// 审计告警
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: AlertSeverity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// 汇总信息 - totalValue 仅累计发票类单证
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_value: f64,
    pub currency: String,
    pub document_count: usize,
}

/// 一致性审计报告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyReport {
    pub is_consistent: bool,
    pub alerts: Vec<Alert>,
    pub summary: ReportSummary,
}

/// 单票审计统计 (批量接口返回)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditStats {
    pub dossier_ref: String,
    pub document_count: usize,
    pub alert_count: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub missing_count: usize,
    /// None = 空票, 未执行审计
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_consistent: Option<bool>,
}

impl AuditStats {
    /// 由单票报告构建统计
    pub fn from_report(dossier_ref: &str, report: &ConsistencyReport) -> Self {
        let count_of = |severity: AlertSeverity| {
            report
                .alerts
                .iter()
                .filter(|a| a.severity == severity)
                .count()
        };
        Self {
            dossier_ref: dossier_ref.to_string(),
            document_count: report.summary.document_count,
            alert_count: report.alerts.len(),
            error_count: count_of(AlertSeverity::Error),
            warning_count: count_of(AlertSeverity::Warning),
            missing_count: count_of(AlertSeverity::Missing),
            is_consistent: Some(report.is_consistent),
        }
    }

    /// 空票统计行
    pub fn skipped(dossier_ref: &str) -> Self {
        Self {
            dossier_ref: dossier_ref.to_string(),
            document_count: 0,
            alert_count: 0,
            error_count: 0,
            warning_count: 0,
            missing_count: 0,
            is_consistent: None,
        }
    }
}
