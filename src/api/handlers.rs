use crate::config::AppConfig;
use crate::models::{AuditStats, ConsistencyReport, DocumentRecord};
use crate::service::{export_alerts_to_csv, DossierAuditor};
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

/// 共享状态
#[derive(Clone)]
pub struct AppState {
    pub auditor: Arc<DossierAuditor>,
    pub alert_export_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            auditor: Arc::new(DossierAuditor::new()),
            alert_export_dir: config.export.alert_dir.clone().map(PathBuf::from),
        }
    }
}

/// 请求体: 单票审计 (mode 判别器保持上游网关协议)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRequest {
    pub mode: String,
    #[serde(default)]
    pub dossier_data: Option<Vec<DocumentRecord>>,
}

/// 错误响应体
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// 请求体: 批量审计
#[derive(Debug, Deserialize)]
pub struct BatchAuditRequest {
    pub dossiers: Vec<DossierEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DossierEntry {
    pub dossier_ref: String,
    #[serde(default)]
    pub documents: Vec<DocumentRecord>,
}

/// 批量响应体（含每票统计）
#[derive(Debug, Serialize)]
pub struct BatchAuditResponse {
    pub success: bool,
    pub message: String,
    pub stats: Option<Vec<AuditStats>>,
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 单票审计接口
/// mode == "validate" 时执行一致性审计; 空票返回 null 哨兵, 与"审计通过"区分
pub async fn dossier_audit(
    State(state): State<AppState>,
    Json(req): Json<AuditRequest>,
) -> Response {
    if req.mode != "validate" {
        // 其余 mode 属于已剥离的AI抽取网关, 不在本服务受理
        let response = ErrorResponse {
            error: format!("Unsupported mode: {}", req.mode),
        };
        return (StatusCode::BAD_REQUEST, Json(response)).into_response();
    }

    let records = req.dossier_data.unwrap_or_default();
    match state.auditor.audit(&records) {
        Some(report) => {
            tracing::info!(
                "Dossier audit: {} documents, {} alerts, consistent={}",
                records.len(),
                report.alerts.len(),
                report.is_consistent
            );
            (StatusCode::OK, Json(report)).into_response()
        }
        None => {
            tracing::info!("Dossier audit: no documents, nothing to audit");
            (StatusCode::OK, Json(Value::Null)).into_response()
        }
    }
}

/// 批量审计接口（多票, 返回每票统计信息）
pub async fn batch_audit(
    State(state): State<AppState>,
    Json(req): Json<BatchAuditRequest>,
) -> Response {
    let mut stats = Vec::with_capacity(req.dossiers.len());
    let mut audited: Vec<(String, ConsistencyReport)> = Vec::new();

    for entry in &req.dossiers {
        match state.auditor.audit(&entry.documents) {
            Some(report) => {
                stats.push(AuditStats::from_report(&entry.dossier_ref, &report));
                audited.push((entry.dossier_ref.clone(), report));
            }
            None => {
                tracing::warn!("Dossier {} has no documents, skipping", entry.dossier_ref);
                stats.push(AuditStats::skipped(&entry.dossier_ref));
            }
        }
    }

    // CSV 导出为尽力而为: 失败仅记日志, 不影响响应
    if let Some(dir) = &state.alert_export_dir {
        let path = dir.join(format!(
            "dossier_alerts_{}.csv",
            Utc::now().format("%Y%m%d%H%M%S")
        ));
        if let Err(e) = export_alerts_to_csv(&audited, &path) {
            tracing::error!("Alert CSV export failed: {}", e);
        }
    }

    let total_alerts: usize = stats.iter().map(|s| s.alert_count).sum();
    let inconsistent = stats
        .iter()
        .filter(|s| s.is_consistent == Some(false))
        .count();

    let response = BatchAuditResponse {
        success: true,
        message: format!(
            "Successfully audited {} dossiers, {} alerts, {} inconsistent",
            req.dossiers.len(),
            total_alerts,
            inconsistent
        ),
        stats: Some(stats),
    };
    (StatusCode::OK, Json(response)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audit_request_wire_shape() {
        let req: AuditRequest = serde_json::from_str(
            r#"{"mode":"validate","dossierData":[{"documentType":"invoice","aggregates":{"totalQuantity":5}}]}"#,
        )
        .unwrap();
        assert_eq!(req.mode, "validate");
        let docs = req.dossier_data.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].aggregates.total_quantity, 5.0);
        assert_eq!(docs[0].aggregates.total_value, 0.0);
    }

    #[test]
    fn audit_request_tolerates_absent_or_null_dossier_data() {
        let req: AuditRequest = serde_json::from_str(r#"{"mode":"validate"}"#).unwrap();
        assert!(req.dossier_data.is_none());

        let req: AuditRequest =
            serde_json::from_str(r#"{"mode":"validate","dossierData":null}"#).unwrap();
        assert!(req.dossier_data.is_none());
    }

    #[test]
    fn batch_request_wire_shape() {
        let req: BatchAuditRequest = serde_json::from_str(
            r#"{"dossiers":[{"dossierRef":"SHIP-001","documents":[]},{"dossierRef":"SHIP-002","documents":[{"documentType":"invoice"}]}]}"#,
        )
        .unwrap();
        assert_eq!(req.dossiers.len(), 2);
        assert_eq!(req.dossiers[0].dossier_ref, "SHIP-001");
        assert!(req.dossiers[0].documents.is_empty());
        assert_eq!(req.dossiers[1].documents.len(), 1);
    }
}
