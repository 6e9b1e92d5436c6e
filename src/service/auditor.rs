use crate::models::{
    Alert, AlertSeverity, ConsistencyReport, DocumentAggregates, DocumentKind, DocumentRecord,
    ReportSummary,
};
use indexmap::IndexMap;

/// 数量容差 (单位: 件)
pub const QUANTITY_TOLERANCE: f64 = 0.01;
/// 重量容差 (单位: kg)
pub const WEIGHT_TOLERANCE_KG: f64 = 0.5;

/// 审计服务 - 核对一票货的单证是否相互一致、是否齐全
/// 纯计算, 无状态, 任何输入形态下都不会失败
pub struct DossierAuditor;

impl DossierAuditor {
    pub fn new() -> Self {
        Self
    }

    /// 审计入口
    /// 空输入返回 None ("尚无单证" 与 "单证一致" 必须可区分)
    pub fn audit(&self, records: &[DocumentRecord]) -> Option<ConsistencyReport> {
        if records.is_empty() {
            return None;
        }

        // Phase 1: 按单证类型分组 (保序)
        let groups = partition_by_kind(records);
        let invoices = kind_group(&groups, DocumentKind::Invoice);
        let packing_lists = kind_group(&groups, DocumentKind::PackingList);
        let bills_of_lading = kind_group(&groups, DocumentKind::BillOfLading);

        // Phase 2: 按固定顺序执行检查 - 数量、重量、齐全性
        // 告警顺序即展示顺序, 与输入顺序无关
        let alerts: Vec<Alert> = check_quantity(invoices, packing_lists)
            .into_iter()
            .chain(check_weight(packing_lists, bills_of_lading))
            .chain(completeness_alerts(
                invoices,
                packing_lists,
                bills_of_lading,
            ))
            .collect();

        // 仅数量不符 (error) 判定为不一致; 重量告警和缺单不翻转
        let is_consistent = !alerts.iter().any(|a| a.severity == AlertSeverity::Error);

        Some(ConsistencyReport {
            is_consistent,
            alerts,
            summary: summarize(records, invoices),
        })
    }
}

impl Default for DossierAuditor {
    fn default() -> Self {
        Self::new()
    }
}

/// 分组 (IndexMap 保首见顺序)
fn partition_by_kind(records: &[DocumentRecord]) -> IndexMap<DocumentKind, Vec<&DocumentRecord>> {
    let mut groups: IndexMap<DocumentKind, Vec<&DocumentRecord>> = IndexMap::new();
    for record in records {
        groups.entry(record.kind()).or_default().push(record);
    }
    groups
}

fn kind_group<'a>(
    groups: &'a IndexMap<DocumentKind, Vec<&'a DocumentRecord>>,
    kind: DocumentKind,
) -> &'a [&'a DocumentRecord] {
    groups.get(&kind).map(Vec::as_slice).unwrap_or(&[])
}

fn sum_by<F>(group: &[&DocumentRecord], f: F) -> f64
where
    F: Fn(&DocumentAggregates) -> f64,
{
    group.iter().map(|record| f(&record.aggregates)).sum()
}

/// 数量核对: 发票 vs 装箱单, 双方都有单证才执行
fn check_quantity(invoices: &[&DocumentRecord], packing_lists: &[&DocumentRecord]) -> Option<Alert> {
    if invoices.is_empty() || packing_lists.is_empty() {
        return None;
    }

    let invoice_qty = sum_by(invoices, |a| a.total_quantity);
    let packing_qty = sum_by(packing_lists, |a| a.total_quantity);

    if (invoice_qty - packing_qty).abs() > QUANTITY_TOLERANCE {
        return Some(Alert {
            severity: AlertSeverity::Error,
            message: format!(
                "Quantity mismatch: invoice total {} vs packing list total {}",
                invoice_qty, packing_qty
            ),
            field: Some("totalQuantity".to_string()),
        });
    }
    None
}

/// 重量核对: 装箱单 vs 提单, 仅告警不判定不一致
fn check_weight(
    packing_lists: &[&DocumentRecord],
    bills_of_lading: &[&DocumentRecord],
) -> Option<Alert> {
    if packing_lists.is_empty() || bills_of_lading.is_empty() {
        return None;
    }

    let packing_weight = sum_by(packing_lists, |a| a.total_weight);
    let lading_weight = sum_by(bills_of_lading, |a| a.total_weight);

    if (packing_weight - lading_weight).abs() > WEIGHT_TOLERANCE_KG {
        return Some(Alert {
            severity: AlertSeverity::Warning,
            message: format!(
                "Weight mismatch: packing list total {} kg vs bill of lading total {} kg",
                packing_weight, lading_weight
            ),
            field: Some("totalWeight".to_string()),
        });
    }
    None
}

/// 齐全性核对: 三类必备单证, 每类一条固定话术
fn completeness_alerts(
    invoices: &[&DocumentRecord],
    packing_lists: &[&DocumentRecord],
    bills_of_lading: &[&DocumentRecord],
) -> Vec<Alert> {
    let checks = [
        (
            invoices.is_empty(),
            "Missing Document: Commercial Invoice is required",
        ),
        (
            packing_lists.is_empty(),
            "Missing Document: Packing List is recommended",
        ),
        (
            bills_of_lading.is_empty(),
            "Missing Document: Bill of Lading not detected",
        ),
    ];

    checks
        .into_iter()
        .filter(|(absent, _)| *absent)
        .map(|(_, message)| Alert {
            severity: AlertSeverity::Missing,
            message: message.to_string(),
            field: None,
        })
        .collect()
}

/// 汇总: 金额只信发票; 币种取首张发票, 无发票或为空时回落 USD
fn summarize(records: &[DocumentRecord], invoices: &[&DocumentRecord]) -> ReportSummary {
    let total_value = sum_by(invoices, |a| a.total_value);
    let currency = invoices
        .first()
        .map(|record| record.aggregates.currency.as_str())
        .filter(|c| !c.is_empty())
        .unwrap_or("USD")
        .to_string();

    ReportSummary {
        total_value,
        currency,
        document_count: records.len(),
    }
}
