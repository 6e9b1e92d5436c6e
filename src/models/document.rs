use serde::{Deserialize, Serialize};

/// 单证类型 (归一化后的封闭枚举)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Invoice,
    PackingList,
    BillOfLading,
    CertificateOfOrigin,
    Specification,
    Other,
}

impl DocumentKind {
    /// 宽松归一化: 大小写不敏感的子串匹配
    /// 上游分类器措辞不稳定 ("Commercial Invoice" / "tax invoice" / ...), 刻意容错
    pub fn from_label(label: &str) -> Self {
        let normalized = label.to_lowercase();
        if normalized.contains("invoice") {
            Self::Invoice
        } else if normalized.contains("packing") {
            Self::PackingList
        } else if normalized.contains("lading") {
            Self::BillOfLading
        } else if normalized.contains("certificate") || normalized.contains("origin") {
            Self::CertificateOfOrigin
        } else if normalized.contains("specification") {
            Self::Specification
        } else {
            Self::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::PackingList => "packing_list",
            Self::BillOfLading => "bill_of_lading",
            Self::CertificateOfOrigin => "certificate_of_origin",
            Self::Specification => "specification",
            Self::Other => "other",
        }
    }
}

/// 单证汇总数据 - 上游抽取缺失的字段一律回落默认值, 不报错
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAggregates {
    #[serde(default)]
    pub total_quantity: f64,
    #[serde(default)]
    pub total_weight: f64,
    #[serde(default)]
    pub total_value: f64,
    #[serde(default)]
    pub currency: String,
}

/// 单证记录 (上游AI抽取输出, 每次审计请求临时构建, 不落库)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    #[serde(default)]
    pub document_type: String,
    #[serde(default)]
    pub aggregates: DocumentAggregates,
}

impl DocumentRecord {
    pub fn kind(&self) -> DocumentKind {
        DocumentKind::from_label(&self.document_type)
    }
}
