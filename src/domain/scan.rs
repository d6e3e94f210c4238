// ==========================================
// CycleWeave LCA - 废料扫描领域模型
// ==========================================
// 职责: 废料类型画像、扫描结果
// ==========================================

use crate::domain::assessment::AssessmentPatch;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// ScrapProfile - 废料类型画像 (静态目录)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrapProfile {
    pub scrap_type: &'static str,
    pub purity_range: (f64, f64), // %
    pub weight_range: (f64, f64), // kg
    pub co2_factor: f64,          // kg CO2 节省 / kg
    pub revenue_per_kg: f64,      // USD / kg
    pub process: &'static str,
}

// ==========================================
// ScanOutcome - 识别器输出 (未绑定存储元数据)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanOutcome {
    pub scrap_type: String,
    pub purity: f64,
    pub estimated_weight: f64,
    pub co2_saved: f64,
    pub revenue_estimate: f64,
    pub recommended_process: String,
}

// ==========================================
// ScanResult - 扫描结果 (持久化快照)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub id: String,
    #[serde(flatten)]
    pub outcome: ScanOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub lca_id: Option<String>, // 应用到评估后回填
    pub created_at: NaiveDateTime,
}

// ==========================================
// AppliedScan - 扫描结果应用回执
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedScan {
    pub message: String,
    pub updates: AssessmentPatch,
}
