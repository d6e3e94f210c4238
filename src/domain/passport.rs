// ==========================================
// CycleWeave LCA - 材料护照领域模型
// ==========================================
// 职责: 护照快照、溯源时间线
// 红线: 等级在生成时冻结, 之后不随评估记录变化
// ==========================================

use crate::domain::assessment::AssessmentRecord;
use crate::domain::doctor::DoctorAnalysis;
use crate::domain::types::{GradeLetter, MetalType, ScenarioType, TransportMode};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// ProvenanceEvent - 溯源事件
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenanceEvent {
    pub timestamp: String, // "%Y-%m-%d %H:%M"
    pub event: String,
    pub location: String,
    pub verified: bool,
}

// ==========================================
// PassportDraft - 组装器输出 (未绑定存储元数据)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassportDraft {
    pub passport_id: String,
    pub doctor_analysis_id: Option<String>,

    // ===== 指标副本 =====
    pub metal_type: MetalType,
    pub co2_emission: f64,
    pub circularity_score: f64,
    pub scrap_input_rate: f64,
    pub total_distance: f64,
    pub transport_mode: TransportMode,
    pub scenario_type: ScenarioType,

    // ===== 等级 =====
    pub grade: GradeLetter,
    pub grade_label: String,

    pub provenance: Vec<ProvenanceEvent>,
    pub certifications: Vec<String>,

    // ===== 二维码 =====
    pub qr_url: String,
    /// base64 PNG, 由注入的 QrRenderer 生成
    ///
    /// 默认渲染器 NoOpQrRenderer 不产出图片, 此时为空串; 渲染失败时同样为空串
    pub qr_code: String,

    pub generated_at: NaiveDateTime,
}

// ==========================================
// MaterialPassport - 材料护照 (持久化快照)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialPassport {
    pub id: String,
    pub lca_id: String,
    #[serde(flatten)]
    pub draft: PassportDraft,
}

// ==========================================
// FullPassport - 护照 + 关联记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullPassport {
    #[serde(flatten)]
    pub passport: MaterialPassport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lca_data: Option<AssessmentRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_analysis: Option<DoctorAnalysis>,
}
