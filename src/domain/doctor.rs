// ==========================================
// CycleWeave LCA - 诊断报告领域模型
// ==========================================
// 职责: DoctorAnalysis 快照、指标对比、改进建议
// 红线: 报告创建后不可变, 采纳建议只修改源评估记录
// ==========================================

use crate::domain::assessment::AssessmentPatch;
use crate::domain::types::{CircularityRating, ImprovementCategory};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// MetricAnalysis - 指标与行业基准对比
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricAnalysis {
    pub value: f64,
    pub benchmark: f64,
    pub is_gap: bool,
}

// ==========================================
// ImprovementSuggestion - 改进建议
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementSuggestion {
    pub id: String,                      // 规则编号 "1".."5"
    pub title: String,
    pub description: String,
    pub potential_gain: f64,             // 启发式收益分, 非实测值
    pub category: ImprovementCategory,
    pub simulate_action: AssessmentPatch, // 仅含该建议会修改的字段
}

// ==========================================
// AnalysisOutcome - 引擎输出 (未绑定存储元数据)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutcome {
    pub overall_score: f64,
    pub carbon_intensity: MetricAnalysis,
    pub energy_efficiency: MetricAnalysis,
    pub circularity_rating: CircularityRating,
    pub improvements: Vec<ImprovementSuggestion>,
    pub risk_factors: Vec<String>,
}

// ==========================================
// DoctorAnalysis - 诊断报告 (持久化快照)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorAnalysis {
    pub id: String,
    pub lca_id: String,
    #[serde(flatten)]
    pub outcome: AnalysisOutcome,
    pub created_at: NaiveDateTime,
}

impl DoctorAnalysis {
    /// 按编号查找改进建议
    pub fn find_improvement(&self, improvement_id: &str) -> Option<&ImprovementSuggestion> {
        self.outcome
            .improvements
            .iter()
            .find(|imp| imp.id == improvement_id)
    }
}

// ==========================================
// AppliedImprovement - 采纳建议的回执
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedImprovement {
    pub message: String,
    pub potential_gain: f64,
    pub changes: AssessmentPatch,
}
