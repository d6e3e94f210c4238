// ==========================================
// CycleWeave LCA - 情景模拟服务
// ==========================================
// 职责: 将补丁合并到记录副本上重算指标, 返回前后对比
// 红线: 只在内存中计算, 不落库
// ==========================================

use crate::domain::assessment::{AssessmentPatch, AssessmentRecord};
use crate::engine::metrics::MetricsEngine;
use serde::{Deserialize, Serialize};

/// 一组派生指标
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricPair {
    pub co2_emission: f64,
    pub circularity_score: f64,
}

/// 模拟结果
///
/// difference 均以正值表示改善:
/// - co2Emission = 原值 - 模拟值
/// - circularityScore = 模拟值 - 原值
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub original: MetricPair,
    pub simulated: MetricPair,
    pub difference: MetricPair,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SimulationService {
    metrics: MetricsEngine,
}

impl SimulationService {
    pub fn new(metrics: MetricsEngine) -> Self {
        Self { metrics }
    }

    /// 合并后的记录视图 (派生字段已重算)
    pub fn merged_view(&self, record: &AssessmentRecord, patch: &AssessmentPatch) -> AssessmentRecord {
        let mut merged = record.clone();
        merged.apply_patch(patch);
        self.metrics.refresh(&mut merged);
        merged
    }

    pub fn simulate(&self, record: &AssessmentRecord, patch: &AssessmentPatch) -> SimulationResult {
        let merged = self.merged_view(record, patch);
        self.compare(record, &merged)
    }

    /// 对比原记录与合并视图的指标
    ///
    /// 原值同样经 MetricsEngine 重算, 与存量派生字段保持同一口径
    pub fn compare(&self, record: &AssessmentRecord, merged: &AssessmentRecord) -> SimulationResult {
        let original = MetricPair {
            co2_emission: self.metrics.compute_emissions(record),
            circularity_score: self.metrics.compute_circularity(record),
        };
        let simulated = MetricPair {
            co2_emission: merged.co2_emission,
            circularity_score: merged.circularity_score,
        };

        SimulationResult {
            original,
            simulated,
            difference: MetricPair {
                co2_emission: original.co2_emission - simulated.co2_emission,
                circularity_score: simulated.circularity_score - original.circularity_score,
            },
        }
    }
}
