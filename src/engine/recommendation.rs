// ==========================================
// CycleWeave LCA - 诊断推荐引擎 (AI Doctor)
// ==========================================
// 职责: 综合评分、基准对比、改进建议、风险识别
// 输入: AssessmentRecord
// 输出: AnalysisOutcome
// 红线: 阈值/上限/系数均为业务规则, 按原值执行
// ==========================================
// 规则表按声明顺序求值; 所有命中规则均输出后截断到前 5 条
// 建议编号固定为规则位置, 截断后不重新编号
// ==========================================

use crate::domain::assessment::{AssessmentPatch, AssessmentRecord, GridMix};
use crate::domain::doctor::{AnalysisOutcome, ImprovementSuggestion, MetricAnalysis};
use crate::domain::types::{CircularityRating, ImprovementCategory, TransportMode};
use crate::engine::metrics::{round_half_even, round_to, MetricsEngine};
use tracing::debug;

// ===== 行业基准 =====
/// 碳强度基准 (t CO2 / t)
pub const CARBON_BENCHMARK: f64 = 1.8;
/// 能效基准 (%)
pub const EFFICIENCY_BENCHMARK: f64 = 85.0;

pub const MAX_IMPROVEMENTS: usize = 5;
pub const MAX_RISK_FACTORS: usize = 5;

// ==========================================
// ImprovementRule - 改进规则 (谓词 + 补丁构造)
// ==========================================
struct ImprovementRule {
    id: &'static str,
    title: &'static str,
    category: ImprovementCategory,
    potential_gain: f64,
    applies: fn(&AssessmentRecord) -> bool,
    describe: fn(&AssessmentRecord) -> String,
    patch: fn(&AssessmentRecord) -> AssessmentPatch,
}

impl ImprovementRule {
    fn build(&self, record: &AssessmentRecord) -> ImprovementSuggestion {
        ImprovementSuggestion {
            id: self.id.to_string(),
            title: self.title.to_string(),
            description: (self.describe)(record),
            potential_gain: self.potential_gain,
            category: self.category,
            simulate_action: (self.patch)(record),
        }
    }
}

// ----- 规则 1: 电网结构 -----
fn coal_shift_amount(record: &AssessmentRecord) -> f64 {
    (record.grid_mix.coal - 20.0).min(15.0)
}

fn coal_shift_patch(record: &AssessmentRecord) -> AssessmentPatch {
    let shift = coal_shift_amount(record);
    AssessmentPatch {
        grid_mix: Some(GridMix {
            coal: record.grid_mix.coal - shift,
            solar: record.grid_mix.solar + shift,
            ..record.grid_mix
        }),
        ..Default::default()
    }
}

// ----- 规则 4: 废料输入 -----
fn scrap_target_rate(record: &AssessmentRecord) -> f64 {
    (record.scrap_input_rate + 20.0).min(65.0)
}

const IMPROVEMENT_RULES: [ImprovementRule; 5] = [
    ImprovementRule {
        id: "1",
        title: "Increase Solar in Grid Mix",
        category: ImprovementCategory::Energy,
        potential_gain: 12.0,
        applies: |r| r.grid_mix.coal > 20.0,
        describe: |r| {
            format!(
                "Shifting {}% of coal to solar would reduce carbon intensity by ~12%.",
                coal_shift_amount(r)
            )
        },
        patch: coal_shift_patch,
    },
    ImprovementRule {
        id: "2",
        title: "Switch to Rail Transport",
        category: ImprovementCategory::Transport,
        potential_gain: 8.0,
        applies: |r| r.transport_mode == TransportMode::Road,
        describe: |_| {
            "Rail transport for inbound logistics would cut transport emissions by 60%.".to_string()
        },
        patch: |_| AssessmentPatch {
            transport_mode: Some(TransportMode::Rail),
            vehicle_efficiency: Some(0.04),
            ..Default::default()
        },
    },
    ImprovementRule {
        id: "3",
        title: "Optimize Furnace Temperature",
        category: ImprovementCategory::Process,
        potential_gain: 5.0,
        applies: |r| r.temperature > 1100.0,
        describe: |_| {
            "Reducing operating temperature by 100°C maintains quality while saving energy."
                .to_string()
        },
        patch: |r| AssessmentPatch {
            temperature: Some(r.temperature - 100.0),
            ..Default::default()
        },
    },
    ImprovementRule {
        id: "4",
        title: "Increase Scrap Input Rate",
        category: ImprovementCategory::Circularity,
        potential_gain: 15.0,
        applies: |r| r.scrap_input_rate < 60.0,
        describe: |r| {
            format!(
                "Boosting recycled content to {}% significantly improves circularity score.",
                scrap_target_rate(r)
            )
        },
        patch: |r| AssessmentPatch {
            scrap_input_rate: Some(scrap_target_rate(r)),
            ..Default::default()
        },
    },
    ImprovementRule {
        id: "5",
        title: "Implement Closed-Loop Recovery",
        category: ImprovementCategory::Circularity,
        potential_gain: 10.0,
        applies: |r| r.closed_loop_rate < 70.0,
        describe: |_| {
            "Establishing closed-loop partnerships could achieve 80% material return rate."
                .to_string()
        },
        patch: |_| AssessmentPatch {
            closed_loop_rate: Some(80.0),
            ..Default::default()
        },
    },
];

// ==========================================
// RiskRule - 风险规则
// ==========================================
struct RiskRule {
    applies: fn(&AssessmentRecord) -> bool,
    message: fn(&AssessmentRecord) -> String,
}

const RISK_RULES: [RiskRule; 5] = [
    RiskRule {
        applies: |r| r.grid_mix.coal > 30.0,
        message: |_| "High coal dependency in energy mix".to_string(),
    },
    RiskRule {
        applies: |r| r.transport_mode == TransportMode::Road && r.total_distance() > 300.0,
        message: |r| {
            format!(
                "Road transport over {}km contributes significantly to emissions",
                r.total_distance()
            )
        },
    },
    RiskRule {
        applies: |r| r.scrap_input_rate < 40.0,
        message: |_| "Below industry benchmark for recycled content".to_string(),
    },
    RiskRule {
        applies: |r| r.water_usage > 25.0,
        message: |_| "High water consumption may face regulatory scrutiny".to_string(),
    },
    RiskRule {
        applies: |r| r.temperature > 1500.0,
        message: |_| "High furnace temperature increases energy costs".to_string(),
    },
];

// ==========================================
// RecommendationEngine - 诊断推荐引擎
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationEngine {
    metrics: MetricsEngine,
}

impl RecommendationEngine {
    pub fn new(metrics: MetricsEngine) -> Self {
        Self { metrics }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 执行诊断
    ///
    /// 评分构成:
    /// - 碳评分 = max(0, 100 - 碳强度/1.8 × 30), 使用未取整的碳强度
    /// - 循环度 × 0.4
    /// - 能效估计/100 × 30, 能效估计 = min(95, 85 + 炉渣回收率 × 0.1)
    /// - 合计取整后限制在 [0, 100]
    pub fn analyze(&self, record: &AssessmentRecord) -> AnalysisOutcome {
        let co2_emission = self.metrics.compute_emissions(record);
        let circularity_score = self.metrics.compute_circularity(record);

        let carbon_intensity = co2_emission / 1000.0;
        let carbon_score = (100.0 - (carbon_intensity / CARBON_BENCHMARK * 30.0)).max(0.0);
        let circularity_weight = circularity_score * 0.4;
        let efficiency_estimate = (85.0 + record.slag_recovery * 0.1).min(95.0);
        let efficiency_score = (efficiency_estimate / 100.0) * 30.0;

        let overall_score =
            round_half_even(carbon_score + circularity_weight + efficiency_score).clamp(0.0, 100.0);

        let improvements = self.generate_improvements(record);
        let risk_factors = self.identify_risks(record);

        debug!(
            lca_id = %record.id,
            overall_score,
            improvements = improvements.len(),
            risks = risk_factors.len(),
            "诊断完成"
        );

        AnalysisOutcome {
            overall_score,
            carbon_intensity: MetricAnalysis {
                value: round_to(carbon_intensity, 2),
                benchmark: CARBON_BENCHMARK,
                is_gap: carbon_intensity > CARBON_BENCHMARK,
            },
            energy_efficiency: MetricAnalysis {
                value: round_half_even(efficiency_estimate),
                benchmark: EFFICIENCY_BENCHMARK,
                is_gap: efficiency_estimate < EFFICIENCY_BENCHMARK,
            },
            circularity_rating: Self::circularity_rating(circularity_score),
            improvements,
            risk_factors,
        }
    }

    /// 生成改进建议 (最多 5 条, 按规则声明顺序)
    pub fn generate_improvements(&self, record: &AssessmentRecord) -> Vec<ImprovementSuggestion> {
        IMPROVEMENT_RULES
            .iter()
            .filter(|rule| (rule.applies)(record))
            .map(|rule| rule.build(record))
            .take(MAX_IMPROVEMENTS)
            .collect()
    }

    /// 识别风险因素 (最多 5 条, 固定顺序)
    pub fn identify_risks(&self, record: &AssessmentRecord) -> Vec<String> {
        RISK_RULES
            .iter()
            .filter(|rule| (rule.applies)(record))
            .map(|rule| (rule.message)(record))
            .take(MAX_RISK_FACTORS)
            .collect()
    }

    /// 循环度评价 (>=70 Good / >=50 Moderate)
    pub fn circularity_rating(score: f64) -> CircularityRating {
        if score >= 70.0 {
            CircularityRating::Good
        } else if score >= 50.0 {
            CircularityRating::Moderate
        } else {
            CircularityRating::NeedsImprovement
        }
    }
}
