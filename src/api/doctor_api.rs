// ==========================================
// CycleWeave LCA - AI 诊断 API
// ==========================================
// 职责: 生成诊断报告、查询报告、应用改进建议
// 红线: 报告生成后不可变, 应用建议只修改源评估记录
// ==========================================

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::load_assessment;
use crate::api::validator::{validate_id, AssessmentValidator};
use crate::config::ConfigManager;
use crate::domain::doctor::{AppliedImprovement, DoctorAnalysis};
use crate::domain::types::ScenarioType;
use crate::engine::clock::Clock;
use crate::engine::metrics::MetricsEngine;
use crate::engine::recommendation::RecommendationEngine;
use crate::repository::{AssessmentRepository, DoctorAnalysisRepository};

pub struct DoctorApi {
    doctor_repo: Arc<DoctorAnalysisRepository>,
    assessment_repo: Arc<AssessmentRepository>,
    config: Arc<ConfigManager>,
    clock: Arc<dyn Clock>,
    metrics: MetricsEngine,
    recommendation: RecommendationEngine,
    validator: AssessmentValidator,
}

impl DoctorApi {
    pub fn new(
        doctor_repo: Arc<DoctorAnalysisRepository>,
        assessment_repo: Arc<AssessmentRepository>,
        config: Arc<ConfigManager>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let metrics = MetricsEngine::new();
        Self {
            doctor_repo,
            assessment_repo,
            config,
            clock,
            metrics,
            recommendation: RecommendationEngine::new(metrics),
            validator: AssessmentValidator::new(),
        }
    }

    /// 对评估记录执行诊断并保存报告
    pub fn analyze(&self, lca_id: &str) -> ApiResult<DoctorAnalysis> {
        let record = load_assessment(&self.assessment_repo, lca_id)?;

        let analysis = DoctorAnalysis {
            id: Uuid::new_v4().to_string(),
            lca_id: record.id.clone(),
            outcome: self.recommendation.analyze(&record),
            created_at: self.clock.now(),
        };
        self.doctor_repo.insert(&analysis)?;

        info!(
            analysis_id = %analysis.id,
            lca_id = %lca_id,
            overall_score = analysis.outcome.overall_score,
            rating = %analysis.outcome.circularity_rating,
            "诊断报告已生成"
        );
        Ok(analysis)
    }

    pub fn get(&self, analysis_id: &str) -> ApiResult<DoctorAnalysis> {
        let analysis_id = validate_id("诊断报告", analysis_id)?;
        self.doctor_repo.find_by_id(analysis_id)?.ok_or_else(|| {
            ApiError::NotFound(format!("DoctorAnalysis(id={})不存在", analysis_id))
        })
    }

    /// 分页查询 (limit 为 None 时取配置 doctor_list_limit)
    pub fn list(&self, skip: u32, limit: Option<u32>) -> ApiResult<Vec<DoctorAnalysis>> {
        let limit = match limit {
            Some(limit) => limit,
            None => self.config.get_doctor_list_limit()?,
        };
        Ok(self.doctor_repo.list(skip, limit)?)
    }

    /// 查询某评估的全部报告 (评估不存在时返回空列表)
    pub fn list_for_assessment(&self, lca_id: &str) -> ApiResult<Vec<DoctorAnalysis>> {
        let lca_id = validate_id("评估", lca_id)?;
        let limit = self.config.get_lca_for_target_limit()?;
        Ok(self.doctor_repo.find_by_lca_id(lca_id, limit)?)
    }

    /// 将报告中的一条改进建议写入源评估记录
    ///
    /// 合并 simulateAction, 情景标记为 Optimized, 并重新计算派生字段
    ///
    /// # 返回
    /// - Err(NotFound): 报告 / 建议 / 源记录不存在
    pub fn apply_improvement(
        &self,
        analysis_id: &str,
        improvement_id: &str,
    ) -> ApiResult<AppliedImprovement> {
        let analysis = self.get(analysis_id)?;
        let improvement = analysis.find_improvement(improvement_id).ok_or_else(|| {
            ApiError::NotFound(format!(
                "ImprovementSuggestion(id={})不存在于报告{}",
                improvement_id, analysis_id
            ))
        })?;

        let mut record = load_assessment(&self.assessment_repo, &analysis.lca_id)?;
        record.apply_patch(&improvement.simulate_action);
        record.scenario_type = ScenarioType::Optimized;
        self.validator.validate_record(&record)?;
        self.metrics.refresh(&mut record);
        record.updated_at = self.clock.now();

        self.assessment_repo.update(&record)?;

        info!(
            analysis_id = %analysis_id,
            improvement_id = %improvement_id,
            lca_id = %record.id,
            co2_emission = record.co2_emission,
            "改进建议已应用"
        );

        Ok(AppliedImprovement {
            message: format!("Applied improvement: {}", improvement.title),
            potential_gain: improvement.potential_gain,
            changes: improvement.simulate_action,
        })
    }
}
