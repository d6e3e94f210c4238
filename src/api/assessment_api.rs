// ==========================================
// CycleWeave LCA - 评估记录 API
// ==========================================
// 职责: 评估记录增删改查、情景模拟
// 约束: 派生字段 (co2Emission / circularityScore) 只由 MetricsEngine 写入
// ==========================================

use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{validate_id, AssessmentValidator};
use crate::api::load_assessment;
use crate::config::ConfigManager;
use crate::domain::assessment::{AssessmentInput, AssessmentPatch, AssessmentRecord};
use crate::engine::clock::Clock;
use crate::engine::metrics::MetricsEngine;
use crate::engine::simulation::{SimulationResult, SimulationService};
use crate::repository::AssessmentRepository;

// ==========================================
// AssessmentApi - 评估记录 API
// ==========================================
pub struct AssessmentApi {
    assessment_repo: Arc<AssessmentRepository>,
    config: Arc<ConfigManager>,
    clock: Arc<dyn Clock>,
    metrics: MetricsEngine,
    simulation: SimulationService,
    validator: AssessmentValidator,
}

impl AssessmentApi {
    /// 创建新的AssessmentApi实例
    ///
    /// # 参数
    /// - assessment_repo: 评估记录仓储
    /// - config: 配置管理器 (列表上限)
    /// - clock: 时间源
    pub fn new(
        assessment_repo: Arc<AssessmentRepository>,
        config: Arc<ConfigManager>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let metrics = MetricsEngine::new();
        Self {
            assessment_repo,
            config,
            clock,
            metrics,
            simulation: SimulationService::new(metrics),
            validator: AssessmentValidator::new(),
        }
    }

    // ==========================================
    // 写入接口
    // ==========================================

    /// 创建评估记录
    ///
    /// # 返回
    /// - Ok(AssessmentRecord): 已计算派生字段的记录
    /// - Err(ValidationError): 字段越界
    pub fn create(&self, input: AssessmentInput) -> ApiResult<AssessmentRecord> {
        let now = self.clock.now();
        let mut record = AssessmentRecord::from_input(Uuid::new_v4().to_string(), input, now);
        self.validator.validate_record(&record)?;
        self.metrics.refresh(&mut record);

        self.assessment_repo.insert(&record)?;

        info!(
            lca_id = %record.id,
            metal_type = %record.metal_type,
            co2_emission = record.co2_emission,
            circularity_score = record.circularity_score,
            "评估记录已创建"
        );
        Ok(record)
    }

    /// 部分更新评估记录
    ///
    /// 空补丁直接返回原记录, 不修改 updatedAt
    pub fn update(&self, lca_id: &str, patch: &AssessmentPatch) -> ApiResult<AssessmentRecord> {
        let mut record = load_assessment(&self.assessment_repo, lca_id)?;
        if patch.is_empty() {
            debug!(lca_id = %lca_id, "空补丁, 跳过更新");
            return Ok(record);
        }

        record.apply_patch(patch);
        self.validator.validate_record(&record)?;
        self.metrics.refresh(&mut record);
        record.updated_at = self.clock.now();

        self.assessment_repo.update(&record)?;

        info!(
            lca_id = %lca_id,
            co2_emission = record.co2_emission,
            circularity_score = record.circularity_score,
            "评估记录已更新"
        );
        Ok(record)
    }

    /// 删除评估记录 (物理删除, 关联报告/护照保留)
    pub fn delete(&self, lca_id: &str) -> ApiResult<()> {
        let lca_id = validate_id("评估", lca_id)?;
        let rows = self.assessment_repo.delete(lca_id)?;
        if rows == 0 {
            return Err(ApiError::NotFound(format!(
                "AssessmentRecord(id={})不存在",
                lca_id
            )));
        }

        info!(lca_id = %lca_id, "评估记录已删除");
        Ok(())
    }

    // ==========================================
    // 查询接口
    // ==========================================

    pub fn get(&self, lca_id: &str) -> ApiResult<AssessmentRecord> {
        load_assessment(&self.assessment_repo, lca_id)
    }

    /// 分页查询 (按创建时间倒序)
    ///
    /// # 参数
    /// - skip: 偏移量
    /// - limit: 返回数量上限, None 时取配置 lca_list_limit
    pub fn list(&self, skip: u32, limit: Option<u32>) -> ApiResult<Vec<AssessmentRecord>> {
        let limit = match limit {
            Some(limit) => limit,
            None => self.config.get_lca_list_limit()?,
        };
        Ok(self.assessment_repo.list(skip, limit)?)
    }

    // ==========================================
    // 情景模拟
    // ==========================================

    /// 模拟补丁生效后的指标变化 (不落库)
    ///
    /// 合并视图越界时返回 ValidationError
    pub fn simulate(&self, lca_id: &str, patch: &AssessmentPatch) -> ApiResult<SimulationResult> {
        let record = load_assessment(&self.assessment_repo, lca_id)?;
        let merged = self.simulation.merged_view(&record, patch);
        self.validator.validate_record(&merged)?;

        let result = self.simulation.compare(&record, &merged);
        debug!(
            lca_id = %lca_id,
            co2_delta = result.difference.co2_emission,
            circularity_delta = result.difference.circularity_score,
            "情景模拟完成"
        );
        Ok(result)
    }
}
