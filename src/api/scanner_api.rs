// ==========================================
// CycleWeave LCA - 废料扫描 API
// ==========================================
// 职责: 废料识别 (模拟)、结果查询、将扫描结果应用到评估记录
// ==========================================

use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{validate_id, AssessmentValidator};
use crate::api::{load_assessment, lock_rng, SharedRng};
use crate::config::ConfigManager;
use crate::domain::assessment::AssessmentPatch;
use crate::domain::scan::{AppliedScan, ScanOutcome, ScanResult};
use crate::domain::types::FurnaceType;
use crate::engine::clock::Clock;
use crate::engine::metrics::{round_half_even, MetricsEngine};
use crate::engine::scanner::ScrapClassifierMock;
use crate::repository::{AssessmentRepository, ScanResultRepository};

/// 回收效率上限 (%)
const MAX_RECYCLING_EFFICIENCY: f64 = 95.0;

/// 由扫描结果推导评估字段更新
///
/// - scrapInputRate = round(purity)
/// - recyclingEfficiency = min(95, round(purity × 0.95))
/// - 推荐工艺含 "Electric" 时切换为电弧炉
pub fn scan_updates(outcome: &ScanOutcome) -> AssessmentPatch {
    AssessmentPatch {
        scrap_input_rate: Some(round_half_even(outcome.purity)),
        recycling_efficiency: Some(
            round_half_even(outcome.purity * 0.95).min(MAX_RECYCLING_EFFICIENCY),
        ),
        furnace_type: outcome
            .recommended_process
            .contains("Electric")
            .then_some(FurnaceType::ElectricArc),
        ..AssessmentPatch::default()
    }
}

pub struct ScannerApi {
    scan_repo: Arc<ScanResultRepository>,
    assessment_repo: Arc<AssessmentRepository>,
    config: Arc<ConfigManager>,
    clock: Arc<dyn Clock>,
    classifier: ScrapClassifierMock,
    metrics: MetricsEngine,
    validator: AssessmentValidator,
    rng: SharedRng,
}

impl ScannerApi {
    pub fn new(
        scan_repo: Arc<ScanResultRepository>,
        assessment_repo: Arc<AssessmentRepository>,
        config: Arc<ConfigManager>,
        clock: Arc<dyn Clock>,
        rng: SharedRng,
    ) -> Self {
        Self {
            scan_repo,
            assessment_repo,
            config,
            clock,
            classifier: ScrapClassifierMock::new(),
            metrics: MetricsEngine::new(),
            validator: AssessmentValidator::new(),
            rng,
        }
    }

    // ==========================================
    // 识别接口
    // ==========================================

    /// 识别 base64 图像 (图像内容不参与计算)
    pub fn analyze(&self, image_base64: Option<&str>) -> ApiResult<ScanResult> {
        self.classify_and_store(image_base64, None)
    }

    /// 识别上传文件
    ///
    /// # 返回
    /// - Err(InvalidInput): 文件名为空或文件内容为空
    pub fn upload(&self, filename: &str, bytes: &[u8]) -> ApiResult<ScanResult> {
        let filename = filename.trim();
        if filename.is_empty() {
            return Err(ApiError::InvalidInput("文件名不能为空".to_string()));
        }
        if bytes.is_empty() {
            return Err(ApiError::InvalidInput(format!("文件{}内容为空", filename)));
        }

        debug!(filename = %filename, size = bytes.len(), "收到扫描文件");
        self.classify_and_store(None, Some(filename.to_string()))
    }

    fn classify_and_store(
        &self,
        image_data: Option<&str>,
        filename: Option<String>,
    ) -> ApiResult<ScanResult> {
        let outcome = {
            let mut rng = lock_rng(&self.rng)?;
            self.classifier.classify(&mut *rng, image_data)
        };

        let scan = ScanResult {
            id: Uuid::new_v4().to_string(),
            outcome,
            filename,
            lca_id: None,
            created_at: self.clock.now(),
        };
        self.scan_repo.insert(&scan)?;

        info!(
            scan_id = %scan.id,
            scrap_type = %scan.outcome.scrap_type,
            purity = scan.outcome.purity,
            "扫描结果已保存"
        );
        Ok(scan)
    }

    // ==========================================
    // 查询接口
    // ==========================================

    pub fn get(&self, scan_id: &str) -> ApiResult<ScanResult> {
        let scan_id = validate_id("扫描结果", scan_id)?;
        self.scan_repo
            .find_by_id(scan_id)?
            .ok_or_else(|| ApiError::NotFound(format!("ScanResult(id={})不存在", scan_id)))
    }

    /// 分页查询 (limit 为 None 时取配置 scan_list_limit)
    pub fn list(&self, skip: u32, limit: Option<u32>) -> ApiResult<Vec<ScanResult>> {
        let limit = match limit {
            Some(limit) => limit,
            None => self.config.get_scan_list_limit()?,
        };
        Ok(self.scan_repo.list(skip, limit)?)
    }

    // ==========================================
    // 应用到评估
    // ==========================================

    /// 将扫描结果写入评估记录, 并把扫描关联到该评估
    pub fn apply_to_assessment(&self, scan_id: &str, lca_id: &str) -> ApiResult<AppliedScan> {
        let scan = self.get(scan_id)?;
        let mut record = load_assessment(&self.assessment_repo, lca_id)?;

        let updates = scan_updates(&scan.outcome);
        record.apply_patch(&updates);
        self.validator.validate_record(&record)?;
        self.metrics.refresh(&mut record);
        record.updated_at = self.clock.now();

        self.assessment_repo.update(&record)?;
        self.scan_repo.link_to_assessment(&scan, &record.id)?;

        info!(
            scan_id = %scan.id,
            lca_id = %record.id,
            scrap_input_rate = record.scrap_input_rate,
            circularity_score = record.circularity_score,
            "扫描结果已应用到评估"
        );

        Ok(AppliedScan {
            message: "Scan applied to LCA successfully".to_string(),
            updates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(purity: f64, process: &str) -> ScanOutcome {
        ScanOutcome {
            scrap_type: "Test Scrap".to_string(),
            purity,
            estimated_weight: 1000.0,
            co2_saved: 600.0,
            revenue_estimate: 1500.0,
            recommended_process: process.to_string(),
        }
    }

    #[test]
    fn test_scan_updates_electric_process() {
        let updates = scan_updates(&outcome(92.5, "Electric Arc Furnace"));
        // 92.5 四舍六入五成双 -> 92; 92.5 × 0.95 = 87.875 -> 88
        assert_eq!(updates.scrap_input_rate, Some(92.0));
        assert_eq!(updates.recycling_efficiency, Some(88.0));
        assert_eq!(updates.furnace_type, Some(FurnaceType::ElectricArc));
        assert_eq!(updates.temperature, None);
    }

    #[test]
    fn test_scan_updates_keeps_furnace_for_induction() {
        // 99 × 0.95 = 94.05 -> 94, 未触及上限
        let updates = scan_updates(&outcome(99.0, "Induction Furnace"));
        assert_eq!(updates.scrap_input_rate, Some(99.0));
        assert_eq!(updates.recycling_efficiency, Some(94.0));
        assert_eq!(updates.furnace_type, None);
    }

    #[test]
    fn test_scan_updates_caps_efficiency_at_ninety_five() {
        // 100 × 0.95 = 95, 上限 95; 99.9 × 0.95 = 94.905 -> 95
        let updates = scan_updates(&outcome(100.0, "Electric Arc Furnace"));
        assert_eq!(updates.scrap_input_rate, Some(100.0));
        assert_eq!(updates.recycling_efficiency, Some(MAX_RECYCLING_EFFICIENCY));

        let updates = scan_updates(&outcome(99.9, "Electric Arc Furnace"));
        assert_eq!(updates.scrap_input_rate, Some(100.0));
        assert_eq!(updates.recycling_efficiency, Some(95.0));
    }
}
