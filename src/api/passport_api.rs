// ==========================================
// CycleWeave LCA - 材料护照 API
// ==========================================
// 职责: 生成、查询、删除材料护照
// 查询键: 存储ID (UUID) 或护照编号 (CW-...)
// ==========================================

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::validate_id;
use crate::api::{load_assessment, lock_rng, SharedRng};
use crate::config::ConfigManager;
use crate::domain::passport::{FullPassport, MaterialPassport};
use crate::engine::metrics::MetricsEngine;
use crate::engine::passport::PassportAssembler;
use crate::repository::{
    AssessmentRepository, DoctorAnalysisRepository, PassportKey, PassportRepository,
};

/// 解析查询键: 可解析为 UUID 视为存储ID, 否则视为护照编号
fn passport_key(id_or_passport_id: &str) -> PassportKey<'_> {
    let key = id_or_passport_id.trim();
    if Uuid::parse_str(key).is_ok() {
        PassportKey::Id(key)
    } else {
        PassportKey::PassportId(key)
    }
}

pub struct PassportApi {
    passport_repo: Arc<PassportRepository>,
    assessment_repo: Arc<AssessmentRepository>,
    doctor_repo: Arc<DoctorAnalysisRepository>,
    config: Arc<ConfigManager>,
    assembler: PassportAssembler,
    metrics: MetricsEngine,
    rng: SharedRng,
}

impl PassportApi {
    /// 创建新的PassportApi实例
    ///
    /// # 参数
    /// - assembler: 已注入时间源与二维码渲染器的组装器
    /// - rng: 护照编号后缀使用的随机源
    pub fn new(
        passport_repo: Arc<PassportRepository>,
        assessment_repo: Arc<AssessmentRepository>,
        doctor_repo: Arc<DoctorAnalysisRepository>,
        config: Arc<ConfigManager>,
        assembler: PassportAssembler,
        rng: SharedRng,
    ) -> Self {
        Self {
            passport_repo,
            assessment_repo,
            doctor_repo,
            config,
            assembler,
            metrics: MetricsEngine::new(),
            rng,
        }
    }

    /// 为评估记录生成护照
    ///
    /// 在记录副本上重新计算派生字段, 等级以此刻的循环度为准; 源记录不变
    ///
    /// # 返回
    /// - Err(NotFound): 评估或指定的诊断报告不存在
    pub fn generate(
        &self,
        lca_id: &str,
        doctor_analysis_id: Option<&str>,
    ) -> ApiResult<MaterialPassport> {
        let mut record = load_assessment(&self.assessment_repo, lca_id)?;
        self.metrics.refresh(&mut record);

        let doctor_analysis_id = match doctor_analysis_id {
            Some(analysis_id) => {
                let analysis_id = validate_id("诊断报告", analysis_id)?;
                if self.doctor_repo.find_by_id(analysis_id)?.is_none() {
                    return Err(ApiError::NotFound(format!(
                        "DoctorAnalysis(id={})不存在",
                        analysis_id
                    )));
                }
                Some(analysis_id)
            }
            None => None,
        };

        let draft = {
            let mut rng = lock_rng(&self.rng)?;
            self.assembler.assemble(&record, doctor_analysis_id, &mut *rng)
        };

        let passport = MaterialPassport {
            id: Uuid::new_v4().to_string(),
            lca_id: record.id.clone(),
            draft,
        };
        self.passport_repo.insert(&passport)?;

        info!(
            passport_id = %passport.draft.passport_id,
            lca_id = %lca_id,
            grade = %passport.draft.grade,
            "材料护照已生成"
        );
        Ok(passport)
    }

    pub fn get(&self, id_or_passport_id: &str) -> ApiResult<MaterialPassport> {
        self.passport_repo
            .find(passport_key(id_or_passport_id))?
            .ok_or_else(|| {
                ApiError::NotFound(format!("MaterialPassport(id={})不存在", id_or_passport_id))
            })
    }

    /// 分页查询 (limit 为 None 时取配置 passport_list_limit)
    pub fn list(&self, skip: u32, limit: Option<u32>) -> ApiResult<Vec<MaterialPassport>> {
        let limit = match limit {
            Some(limit) => limit,
            None => self.config.get_passport_list_limit()?,
        };
        Ok(self.passport_repo.list(skip, limit)?)
    }

    pub fn list_for_assessment(&self, lca_id: &str) -> ApiResult<Vec<MaterialPassport>> {
        let lca_id = validate_id("评估", lca_id)?;
        let limit = self.config.get_lca_for_target_limit()?;
        Ok(self.passport_repo.find_by_lca_id(lca_id, limit)?)
    }

    /// 护照 + 源评估记录 + 诊断报告 (后两者已删除时为 None)
    pub fn get_full(&self, id_or_passport_id: &str) -> ApiResult<FullPassport> {
        let passport = self.get(id_or_passport_id)?;
        let lca_data = self.assessment_repo.find_by_id(&passport.lca_id)?;
        let doctor_analysis = match passport.draft.doctor_analysis_id.as_deref() {
            Some(analysis_id) => self.doctor_repo.find_by_id(analysis_id)?,
            None => None,
        };

        Ok(FullPassport {
            passport,
            lca_data,
            doctor_analysis,
        })
    }

    pub fn delete(&self, id_or_passport_id: &str) -> ApiResult<()> {
        let rows = self.passport_repo.delete(passport_key(id_or_passport_id))?;
        if rows == 0 {
            return Err(ApiError::NotFound(format!(
                "MaterialPassport(id={})不存在",
                id_or_passport_id
            )));
        }

        info!(passport = %id_or_passport_id, "材料护照已删除");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passport_key_resolution() {
        assert_eq!(
            passport_key("6f1c9d1e-3b5a-4c1f-9a52-2f1d3c4b5a69"),
            PassportKey::Id("6f1c9d1e-3b5a-4c1f-9a52-2f1d3c4b5a69")
        );
        assert_eq!(
            passport_key(" CW-65A1B2C3-X7Q9 "),
            PassportKey::PassportId("CW-65A1B2C3-X7Q9")
        );
    }
}
