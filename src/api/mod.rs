// ==========================================
// CycleWeave LCA - API 层
// ==========================================
// 职责: 提供业务 API 接口, 供 HTTP / 桌面外壳调用
// 约束: 参数校验在此层完成, 引擎只接收合法数据
// ==========================================

pub mod assessment_api;
pub mod doctor_api;
pub mod error;
pub mod passport_api;
pub mod scanner_api;
pub mod validator;

// 重导出核心类型
pub use assessment_api::AssessmentApi;
pub use doctor_api::DoctorApi;
pub use error::{ApiError, ApiResult, FieldViolation};
pub use passport_api::PassportApi;
pub use scanner_api::ScannerApi;
pub use validator::{validate_id, AssessmentValidator};

use crate::domain::assessment::AssessmentRecord;
use crate::repository::AssessmentRepository;
use rand::rngs::StdRng;
use std::sync::{Arc, Mutex, MutexGuard};

/// 共享随机源 (测试中注入固定种子)
pub type SharedRng = Arc<Mutex<StdRng>>;

pub(crate) fn lock_rng(rng: &SharedRng) -> ApiResult<MutexGuard<'_, StdRng>> {
    rng.lock()
        .map_err(|e| ApiError::InternalError(format!("随机源锁获取失败: {}", e)))
}

/// 按ID加载评估记录
///
/// # 返回
/// - Err(InvalidInput): ID 格式错误
/// - Err(NotFound): 记录不存在
pub(crate) fn load_assessment(
    repo: &AssessmentRepository,
    lca_id: &str,
) -> ApiResult<AssessmentRecord> {
    let lca_id = validate_id("评估", lca_id)?;
    repo.find_by_id(lca_id)?
        .ok_or_else(|| ApiError::NotFound(format!("AssessmentRecord(id={})不存在", lca_id)))
}
