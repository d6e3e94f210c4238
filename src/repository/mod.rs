// ==========================================
// CycleWeave LCA - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口, 屏蔽数据库细节
// 约束: 所有查询使用参数化, 防止 SQL 注入
// ==========================================

pub mod assessment_repo;
pub mod doctor_repo;
pub mod error;
pub mod passport_repo;
pub mod scan_repo;

// 重导出核心仓储
pub use assessment_repo::AssessmentRepository;
pub use doctor_repo::DoctorAnalysisRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use passport_repo::{PassportKey, PassportRepository};
pub use scan_repo::ScanResultRepository;

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;

/// 时间列格式 (微秒精度, 保证同秒内排序稳定)
pub const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

pub(crate) fn format_ts(ts: NaiveDateTime) -> String {
    ts.format(TS_FORMAT).to_string()
}

/// 批量反序列化 doc_json
pub(crate) fn decode_docs<T: DeserializeOwned>(docs: Vec<String>) -> RepositoryResult<Vec<T>> {
    docs.iter()
        .map(|json| serde_json::from_str(json).map_err(RepositoryError::from))
        .collect()
}
