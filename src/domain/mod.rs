// ==========================================
// CycleWeave LCA - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑, 不含引擎逻辑
// ==========================================

pub mod assessment;
pub mod doctor;
pub mod passport;
pub mod scan;
pub mod types;

// 重导出核心类型
pub use assessment::{AssessmentInput, AssessmentPatch, AssessmentRecord, GridMix};
pub use doctor::{
    AnalysisOutcome, AppliedImprovement, DoctorAnalysis, ImprovementSuggestion, MetricAnalysis,
};
pub use passport::{FullPassport, MaterialPassport, PassportDraft, ProvenanceEvent};
pub use scan::{AppliedScan, ScanOutcome, ScanResult, ScrapProfile};
pub use types::{
    CircularityRating, FurnaceType, GradeLetter, ImprovementCategory, MetalType, MiningMethod,
    ScenarioType, TransportMode,
};
