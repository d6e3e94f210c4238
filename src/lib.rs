// ==========================================
// CycleWeave LCA - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 金属回收生命周期评估 (LCA) 后端
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 指标与规则
pub mod engine;

// 配置层 - 运行配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    CircularityRating, FurnaceType, GradeLetter, ImprovementCategory, MetalType, MiningMethod,
    ScenarioType, TransportMode,
};

// 领域实体
pub use domain::{
    AssessmentInput, AssessmentPatch, AssessmentRecord, DoctorAnalysis, GridMix,
    MaterialPassport, ScanResult,
};

// 引擎
pub use engine::{
    GradeClassifier, MetricsEngine, PassportAssembler, RecommendationEngine, ScrapClassifierMock,
    SimulationService,
};

// API
pub use api::{ApiError, ApiResult, AssessmentApi, DoctorApi, PassportApi, ScannerApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "CycleWeave LCA";
