// ==========================================
// CycleWeave LCA - 引擎层
// ==========================================
// 职责: 实现业务规则引擎, 不拼 SQL
// 红线: 引擎为纯计算, 时间与随机数由调用方注入
// ==========================================

pub mod clock;
pub mod grade;
pub mod metrics;
pub mod passport;
pub mod recommendation;
pub mod scanner;
pub mod simulation;

// 重导出核心引擎
pub use clock::{Clock, FixedClock, SystemClock};
pub use grade::{Grade, GradeClassifier};
pub use metrics::MetricsEngine;
pub use passport::{NoOpQrRenderer, PassportAssembler, QrRenderer};
pub use recommendation::RecommendationEngine;
pub use scanner::ScrapClassifierMock;
pub use simulation::{MetricPair, SimulationResult, SimulationService};
