// ==========================================
// CycleWeave LCA - 材料护照组装器
// ==========================================
// 职责: 由评估记录生成护照快照 (编号/等级/溯源/认证/二维码)
// 输入: AssessmentRecord (派生字段已是当前值) + 可选诊断报告ID
// 输出: PassportDraft
// ==========================================
// 溯源日期按"当月日期减 N, 最小为 1 号"计算, 与历史护照保持一致;
// 月初生成时前几条事件会落在同一天
// ==========================================

use crate::domain::assessment::AssessmentRecord;
use crate::domain::passport::{PassportDraft, ProvenanceEvent};
use crate::domain::types::MetalType;
use crate::engine::clock::Clock;
use crate::engine::grade::GradeClassifier;
use chrono::{Datelike, NaiveDateTime};
use rand::Rng;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, warn};

pub const PASSPORT_ID_PREFIX: &str = "CW";
pub const DEFAULT_QR_BASE_URL: &str = "https://cycleweave.app";

const SUFFIX_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const SUFFIX_LEN: usize = 4;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

pub const CERTIFICATIONS: [&str; 4] = [
    "ISO 14001",
    "ISO 14064",
    "GHG Protocol",
    "Circular Economy Standard",
];

// ==========================================
// QrRenderer - 二维码渲染协作方
// ==========================================
pub trait QrRenderer: Send + Sync {
    /// 将 URL 渲染为 PNG 并返回 base64 字符串
    fn render_png_base64(&self, payload_url: &str) -> Result<String, Box<dyn Error + Send + Sync>>;
}

/// 空操作渲染器
///
/// 未接入渲染服务时使用, 护照只保留 qrUrl, 由前端自行出图
#[derive(Debug, Clone, Default)]
pub struct NoOpQrRenderer;

impl QrRenderer for NoOpQrRenderer {
    fn render_png_base64(&self, payload_url: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
        debug!("NoOpQrRenderer: 跳过二维码渲染 - url={}", payload_url);
        Ok(String::new())
    }
}

// ==========================================
// PassportAssembler - 护照组装器
// ==========================================
pub struct PassportAssembler {
    clock: Arc<dyn Clock>,
    qr_renderer: Arc<dyn QrRenderer>,
    base_url: String,
    grades: GradeClassifier,
}

impl PassportAssembler {
    /// 构造函数
    ///
    /// # 参数
    /// - `clock`: 时间源
    /// - `qr_renderer`: 二维码渲染协作方
    /// - `base_url`: 护照公开访问地址前缀
    pub fn new(clock: Arc<dyn Clock>, qr_renderer: Arc<dyn QrRenderer>, base_url: String) -> Self {
        Self {
            clock,
            qr_renderer,
            base_url: base_url.trim_end_matches('/').to_string(),
            grades: GradeClassifier::new(),
        }
    }

    /// 组装护照
    ///
    /// 等级取自 record.circularityScore, 调用方负责先刷新派生字段
    pub fn assemble<R: Rng + ?Sized>(
        &self,
        record: &AssessmentRecord,
        doctor_analysis_id: Option<&str>,
        rng: &mut R,
    ) -> PassportDraft {
        let now = self.clock.now();
        let passport_id = generate_passport_id(now, rng);
        let grade = self.grades.classify(record.circularity_score);

        let qr_url = self.qr_url(&passport_id);
        let qr_code = match self.qr_renderer.render_png_base64(&qr_url) {
            Ok(code) => code,
            Err(e) => {
                warn!(passport_id = %passport_id, error = %e, "二维码渲染失败, 保留 URL");
                String::new()
            }
        };

        debug!(
            passport_id = %passport_id,
            lca_id = %record.id,
            grade = %grade.letter,
            "护照组装完成"
        );

        PassportDraft {
            passport_id,
            doctor_analysis_id: doctor_analysis_id.map(|s| s.to_string()),
            metal_type: record.metal_type,
            co2_emission: record.co2_emission,
            circularity_score: record.circularity_score,
            scrap_input_rate: record.scrap_input_rate,
            total_distance: record.total_distance(),
            transport_mode: record.transport_mode,
            scenario_type: record.scenario_type,
            grade: grade.letter,
            grade_label: grade.label.to_string(),
            provenance: provenance_events(record.metal_type, now),
            certifications: CERTIFICATIONS.iter().map(|c| c.to_string()).collect(),
            qr_url,
            qr_code,
            generated_at: now,
        }
    }

    /// 护照公开访问地址
    pub fn qr_url(&self, passport_id: &str) -> String {
        format!("{}/passport/{}", self.base_url, passport_id)
    }
}

/// 生成护照编号: CW-{十六进制秒级时间戳}-{4 位大写字母数字}
///
/// 唯一性依赖时间戳 + 随机后缀, 不保证绝对无碰撞
pub fn generate_passport_id<R: Rng + ?Sized>(now: NaiveDateTime, rng: &mut R) -> String {
    let timestamp = now.and_utc().timestamp();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| SUFFIX_CHARSET[rng.gen_range(0..SUFFIX_CHARSET.len())] as char)
        .collect();

    format!("{}-{:X}-{}", PASSPORT_ID_PREFIX, timestamp, suffix)
}

/// 生成 5 步溯源时间线 (-20 / -17 / -10 / -4 / 0 天)
pub fn provenance_events(metal_type: MetalType, now: NaiveDateTime) -> Vec<ProvenanceEvent> {
    let sourcing_country = if metal_type == MetalType::Copper {
        "Chile"
    } else {
        "Australia"
    };

    let steps: [(u32, &str, String); 5] = [
        (20, "Raw Material Sourced", format!("Mining Site A, {}", sourcing_country)),
        (17, "Transport to Smelter", "Port of Valparaiso".to_string()),
        (10, "Smelting Process", "Smelter Facility B".to_string()),
        (4, "Quality Certification", "Testing Lab C".to_string()),
        (0, "Passport Generated", "CycleWeave Platform".to_string()),
    ];

    steps
        .into_iter()
        .map(|(days_back, event, location)| ProvenanceEvent {
            timestamp: clamped_day(now, days_back)
                .format(TIMESTAMP_FORMAT)
                .to_string(),
            event: event.to_string(),
            location,
            verified: true,
        })
        .collect()
}

/// 当月内回退天数, 日期最小为 1 号
fn clamped_day(now: NaiveDateTime, days_back: u32) -> NaiveDateTime {
    let day = now.day().saturating_sub(days_back).max(1);
    now.with_day(day).unwrap_or(now)
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::assessment::AssessmentInput;
    use crate::domain::types::GradeLetter;
    use crate::engine::clock::FixedClock;
    use crate::engine::metrics::MetricsEngine;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct EchoQrRenderer;

    impl QrRenderer for EchoQrRenderer {
        fn render_png_base64(
            &self,
            payload_url: &str,
        ) -> Result<String, Box<dyn Error + Send + Sync>> {
            Ok(format!("png:{}", payload_url))
        }
    }

    struct FailingQrRenderer;

    impl QrRenderer for FailingQrRenderer {
        fn render_png_base64(&self, _: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
            Err("renderer offline".into())
        }
    }

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn create_assembler(now: NaiveDateTime, qr: Arc<dyn QrRenderer>) -> PassportAssembler {
        PassportAssembler::new(
            Arc::new(FixedClock(now)),
            qr,
            DEFAULT_QR_BASE_URL.to_string(),
        )
    }

    fn create_test_record() -> AssessmentRecord {
        let mut record = AssessmentRecord::from_input(
            "lca-test".to_string(),
            AssessmentInput::reference_scenario(),
            NaiveDateTime::default(),
        );
        MetricsEngine::new().refresh(&mut record);
        record
    }

    #[test]
    fn test_passport_id_format() {
        let mut rng = StdRng::seed_from_u64(7);
        let now = at(2026, 1, 25);

        let id = generate_passport_id(now, &mut rng);
        let parts: Vec<&str> = id.split('-').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "CW");
        assert_eq!(parts[1], format!("{:X}", now.and_utc().timestamp()));
        assert_eq!(parts[2].len(), 4);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_assemble_copies_metrics_and_grade() {
        let assembler = create_assembler(at(2026, 1, 25), Arc::new(EchoQrRenderer));
        let record = create_test_record();
        let mut rng = StdRng::seed_from_u64(1);

        let draft = assembler.assemble(&record, Some("analysis-1"), &mut rng);

        assert_eq!(draft.co2_emission, 5102.0);
        assert_eq!(draft.circularity_score, 63.0);
        assert_eq!(draft.total_distance, 430.0);
        assert_eq!(draft.grade, GradeLetter::B);
        assert_eq!(draft.grade_label, "Good");
        assert_eq!(draft.doctor_analysis_id.as_deref(), Some("analysis-1"));
        assert_eq!(draft.certifications.len(), 4);
        assert_eq!(
            draft.qr_url,
            format!("https://cycleweave.app/passport/{}", draft.passport_id)
        );
        assert_eq!(draft.qr_code, format!("png:{}", draft.qr_url));
        assert_eq!(draft.generated_at, at(2026, 1, 25));
    }

    #[test]
    fn test_provenance_mid_month() {
        let events = provenance_events(MetalType::Aluminium, at(2026, 1, 25));

        let stamps: Vec<&str> = events.iter().map(|e| e.timestamp.as_str()).collect();
        assert_eq!(
            stamps,
            vec![
                "2026-01-05 09:30",
                "2026-01-08 09:30",
                "2026-01-15 09:30",
                "2026-01-21 09:30",
                "2026-01-25 09:30",
            ]
        );
        assert_eq!(events[0].location, "Mining Site A, Australia");
        assert!(events.iter().all(|e| e.verified));
    }

    #[test]
    fn test_provenance_clamps_to_first_of_month() {
        let events = provenance_events(MetalType::Copper, at(2026, 3, 5));

        assert_eq!(events[0].timestamp, "2026-03-01 09:30");
        assert_eq!(events[1].timestamp, "2026-03-01 09:30");
        assert_eq!(events[2].timestamp, "2026-03-01 09:30");
        assert_eq!(events[3].timestamp, "2026-03-01 09:30");
        assert_eq!(events[4].timestamp, "2026-03-05 09:30");
        assert_eq!(events[0].location, "Mining Site A, Chile");
    }

    #[test]
    fn test_renderer_failure_keeps_url() {
        let assembler = create_assembler(at(2026, 1, 25), Arc::new(FailingQrRenderer));
        let mut rng = StdRng::seed_from_u64(3);

        let draft = assembler.assemble(&create_test_record(), None, &mut rng);

        assert!(draft.qr_code.is_empty());
        assert!(draft.qr_url.ends_with(&draft.passport_id));
        assert!(draft.doctor_analysis_id.is_none());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let assembler = PassportAssembler::new(
            Arc::new(FixedClock(at(2026, 1, 25))),
            Arc::new(NoOpQrRenderer),
            "https://example.org/".to_string(),
        );

        assert_eq!(assembler.qr_url("CW-1-ABCD"), "https://example.org/passport/CW-1-ABCD");
    }
}
