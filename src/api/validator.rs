// ==========================================
// CycleWeave LCA - 评估参数校验器
// ==========================================
// 职责: 在API边界校验评估字段取值范围与ID格式
// 说明: 引擎为全函数, 越界数据必须在进入引擎前被拒绝
// ==========================================

use crate::api::error::{ApiError, ApiResult, FieldViolation};
use crate::domain::assessment::AssessmentRecord;
use uuid::Uuid;

/// 字段取值范围 (闭区间)
struct FieldRange {
    field: &'static str,
    min: f64,
    max: f64,
    read: fn(&AssessmentRecord) -> f64,
}

const FIELD_RANGES: &[FieldRange] = &[
    FieldRange { field: "oreGrade", min: 10.0, max: 100.0, read: |r| r.ore_grade },
    FieldRange { field: "waterUsage", min: 1.0, max: 50.0, read: |r| r.water_usage },
    FieldRange {
        field: "totalEnergyConsumption",
        min: 1000.0,
        max: 50000.0,
        read: |r| r.total_energy_consumption,
    },
    FieldRange { field: "gridMix.coal", min: 0.0, max: 100.0, read: |r| r.grid_mix.coal },
    FieldRange { field: "gridMix.hydro", min: 0.0, max: 100.0, read: |r| r.grid_mix.hydro },
    FieldRange { field: "gridMix.solar", min: 0.0, max: 100.0, read: |r| r.grid_mix.solar },
    FieldRange {
        field: "gridMix.naturalGas",
        min: 0.0,
        max: 100.0,
        read: |r| r.grid_mix.natural_gas,
    },
    FieldRange { field: "processHeat", min: 1000.0, max: 20000.0, read: |r| r.process_heat },
    FieldRange { field: "temperature", min: 500.0, max: 2000.0, read: |r| r.temperature },
    FieldRange { field: "fluxUsage", min: 10.0, max: 100.0, read: |r| r.flux_usage },
    FieldRange { field: "slagRecovery", min: 0.0, max: 100.0, read: |r| r.slag_recovery },
    FieldRange { field: "inboundDistance", min: 10.0, max: 1000.0, read: |r| r.inbound_distance },
    FieldRange { field: "outboundDistance", min: 10.0, max: 1000.0, read: |r| r.outbound_distance },
    FieldRange { field: "vehicleEfficiency", min: 0.01, max: 1.0, read: |r| r.vehicle_efficiency },
    FieldRange { field: "scrapInputRate", min: 0.0, max: 100.0, read: |r| r.scrap_input_rate },
    FieldRange {
        field: "recyclingEfficiency",
        min: 50.0,
        max: 100.0,
        read: |r| r.recycling_efficiency,
    },
    FieldRange { field: "wasteRecovery", min: 0.0, max: 100.0, read: |r| r.waste_recovery },
    FieldRange { field: "closedLoopRate", min: 0.0, max: 100.0, read: |r| r.closed_loop_rate },
];

// ==========================================
// AssessmentValidator - 评估参数校验器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct AssessmentValidator;

impl AssessmentValidator {
    pub fn new() -> Self {
        Self
    }

    /// 校验记录全部数值字段
    ///
    /// 用于创建请求、更新后的合并结果、模拟的合并视图
    ///
    /// # 返回
    /// - Err(ValidationError): 至少一个字段越界 (NaN 视为越界)
    pub fn validate_record(&self, record: &AssessmentRecord) -> ApiResult<()> {
        let violations = Self::collect_violations(record);
        if violations.is_empty() {
            return Ok(());
        }

        let reason = violations
            .iter()
            .map(FieldViolation::describe)
            .collect::<Vec<_>>()
            .join("; ");

        tracing::debug!(violations = violations.len(), "评估参数校验未通过");

        Err(ApiError::ValidationError { reason, violations })
    }

    fn collect_violations(record: &AssessmentRecord) -> Vec<FieldViolation> {
        FIELD_RANGES
            .iter()
            .filter_map(|range| {
                let value = (range.read)(record);
                if (range.min..=range.max).contains(&value) {
                    None
                } else {
                    Some(FieldViolation {
                        field: range.field.to_string(),
                        value,
                        min: range.min,
                        max: range.max,
                    })
                }
            })
            .collect()
    }
}

/// 校验存储ID格式 (UUID)
///
/// # 返回
/// - Ok(id): 去除首尾空白后的ID, 后续查询一律使用该值
/// - Err(InvalidInput): 格式错误
pub fn validate_id<'a>(entity: &str, id: &'a str) -> ApiResult<&'a str> {
    let trimmed = id.trim();
    Uuid::parse_str(trimmed)
        .map(|_| trimmed)
        .map_err(|_| ApiError::InvalidInput(format!("无效的{}ID: {}", entity, id)))
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::assessment::AssessmentInput;
    use chrono::NaiveDateTime;

    fn reference_record() -> AssessmentRecord {
        AssessmentRecord::from_input(
            "lca-1".to_string(),
            AssessmentInput::reference_scenario(),
            NaiveDateTime::default(),
        )
    }

    #[test]
    fn test_reference_scenario_passes() {
        assert!(AssessmentValidator::new().validate_record(&reference_record()).is_ok());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let mut record = reference_record();
        record.temperature = 2000.0;
        record.vehicle_efficiency = 0.01;
        record.recycling_efficiency = 50.0;
        assert!(AssessmentValidator::new().validate_record(&record).is_ok());
    }

    #[test]
    fn test_out_of_range_fields_are_listed() {
        let mut record = reference_record();
        record.temperature = 2500.0;
        record.grid_mix.coal = -1.0;
        record.ore_grade = f64::NAN;

        match AssessmentValidator::new().validate_record(&record) {
            Err(ApiError::ValidationError { violations, .. }) => {
                let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
                assert_eq!(fields, vec!["oreGrade", "gridMix.coal", "temperature"]);
            }
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("评估", "6f1c9d1e-3b5a-4c1f-9a52-2f1d3c4b5a69").is_ok());
        assert_eq!(
            validate_id("评估", "  6f1c9d1e-3b5a-4c1f-9a52-2f1d3c4b5a69\n").unwrap(),
            "6f1c9d1e-3b5a-4c1f-9a52-2f1d3c4b5a69"
        );
        assert!(matches!(
            validate_id("评估", "not-an-id"),
            Err(ApiError::InvalidInput(_))
        ));
    }
}
