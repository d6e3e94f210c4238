// ==========================================
// CycleWeave LCA - 评估记录领域模型
// ==========================================
// 职责: 评估记录 (AssessmentRecord)、创建请求、部分更新/模拟补丁
// 红线: co2Emission / circularityScore 为派生字段, 只能由 MetricsEngine 写入
// ==========================================

use crate::domain::types::{FurnaceType, MetalType, MiningMethod, ScenarioType, TransportMode};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 缺省车辆排放系数 (kg CO2/km)
pub const DEFAULT_VEHICLE_EFFICIENCY: f64 = 0.12;

fn default_vehicle_efficiency() -> f64 {
    DEFAULT_VEHICLE_EFFICIENCY
}

// ==========================================
// GridMix - 电网结构
// ==========================================
// 四项各自 0-100, 不要求合计为 100
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridMix {
    pub coal: f64,
    pub hydro: f64,
    pub solar: f64,
    pub natural_gas: f64,
}

// ==========================================
// AssessmentInput - 创建请求
// ==========================================
/// 客户端可提交的全部字段 (不含派生字段与元数据)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentInput {
    pub metal_type: MetalType,
    pub ore_grade: f64,
    pub mining_method: MiningMethod,
    pub water_usage: f64,
    pub total_energy_consumption: f64,
    pub grid_mix: GridMix,
    pub process_heat: f64,
    pub furnace_type: FurnaceType,
    pub temperature: f64,
    pub flux_usage: f64,
    pub slag_recovery: f64,
    pub transport_mode: TransportMode,
    pub inbound_distance: f64,
    pub outbound_distance: f64,
    #[serde(default = "default_vehicle_efficiency")]
    pub vehicle_efficiency: f64,
    pub scrap_input_rate: f64,
    pub recycling_efficiency: f64,
    pub waste_recovery: f64,
    pub closed_loop_rate: f64,
    #[serde(default)]
    pub scenario_type: ScenarioType,
}

impl AssessmentInput {
    /// 仪表盘默认情景 (铝, 道路运输, 42% 废料输入)
    pub fn reference_scenario() -> Self {
        Self {
            metal_type: MetalType::Aluminium,
            ore_grade: 45.0,
            mining_method: MiningMethod::OpenPit,
            water_usage: 12.5,
            total_energy_consumption: 14500.0,
            grid_mix: GridMix {
                coal: 35.0,
                hydro: 25.0,
                solar: 20.0,
                natural_gas: 20.0,
            },
            process_heat: 8500.0,
            furnace_type: FurnaceType::ElectricArc,
            temperature: 1200.0,
            flux_usage: 45.0,
            slag_recovery: 78.0,
            transport_mode: TransportMode::Road,
            inbound_distance: 250.0,
            outbound_distance: 180.0,
            vehicle_efficiency: DEFAULT_VEHICLE_EFFICIENCY,
            scrap_input_rate: 42.0,
            recycling_efficiency: 87.0,
            waste_recovery: 65.0,
            closed_loop_rate: 55.0,
            scenario_type: ScenarioType::Current,
        }
    }
}

// ==========================================
// AssessmentRecord - 评估记录 (核心实体)
// ==========================================
// 存储形态: lca_assessment.doc_json
// 缺失的数值字段按 0 读取, vehicleEfficiency 按 0.12 读取
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssessmentRecord {
    pub id: String,

    // ===== 原料开采 =====
    pub metal_type: MetalType,
    pub ore_grade: f64,
    pub mining_method: MiningMethod,
    pub water_usage: f64,

    // ===== 能源 =====
    pub total_energy_consumption: f64,
    pub grid_mix: GridMix,
    pub process_heat: f64,

    // ===== 冶炼 =====
    pub furnace_type: FurnaceType,
    pub temperature: f64,
    pub flux_usage: f64,
    pub slag_recovery: f64,

    // ===== 物流 =====
    pub transport_mode: TransportMode,
    pub inbound_distance: f64,
    pub outbound_distance: f64,
    pub vehicle_efficiency: f64,

    // ===== 循环 =====
    pub scrap_input_rate: f64,
    pub recycling_efficiency: f64,
    pub waste_recovery: f64,
    pub closed_loop_rate: f64,

    pub scenario_type: ScenarioType,

    // ===== 派生字段 =====
    pub co2_emission: f64,
    pub circularity_score: f64,

    // ===== 元数据 =====
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Default for AssessmentRecord {
    fn default() -> Self {
        Self {
            id: String::new(),
            metal_type: MetalType::default(),
            ore_grade: 0.0,
            mining_method: MiningMethod::default(),
            water_usage: 0.0,
            total_energy_consumption: 0.0,
            grid_mix: GridMix::default(),
            process_heat: 0.0,
            furnace_type: FurnaceType::default(),
            temperature: 0.0,
            flux_usage: 0.0,
            slag_recovery: 0.0,
            transport_mode: TransportMode::default(),
            inbound_distance: 0.0,
            outbound_distance: 0.0,
            vehicle_efficiency: DEFAULT_VEHICLE_EFFICIENCY,
            scrap_input_rate: 0.0,
            recycling_efficiency: 0.0,
            waste_recovery: 0.0,
            closed_loop_rate: 0.0,
            scenario_type: ScenarioType::default(),
            co2_emission: 0.0,
            circularity_score: 0.0,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }
}

impl AssessmentRecord {
    /// 由创建请求构造记录
    ///
    /// 派生字段此时为 0, 调用方需随后执行 `MetricsEngine::refresh`
    pub fn from_input(id: String, input: AssessmentInput, now: NaiveDateTime) -> Self {
        Self {
            id,
            metal_type: input.metal_type,
            ore_grade: input.ore_grade,
            mining_method: input.mining_method,
            water_usage: input.water_usage,
            total_energy_consumption: input.total_energy_consumption,
            grid_mix: input.grid_mix,
            process_heat: input.process_heat,
            furnace_type: input.furnace_type,
            temperature: input.temperature,
            flux_usage: input.flux_usage,
            slag_recovery: input.slag_recovery,
            transport_mode: input.transport_mode,
            inbound_distance: input.inbound_distance,
            outbound_distance: input.outbound_distance,
            vehicle_efficiency: input.vehicle_efficiency,
            scrap_input_rate: input.scrap_input_rate,
            recycling_efficiency: input.recycling_efficiency,
            waste_recovery: input.waste_recovery,
            closed_loop_rate: input.closed_loop_rate,
            scenario_type: input.scenario_type,
            co2_emission: 0.0,
            circularity_score: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    /// 进厂 + 出厂运输总距离 (km)
    pub fn total_distance(&self) -> f64 {
        self.inbound_distance + self.outbound_distance
    }

    /// 浅合并补丁: 提供的字段整体覆盖同名字段 (gridMix 整体替换)
    ///
    /// 不触碰派生字段与元数据
    pub fn apply_patch(&mut self, patch: &AssessmentPatch) {
        macro_rules! overwrite {
            ($($field:ident),* $(,)?) => {
                $(
                    if let Some(value) = patch.$field {
                        self.$field = value;
                    }
                )*
            };
        }

        overwrite!(
            metal_type,
            ore_grade,
            mining_method,
            water_usage,
            total_energy_consumption,
            grid_mix,
            process_heat,
            furnace_type,
            temperature,
            flux_usage,
            slag_recovery,
            transport_mode,
            inbound_distance,
            outbound_distance,
            vehicle_efficiency,
            scrap_input_rate,
            recycling_efficiency,
            waste_recovery,
            closed_loop_rate,
            scenario_type,
        );
    }
}

// ==========================================
// AssessmentPatch - 部分更新 / 模拟补丁
// ==========================================
// 同一结构用于 PUT 更新、模拟预览、改进建议的 simulateAction
// 未知字段 (含 co2Emission / circularityScore) 在反序列化时被忽略
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metal_type: Option<MetalType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ore_grade: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mining_method: Option<MiningMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_usage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_energy_consumption: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_mix: Option<GridMix>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_heat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub furnace_type: Option<FurnaceType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flux_usage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slag_recovery: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport_mode: Option<TransportMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inbound_distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outbound_distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_efficiency: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scrap_input_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recycling_efficiency: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waste_recovery: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_loop_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario_type: Option<ScenarioType>,
}

impl AssessmentPatch {
    /// 补丁是否不含任何字段
    pub fn is_empty(&self) -> bool {
        *self == AssessmentPatch::default()
    }
}
