// ==========================================
// CycleWeave LCA - 指标引擎
// ==========================================
// 职责: 由评估记录计算 CO2 排放与循环度评分
// 输入: AssessmentRecord
// 输出: co2Emission (kg, 取整) / circularityScore (0-100, 取整)
// 红线: 纯函数, 无错误路径; 派生字段只允许经由本引擎写入
// ==========================================

use crate::domain::assessment::{AssessmentRecord, GridMix};

// ===== 电网排放因子 (kg CO2/kWh) =====
pub const COAL_FACTOR: f64 = 0.95;
pub const HYDRO_FACTOR: f64 = 0.02;
pub const SOLAR_FACTOR: f64 = 0.05;
pub const NATURAL_GAS_FACTOR: f64 = 0.45;

/// 工艺热排放因子
pub const PROCESS_HEAT_FACTOR: f64 = 0.05;

/// 100% 废料输入时的最大减排比例
pub const RECYCLED_OFFSET_MAX: f64 = 0.6;

/// 四舍六入五成双取整 (与参考实现的 round 一致)
pub fn round_half_even(value: f64) -> f64 {
    value.round_ties_even()
}

/// 保留指定小数位
///
/// 按浮点数的精确二进制值十进制舍入 (恰为中点时五成双), 不先乘 10^d:
/// 1.055 实际存储为 1.05499.., 结果为 1.05
pub fn round_to(value: f64, decimals: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.*}", decimals, value).parse().unwrap_or(value)
}

// ==========================================
// MetricsEngine - 指标引擎
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsEngine {
    // 无状态引擎
}

impl MetricsEngine {
    pub fn new() -> Self {
        Self {}
    }

    /// 计算 CO2 排放 (kg)
    ///
    /// 公式:
    /// - 能源 = 总能耗 × Σ(电网占比/100 × 因子), 占比不做归一化
    /// - 运输 = (进厂 + 出厂距离) × 车辆排放系数
    /// - 工艺 = 工艺热 × 0.05
    /// - 合计 × (1 - 废料输入率/100 × 0.6)
    pub fn compute_emissions(&self, record: &AssessmentRecord) -> f64 {
        let energy_emissions = record.total_energy_consumption * grid_intensity(&record.grid_mix);
        let transport_emissions = record.total_distance() * record.vehicle_efficiency;
        let process_emissions = record.process_heat * PROCESS_HEAT_FACTOR;

        let recycled_offset = (record.scrap_input_rate / 100.0) * RECYCLED_OFFSET_MAX;
        let total =
            (energy_emissions + transport_emissions + process_emissions) * (1.0 - recycled_offset);

        round_half_even(total)
    }

    /// 计算循环度评分
    ///
    /// 权重: 废料输入 0.3 / 回收效率 0.3 / 废弃物回收 0.2 / 闭环率 0.2
    pub fn compute_circularity(&self, record: &AssessmentRecord) -> f64 {
        let score = record.scrap_input_rate * 0.3
            + record.recycling_efficiency * 0.3
            + record.waste_recovery * 0.2
            + record.closed_loop_rate * 0.2;

        round_half_even(score)
    }

    /// 重算并写回派生字段
    pub fn refresh(&self, record: &mut AssessmentRecord) {
        record.co2_emission = self.compute_emissions(record);
        record.circularity_score = self.compute_circularity(record);
    }
}

/// 电网综合排放强度 (kg CO2/kWh)
fn grid_intensity(mix: &GridMix) -> f64 {
    (mix.coal / 100.0) * COAL_FACTOR
        + (mix.hydro / 100.0) * HYDRO_FACTOR
        + (mix.solar / 100.0) * SOLAR_FACTOR
        + (mix.natural_gas / 100.0) * NATURAL_GAS_FACTOR
}
