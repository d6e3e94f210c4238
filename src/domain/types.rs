// ==========================================
// CycleWeave LCA - 领域类型定义
// ==========================================
// 职责: 评估记录中的枚举字段与诊断、护照的分级类型
// 序列化格式: 与原始 JSON 文档一致 (含空格的取值使用 rename)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 金属类型 (Metal Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MetalType {
    #[default]
    Aluminium,
    Steel,
    Copper,
    Zinc,
    Lead,
}

impl fmt::Display for MetalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetalType::Aluminium => write!(f, "Aluminium"),
            MetalType::Steel => write!(f, "Steel"),
            MetalType::Copper => write!(f, "Copper"),
            MetalType::Zinc => write!(f, "Zinc"),
            MetalType::Lead => write!(f, "Lead"),
        }
    }
}

// ==========================================
// 开采方式 (Mining Method)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MiningMethod {
    #[default]
    #[serde(rename = "Open Pit")]
    OpenPit,
    Underground,
    #[serde(rename = "Heap Leach")]
    HeapLeach,
}

impl fmt::Display for MiningMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MiningMethod::OpenPit => write!(f, "Open Pit"),
            MiningMethod::Underground => write!(f, "Underground"),
            MiningMethod::HeapLeach => write!(f, "Heap Leach"),
        }
    }
}

// ==========================================
// 炉型 (Furnace Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FurnaceType {
    #[default]
    #[serde(rename = "Electric Arc")]
    ElectricArc,
    Blast,
    Induction,
}

impl fmt::Display for FurnaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FurnaceType::ElectricArc => write!(f, "Electric Arc"),
            FurnaceType::Blast => write!(f, "Blast"),
            FurnaceType::Induction => write!(f, "Induction"),
        }
    }
}

// ==========================================
// 运输方式 (Transport Mode)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TransportMode {
    #[default]
    Road,
    Rail,
    Sea,
    Multi,
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportMode::Road => write!(f, "Road"),
            TransportMode::Rail => write!(f, "Rail"),
            TransportMode::Sea => write!(f, "Sea"),
            TransportMode::Multi => write!(f, "Multi"),
        }
    }
}

// ==========================================
// 情景类型 (Scenario Type)
// ==========================================
// 采纳改进建议后记录被标记为 Optimized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ScenarioType {
    #[default]
    Current,
    Optimized,
    Baseline,
}

impl fmt::Display for ScenarioType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioType::Current => write!(f, "Current"),
            ScenarioType::Optimized => write!(f, "Optimized"),
            ScenarioType::Baseline => write!(f, "Baseline"),
        }
    }
}

// ==========================================
// 改进建议类别 (Improvement Category)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImprovementCategory {
    Energy,
    Transport,
    Process,
    Circularity,
}

impl fmt::Display for ImprovementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImprovementCategory::Energy => write!(f, "energy"),
            ImprovementCategory::Transport => write!(f, "transport"),
            ImprovementCategory::Process => write!(f, "process"),
            ImprovementCategory::Circularity => write!(f, "circularity"),
        }
    }
}

// ==========================================
// 循环度评价 (Circularity Rating)
// ==========================================
// 诊断报告使用 70/50 两档阈值, 与护照等级 (GradeLetter) 相互独立
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CircularityRating {
    Good,
    Moderate,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
}

impl fmt::Display for CircularityRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CircularityRating::Good => write!(f, "Good"),
            CircularityRating::Moderate => write!(f, "Moderate"),
            CircularityRating::NeedsImprovement => write!(f, "Needs Improvement"),
        }
    }
}

// ==========================================
// 护照等级 (Grade Letter)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GradeLetter {
    A,
    B,
    C,
    D,
}

impl fmt::Display for GradeLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradeLetter::A => write!(f, "A"),
            GradeLetter::B => write!(f, "B"),
            GradeLetter::C => write!(f, "C"),
            GradeLetter::D => write!(f, "D"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(serde_json::to_string(&MiningMethod::OpenPit).unwrap(), "\"Open Pit\"");
        assert_eq!(serde_json::to_string(&FurnaceType::ElectricArc).unwrap(), "\"Electric Arc\"");
        assert_eq!(serde_json::to_string(&ImprovementCategory::Energy).unwrap(), "\"energy\"");
        assert_eq!(
            serde_json::to_string(&CircularityRating::NeedsImprovement).unwrap(),
            "\"Needs Improvement\""
        );

        let mode: TransportMode = serde_json::from_str("\"Rail\"").unwrap();
        assert_eq!(mode, TransportMode::Rail);
    }

    #[test]
    fn test_display_matches_wire_name() {
        assert_eq!(MiningMethod::HeapLeach.to_string(), "Heap Leach");
        assert_eq!(ScenarioType::Optimized.to_string(), "Optimized");
        assert_eq!(GradeLetter::B.to_string(), "B");
    }
}
