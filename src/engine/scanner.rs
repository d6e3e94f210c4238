// ==========================================
// CycleWeave LCA - 废料识别 (模拟)
// ==========================================
// 说明: 视觉模型的占位实现。输入图像只被接收, 不参与计算;
//       结果从固定画像目录中均匀随机生成。
//       接入真实模型时替换本模块, 保持 ScanOutcome 结构不变。
// ==========================================

use crate::domain::scan::{ScanOutcome, ScrapProfile};
use crate::engine::metrics::{round_half_even, round_to};
use rand::Rng;
use tracing::debug;

pub const SCRAP_PROFILES: [ScrapProfile; 5] = [
    ScrapProfile {
        scrap_type: "Aluminum UBC (Used Beverage Cans)",
        purity_range: (88.0, 96.0),
        weight_range: (800.0, 2000.0),
        co2_factor: 0.7,
        revenue_per_kg: 1.8,
        process: "Electric Arc Furnace",
    },
    ScrapProfile {
        scrap_type: "Steel Shredded Scrap",
        purity_range: (85.0, 95.0),
        weight_range: (1500.0, 5000.0),
        co2_factor: 0.5,
        revenue_per_kg: 0.35,
        process: "Blast Furnace",
    },
    ScrapProfile {
        scrap_type: "Copper Wire Scrap",
        purity_range: (92.0, 99.0),
        weight_range: (200.0, 800.0),
        co2_factor: 0.9,
        revenue_per_kg: 8.5,
        process: "Induction Furnace",
    },
    ScrapProfile {
        scrap_type: "Zinc Die Cast Scrap",
        purity_range: (90.0, 98.0),
        weight_range: (300.0, 1200.0),
        co2_factor: 0.6,
        revenue_per_kg: 2.1,
        process: "Electric Arc Furnace",
    },
    ScrapProfile {
        scrap_type: "Lead Battery Scrap",
        purity_range: (70.0, 85.0),
        weight_range: (500.0, 2500.0),
        co2_factor: 0.4,
        revenue_per_kg: 1.2,
        process: "Blast Furnace",
    },
];

#[derive(Debug, Clone, Copy, Default)]
pub struct ScrapClassifierMock {}

impl ScrapClassifierMock {
    pub fn new() -> Self {
        Self {}
    }

    /// 识别废料
    ///
    /// # 参数
    /// - `rng`: 随机源 (测试时可注入固定种子)
    /// - `image_data`: 图像数据, 当前实现忽略
    pub fn classify<R: Rng + ?Sized>(&self, rng: &mut R, image_data: Option<&str>) -> ScanOutcome {
        let profile = &SCRAP_PROFILES[rng.gen_range(0..SCRAP_PROFILES.len())];

        let purity = round_to(rng.gen_range(profile.purity_range.0..=profile.purity_range.1), 1);
        let weight = round_half_even(rng.gen_range(profile.weight_range.0..=profile.weight_range.1));

        let co2_saved = round_half_even(weight * profile.co2_factor * (purity / 100.0));
        let revenue = round_to(weight * profile.revenue_per_kg * (purity / 100.0), 2);

        debug!(
            scrap_type = profile.scrap_type,
            purity,
            weight,
            image_bytes = image_data.map(str::len).unwrap_or(0),
            "废料识别 (模拟)"
        );

        ScanOutcome {
            scrap_type: profile.scrap_type.to_string(),
            purity,
            estimated_weight: weight,
            co2_saved,
            revenue_estimate: revenue,
            recommended_process: profile.process.to_string(),
        }
    }
}

/// 按类型名查找画像
pub fn find_profile(scrap_type: &str) -> Option<&'static ScrapProfile> {
    SCRAP_PROFILES.iter().find(|p| p.scrap_type == scrap_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_outcome_within_profile_ranges() {
        let classifier = ScrapClassifierMock::new();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..200 {
            let outcome = classifier.classify(&mut rng, None);
            let profile = find_profile(&outcome.scrap_type).expect("未知废料类型");

            assert!(outcome.purity >= profile.purity_range.0);
            assert!(outcome.purity <= profile.purity_range.1);
            assert!(outcome.estimated_weight >= profile.weight_range.0);
            assert!(outcome.estimated_weight <= profile.weight_range.1);
            assert!(outcome.co2_saved >= 0.0);
            assert!(outcome.revenue_estimate >= 0.0);
            assert_eq!(outcome.recommended_process, profile.process);
        }
    }

    #[test]
    fn test_derived_values_follow_formula() {
        let classifier = ScrapClassifierMock::new();
        let mut rng = StdRng::seed_from_u64(9);

        let outcome = classifier.classify(&mut rng, Some("aGVsbG8="));
        let profile = find_profile(&outcome.scrap_type).unwrap();

        let expected_co2 =
            (outcome.estimated_weight * profile.co2_factor * outcome.purity / 100.0).round_ties_even();
        assert!((outcome.co2_saved - expected_co2).abs() <= 1.0);
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let classifier = ScrapClassifierMock::new();

        let a = classifier.classify(&mut StdRng::seed_from_u64(5), None);
        let b = classifier.classify(&mut StdRng::seed_from_u64(5), Some("ignored"));

        assert_eq!(a, b);
    }
}
