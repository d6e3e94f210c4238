// ==========================================
// AssessmentApi 集成测试
// ==========================================
// 测试范围:
// 1. 增删改查: create, get, list, update, delete
// 2. 派生字段在写入时重新计算
// 3. 情景模拟: 不落库, 合并视图越界时拒绝
// ==========================================

mod test_helpers;

use cycleweave_lca::api::ApiError;
use cycleweave_lca::domain::assessment::{AssessmentInput, AssessmentPatch, GridMix};
use cycleweave_lca::domain::types::{MetalType, ScenarioType};
use test_helpers::{fixed_now, TestEnv};

#[test]
fn test_create_computes_derived_fields() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let api = &env.state.assessment_api;

    let record = api.create(AssessmentInput::reference_scenario()).unwrap();
    assert_eq!(record.co2_emission, 5102.0);
    assert_eq!(record.circularity_score, 63.0);
    assert_eq!(record.created_at, fixed_now());
    assert_eq!(record.scenario_type, ScenarioType::Current);

    let loaded = api.get(&record.id).unwrap();
    assert_eq!(loaded, record);
}

#[test]
fn test_create_rejects_out_of_range_input() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let mut input = AssessmentInput::reference_scenario();
    input.recycling_efficiency = 30.0;

    match env.state.assessment_api.create(input) {
        Err(ApiError::ValidationError { violations, .. }) => {
            assert_eq!(violations.len(), 1);
            assert_eq!(violations[0].field, "recyclingEfficiency");
        }
        other => panic!("Expected ValidationError, got {:?}", other),
    }
    assert!(env.state.assessment_api.list(0, None).unwrap().is_empty());
}

#[test]
fn test_list_newest_first_with_skip_and_limit() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let api = &env.state.assessment_api;

    let ids: Vec<String> = (0..3)
        .map(|_| api.create(AssessmentInput::reference_scenario()).unwrap().id)
        .collect();

    let listed: Vec<String> = api.list(0, None).unwrap().into_iter().map(|r| r.id).collect();
    assert_eq!(listed, vec![ids[2].clone(), ids[1].clone(), ids[0].clone()]);

    let page: Vec<String> = api.list(1, Some(1)).unwrap().into_iter().map(|r| r.id).collect();
    assert_eq!(page, vec![ids[1].clone()]);
}

#[test]
fn test_update_merges_and_recomputes() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let api = &env.state.assessment_api;
    let record = api.create(AssessmentInput::reference_scenario()).unwrap();

    let patch = AssessmentPatch {
        metal_type: Some(MetalType::Copper),
        grid_mix: Some(GridMix {
            coal: 0.0,
            hydro: 100.0,
            solar: 0.0,
            natural_gas: 0.0,
        }),
        ..AssessmentPatch::default()
    };
    let updated = api.update(&record.id, &patch).unwrap();

    // 能源项 14500 × 0.02 = 290; (290 + 51.6 + 425) × 0.748 = 573.42
    assert_eq!(updated.co2_emission, 573.0);
    assert_eq!(updated.metal_type, MetalType::Copper);
    assert_eq!(updated.temperature, record.temperature);
    assert_eq!(updated.circularity_score, 63.0);
    assert_eq!(api.get(&record.id).unwrap(), updated);
}

#[test]
fn test_update_with_empty_patch_is_noop() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let api = &env.state.assessment_api;
    let record = api.create(AssessmentInput::reference_scenario()).unwrap();

    let unchanged = api.update(&record.id, &AssessmentPatch::default()).unwrap();
    assert_eq!(unchanged, record);
}

#[test]
fn test_update_rejects_out_of_range_patch() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let api = &env.state.assessment_api;
    let record = api.create(AssessmentInput::reference_scenario()).unwrap();

    let patch = AssessmentPatch {
        temperature: Some(2400.0),
        ..AssessmentPatch::default()
    };
    assert!(matches!(
        api.update(&record.id, &patch),
        Err(ApiError::ValidationError { .. })
    ));
    assert_eq!(api.get(&record.id).unwrap().temperature, 1200.0);
}

#[test]
fn test_delete_is_permanent() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let api = &env.state.assessment_api;
    let record = api.create(AssessmentInput::reference_scenario()).unwrap();

    api.delete(&record.id).unwrap();
    assert!(matches!(api.get(&record.id), Err(ApiError::NotFound(_))));
    assert!(matches!(api.delete(&record.id), Err(ApiError::NotFound(_))));
}

#[test]
fn test_malformed_id_is_invalid_input() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let api = &env.state.assessment_api;

    assert!(matches!(api.get("abc"), Err(ApiError::InvalidInput(_))));
    assert!(matches!(api.delete("abc"), Err(ApiError::InvalidInput(_))));
    assert!(matches!(
        api.simulate("abc", &AssessmentPatch::default()),
        Err(ApiError::InvalidInput(_))
    ));
}

#[test]
fn test_simulate_does_not_persist() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let api = &env.state.assessment_api;
    let record = api.create(AssessmentInput::reference_scenario()).unwrap();

    let patch = AssessmentPatch {
        scrap_input_rate: Some(62.0),
        ..AssessmentPatch::default()
    };
    let result = api.simulate(&record.id, &patch).unwrap();

    // 6820.35 × (1 - 0.372) = 4283.18; 循环度 68.7 -> 69
    assert_eq!(result.original.co2_emission, 5102.0);
    assert_eq!(result.simulated.co2_emission, 4283.0);
    assert_eq!(result.difference.co2_emission, 819.0);
    assert_eq!(result.difference.circularity_score, 6.0);

    assert_eq!(api.get(&record.id).unwrap(), record);
}

#[test]
fn test_simulate_rejects_out_of_range_merged_view() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let api = &env.state.assessment_api;
    let record = api.create(AssessmentInput::reference_scenario()).unwrap();

    let patch = AssessmentPatch {
        scrap_input_rate: Some(150.0),
        ..AssessmentPatch::default()
    };
    match api.simulate(&record.id, &patch) {
        Err(ApiError::ValidationError { violations, .. }) => {
            assert_eq!(violations[0].field, "scrapInputRate");
        }
        other => panic!("Expected ValidationError, got {:?}", other),
    }
}

#[test]
fn test_padded_id_resolves_to_stored_record() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let api = &env.state.assessment_api;
    let record = api.create(AssessmentInput::reference_scenario()).unwrap();
    let padded = format!("  {}\t", record.id);

    assert_eq!(api.get(&padded).unwrap(), record);
    api.delete(&padded).unwrap();
    assert!(matches!(api.get(&record.id), Err(ApiError::NotFound(_))));
}
