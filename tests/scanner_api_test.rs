// ==========================================
// ScannerApi 集成测试
// ==========================================
// 测试范围:
// 1. 识别 / 上传: 结果落库
// 2. 应用到评估: 字段推导、派生字段重算、扫描关联
// ==========================================

mod test_helpers;

use cycleweave_lca::api::ApiError;
use cycleweave_lca::domain::assessment::AssessmentInput;
use cycleweave_lca::domain::types::FurnaceType;
use cycleweave_lca::engine::metrics::round_half_even;
use test_helpers::{fixed_now, TestEnv};

#[test]
fn test_analyze_persists_scan() {
    let env = TestEnv::new().expect("无法创建测试环境");

    let scan = env.state.scanner_api.analyze(Some("aGVsbG8=")).unwrap();
    assert!(scan.filename.is_none());
    assert!(scan.lca_id.is_none());
    assert_eq!(scan.created_at, fixed_now());

    assert_eq!(env.state.scanner_api.get(&scan.id).unwrap(), scan);
}

#[test]
fn test_same_seed_same_outcome() {
    let env_a = TestEnv::with_seed(9).expect("无法创建测试环境");
    let env_b = TestEnv::with_seed(9).expect("无法创建测试环境");

    let a = env_a.state.scanner_api.analyze(None).unwrap();
    let b = env_b.state.scanner_api.analyze(None).unwrap();
    assert_eq!(a.outcome, b.outcome);
}

#[test]
fn test_upload_records_filename() {
    let env = TestEnv::new().expect("无法创建测试环境");

    let scan = env
        .state
        .scanner_api
        .upload("bale-17.jpg", &[0xFF, 0xD8, 0xFF, 0xE0])
        .unwrap();
    assert_eq!(scan.filename.as_deref(), Some("bale-17.jpg"));

    assert!(matches!(
        env.state.scanner_api.upload("empty.jpg", &[]),
        Err(ApiError::InvalidInput(_))
    ));
    assert!(matches!(
        env.state.scanner_api.upload("  ", &[1, 2, 3]),
        Err(ApiError::InvalidInput(_))
    ));
    assert_eq!(env.state.scanner_api.list(0, None).unwrap().len(), 1);
}

#[test]
fn test_apply_scan_to_assessment() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let record = env
        .state
        .assessment_api
        .create(AssessmentInput::reference_scenario())
        .unwrap();
    let scan = env.state.scanner_api.analyze(None).unwrap();

    let applied = env
        .state
        .scanner_api
        .apply_to_assessment(&scan.id, &record.id)
        .unwrap();
    assert_eq!(applied.message, "Scan applied to LCA successfully");

    let expected_scrap = round_half_even(scan.outcome.purity);
    let expected_efficiency = round_half_even(scan.outcome.purity * 0.95).min(95.0);
    assert_eq!(applied.updates.scrap_input_rate, Some(expected_scrap));
    assert_eq!(applied.updates.recycling_efficiency, Some(expected_efficiency));

    let updated = env.state.assessment_api.get(&record.id).unwrap();
    assert_eq!(updated.scrap_input_rate, expected_scrap);
    assert_eq!(updated.recycling_efficiency, expected_efficiency);
    if scan.outcome.recommended_process.contains("Electric") {
        assert_eq!(updated.furnace_type, FurnaceType::ElectricArc);
    } else {
        assert_eq!(updated.furnace_type, record.furnace_type);
    }
    // 废料输入率升高, 排放下降且循环度上升
    assert!(updated.co2_emission < record.co2_emission);
    assert!(updated.circularity_score > record.circularity_score);

    let linked = env.state.scanner_api.get(&scan.id).unwrap();
    assert_eq!(linked.lca_id.as_deref(), Some(record.id.as_str()));
}

#[test]
fn test_apply_scan_to_missing_assessment() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let scan = env.state.scanner_api.analyze(None).unwrap();

    let result = env
        .state
        .scanner_api
        .apply_to_assessment(&scan.id, "6f1c9d1e-3b5a-4c1f-9a52-2f1d3c4b5a69");
    assert!(matches!(result, Err(ApiError::NotFound(_))));
    assert!(env.state.scanner_api.get(&scan.id).unwrap().lca_id.is_none());
}

#[test]
fn test_apply_scan_with_padded_ids_links_stored_id() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let record = env
        .state
        .assessment_api
        .create(AssessmentInput::reference_scenario())
        .unwrap();
    let scan = env.state.scanner_api.analyze(None).unwrap();

    env.state
        .scanner_api
        .apply_to_assessment(&format!(" {} ", scan.id), &format!(" {} ", record.id))
        .unwrap();

    let linked = env.state.scanner_api.get(&scan.id).unwrap();
    assert_eq!(linked.lca_id.as_deref(), Some(record.id.as_str()));
}
