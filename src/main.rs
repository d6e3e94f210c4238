// ==========================================
// CycleWeave LCA - 主入口
// ==========================================
// 初始化日志与应用状态, 输出运行概况
// HTTP / 桌面外壳通过库模式持有 AppState
// ==========================================

use anyhow::Context;
use cycleweave_lca::app::{get_default_db_path, AppState};
use cycleweave_lca::logging;

fn main() -> anyhow::Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} - 生命周期评估后端", cycleweave_lca::APP_NAME);
    tracing::info!("系统版本: {}", cycleweave_lca::VERSION);
    tracing::info!("==================================================");

    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    let app_state = AppState::new(db_path)
        .map_err(anyhow::Error::msg)
        .context("无法初始化AppState")?;

    let assessments = app_state.assessment_api.list(0, None)?;
    let analyses = app_state.doctor_api.list(0, None)?;
    let passports = app_state.passport_api.list(0, None)?;
    let scans = app_state.scanner_api.list(0, None)?;

    tracing::info!(
        assessments = assessments.len(),
        analyses = analyses.len(),
        passports = passports.len(),
        scans = scans.len(),
        "数据概况"
    );
    tracing::info!(
        qr_base_url = %app_state.config_manager.get_qr_base_url()?,
        "AppState初始化成功"
    );

    Ok(())
}
