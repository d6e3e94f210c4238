// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、固定时钟、测试环境组装
// ==========================================
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use cycleweave_lca::app::AppState;
use cycleweave_lca::db::{init_schema, open_sqlite_connection};
use cycleweave_lca::engine::{FixedClock, QrRenderer};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::error::Error;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是合法 UTF-8")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 测试固定时间: 2026-03-25 10:30:00 (UTC)
pub fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 25)
        .unwrap()
        .and_hms_opt(10, 30, 0)
        .unwrap()
}

/// 把 URL 原样写入 qrCode 的渲染器, 便于断言
pub struct EchoQrRenderer;

impl QrRenderer for EchoQrRenderer {
    fn render_png_base64(&self, payload_url: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
        Ok(format!("png:{}", payload_url))
    }
}

/// 集成测试环境 (临时库 + 固定时钟 + 固定种子)
pub struct TestEnv {
    pub state: AppState,
    _temp_file: NamedTempFile,
}

impl TestEnv {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        Self::with_seed(42)
    }

    pub fn with_seed(seed: u64) -> Result<Self, Box<dyn Error>> {
        cycleweave_lca::logging::init_test();
        let (temp_file, db_path) = create_test_db()?;
        let conn = open_sqlite_connection(&db_path)?;

        let state = AppState::with_components(
            db_path,
            conn,
            Arc::new(FixedClock(fixed_now())),
            Arc::new(EchoQrRenderer),
            Arc::new(Mutex::new(StdRng::seed_from_u64(seed))),
        )?;

        Ok(Self {
            state,
            _temp_file: temp_file,
        })
    }
}
