// ==========================================
// CycleWeave LCA - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use rand::rngs::StdRng;
use rand::SeedableRng;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use crate::api::{AssessmentApi, DoctorApi, PassportApi, ScannerApi, SharedRng};
use crate::config::config_manager::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::engine::{Clock, NoOpQrRenderer, PassportAssembler, QrRenderer, SystemClock};
use crate::repository::{
    AssessmentRepository, DoctorAnalysisRepository, PassportRepository, ScanResultRepository,
};

/// 应用状态
///
/// 包含所有API实例和共享资源, 由外壳 (HTTP / 桌面) 持有
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 评估记录API
    pub assessment_api: Arc<AssessmentApi>,

    /// AI 诊断API
    pub doctor_api: Arc<DoctorApi>,

    /// 材料护照API
    pub passport_api: Arc<PassportApi>,

    /// 废料扫描API
    pub scanner_api: Arc<ScannerApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// 创建新的AppState实例 (系统时钟 + 熵源随机数 + 空操作二维码渲染)
    ///
    /// 生成的护照 qrCode 为空串; 需要二维码图片时改用 with_components 注入渲染器
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 返回
    /// - Err(String): 初始化错误
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;

        Self::with_components(
            db_path,
            conn,
            Arc::new(SystemClock),
            Arc::new(NoOpQrRenderer),
            Arc::new(Mutex::new(StdRng::from_entropy())),
        )
    }

    /// 使用注入的协作方创建AppState (测试中注入固定时钟与种子)
    ///
    /// 该方法会:
    /// 1. 初始化 schema
    /// 2. 初始化所有Repository (共享同一连接)
    /// 3. 创建所有API实例
    pub fn with_components(
        db_path: String,
        conn: Connection,
        clock: Arc<dyn Clock>,
        qr_renderer: Arc<dyn QrRenderer>,
        rng: SharedRng,
    ) -> Result<Self, String> {
        init_schema(&conn).map_err(|e| format!("无法初始化数据库schema: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let assessment_repo = Arc::new(AssessmentRepository::from_connection(conn.clone()));
        let doctor_repo = Arc::new(DoctorAnalysisRepository::from_connection(conn.clone()));
        let passport_repo = Arc::new(PassportRepository::from_connection(conn.clone()));
        let scan_repo = Arc::new(ScanResultRepository::from_connection(conn.clone()));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        // ==========================================
        // 初始化Engine层
        // ==========================================
        let qr_base_url = config_manager
            .get_qr_base_url()
            .map_err(|e| format!("无法读取二维码基础地址: {}", e))?;
        let assembler = PassportAssembler::new(clock.clone(), qr_renderer, qr_base_url);

        // ==========================================
        // 初始化API层
        // ==========================================
        let assessment_api = Arc::new(AssessmentApi::new(
            assessment_repo.clone(),
            config_manager.clone(),
            clock.clone(),
        ));
        let doctor_api = Arc::new(DoctorApi::new(
            doctor_repo.clone(),
            assessment_repo.clone(),
            config_manager.clone(),
            clock.clone(),
        ));
        let passport_api = Arc::new(PassportApi::new(
            passport_repo,
            assessment_repo.clone(),
            doctor_repo,
            config_manager.clone(),
            assembler,
            rng.clone(),
        ));
        let scanner_api = Arc::new(ScannerApi::new(
            scan_repo,
            assessment_repo,
            config_manager.clone(),
            clock,
            rng,
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            assessment_api,
            doctor_api,
            passport_api,
            scanner_api,
            config_manager,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先使用环境变量 CYCLEWEAVE_DB_PATH, 否则放在用户数据目录下
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("CYCLEWEAVE_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./cycleweave.db");

    if let Some(data_dir) = dirs::data_dir() {
        #[cfg(debug_assertions)]
        {
            path = data_dir.join("cycleweave-dev");
        }

        #[cfg(not(debug_assertions))]
        {
            path = data_dir.join("cycleweave");
        }

        // 确保目录存在
        std::fs::create_dir_all(&path).ok();
        path = path.join("cycleweave.db");
    }

    path.to_string_lossy().to_string()
}
