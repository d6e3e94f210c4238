// ==========================================
// CycleWeave LCA - 配置管理器
// ==========================================
// 职责: 运行配置查询、覆写
// 存储: config_kv 表 (scope_id='global')
// ==========================================

use crate::engine::passport::DEFAULT_QR_BASE_URL;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager
    ///
    /// 说明: 会对传入连接再次应用统一 PRAGMA (幂等)
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let conn_guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    /// 写入 global scope 的配置值 (UPSERT)
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;

        tracing::info!(config_key = key, "配置已更新");
        Ok(())
    }

    /// 获取所有 global 配置的快照
    pub fn get_config_snapshot(&self) -> RepositoryResult<HashMap<String, String>> {
        let conn = self.get_conn()?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map = HashMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(config_map)
    }

    /// 读取并解析配置, 不存在时返回默认值
    ///
    /// 存在但无法解析时返回 FieldValueError, 不静默回退
    fn get_parsed_or_default<T: FromStr>(&self, key: &str, default: T) -> RepositoryResult<T> {
        match self.get_global_config_value(key)? {
            None => Ok(default),
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map_err(|_| RepositoryError::FieldValueError {
                    field: key.to_string(),
                    message: format!("无法解析配置值: {}", raw),
                }),
        }
    }

    // ===== 护照 =====

    /// QR 链接基础地址
    pub fn get_qr_base_url(&self) -> RepositoryResult<String> {
        Ok(self
            .get_global_config_value(config_keys::QR_BASE_URL)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_QR_BASE_URL.to_string()))
    }

    // ===== 列表上限 =====

    pub fn get_lca_list_limit(&self) -> RepositoryResult<u32> {
        self.get_parsed_or_default(config_keys::LCA_LIST_LIMIT, defaults::LCA_LIST_LIMIT)
    }

    pub fn get_doctor_list_limit(&self) -> RepositoryResult<u32> {
        self.get_parsed_or_default(config_keys::DOCTOR_LIST_LIMIT, defaults::DOCTOR_LIST_LIMIT)
    }

    pub fn get_passport_list_limit(&self) -> RepositoryResult<u32> {
        self.get_parsed_or_default(config_keys::PASSPORT_LIST_LIMIT, defaults::PASSPORT_LIST_LIMIT)
    }

    pub fn get_scan_list_limit(&self) -> RepositoryResult<u32> {
        self.get_parsed_or_default(config_keys::SCAN_LIST_LIMIT, defaults::SCAN_LIST_LIMIT)
    }

    /// 按评估查询诊断/护照时的上限
    pub fn get_lca_for_target_limit(&self) -> RepositoryResult<u32> {
        self.get_parsed_or_default(config_keys::LCA_FOR_TARGET_LIMIT, defaults::LCA_FOR_TARGET_LIMIT)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 护照
    pub const QR_BASE_URL: &str = "qr_base_url";

    // 列表默认上限
    pub const LCA_LIST_LIMIT: &str = "lca_list_limit";
    pub const DOCTOR_LIST_LIMIT: &str = "doctor_list_limit";
    pub const PASSPORT_LIST_LIMIT: &str = "passport_list_limit";
    pub const SCAN_LIST_LIMIT: &str = "scan_list_limit";
    pub const LCA_FOR_TARGET_LIMIT: &str = "lca_for_target_limit";
}

pub mod defaults {
    pub const LCA_LIST_LIMIT: u32 = 100;
    pub const DOCTOR_LIST_LIMIT: u32 = 50;
    pub const PASSPORT_LIST_LIMIT: u32 = 50;
    pub const SCAN_LIST_LIMIT: u32 = 50;
    pub const LCA_FOR_TARGET_LIMIT: u32 = 100;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;

    fn create_test_manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = create_test_manager();
        assert_eq!(config.get_qr_base_url().unwrap(), "https://cycleweave.app");
        assert_eq!(config.get_lca_list_limit().unwrap(), 100);
        assert_eq!(config.get_doctor_list_limit().unwrap(), 50);
        assert_eq!(config.get_passport_list_limit().unwrap(), 50);
        assert_eq!(config.get_scan_list_limit().unwrap(), 50);
        assert_eq!(config.get_lca_for_target_limit().unwrap(), 100);
    }

    #[test]
    fn test_override_and_snapshot() {
        let config = create_test_manager();
        config
            .set_global_config_value(config_keys::QR_BASE_URL, "https://passport.example.org")
            .unwrap();
        config.set_global_config_value(config_keys::LCA_LIST_LIMIT, "20").unwrap();
        config.set_global_config_value(config_keys::LCA_LIST_LIMIT, "25").unwrap();

        assert_eq!(config.get_qr_base_url().unwrap(), "https://passport.example.org");
        assert_eq!(config.get_lca_list_limit().unwrap(), 25);

        let snapshot = config.get_config_snapshot().unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("lca_list_limit").map(String::as_str), Some("25"));
    }

    #[test]
    fn test_unparseable_value_is_field_error() {
        let config = create_test_manager();
        config.set_global_config_value(config_keys::SCAN_LIST_LIMIT, "many").unwrap();

        let err = config.get_scan_list_limit().unwrap_err();
        assert!(matches!(err, RepositoryError::FieldValueError { ref field, .. } if field == "scan_list_limit"));
    }
}
