// ==========================================
// CycleWeave LCA - 扫描结果数据仓储
// ==========================================
// 存储: scan_result (id + lca_id + doc_json)
// ==========================================

use crate::domain::scan::ScanResult;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::{decode_docs, format_ts};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::sync::{Arc, Mutex};

pub struct ScanResultRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ScanResultRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, scan: &ScanResult) -> RepositoryResult<String> {
        let doc_json = serde_json::to_string(scan)?;
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO scan_result (id, lca_id, doc_json, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![scan.id, scan.lca_id, doc_json, format_ts(scan.created_at)],
        )?;

        Ok(scan.id.clone())
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<ScanResult>> {
        let conn = self.get_conn()?;

        let doc: Option<String> = conn
            .query_row(
                "SELECT doc_json FROM scan_result WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;

        match doc {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// 分页查询 (按创建时间倒序)
    pub fn list(&self, skip: u32, limit: u32) -> RepositoryResult<Vec<ScanResult>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT doc_json FROM scan_result
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?1 OFFSET ?2
            "#,
        )?;

        let docs = stmt
            .query_map(params![limit, skip], |row| row.get::<_, String>(0))?
            .collect::<SqliteResult<Vec<_>>>()?;

        decode_docs(docs)
    }

    /// 将扫描结果关联到评估记录
    pub fn link_to_assessment(&self, scan: &ScanResult, lca_id: &str) -> RepositoryResult<()> {
        let mut linked = scan.clone();
        linked.lca_id = Some(lca_id.to_string());
        let doc_json = serde_json::to_string(&linked)?;

        let conn = self.get_conn()?;
        let rows = conn.execute(
            "UPDATE scan_result SET lca_id = ?1, doc_json = ?2 WHERE id = ?3",
            params![lca_id, doc_json, scan.id],
        )?;

        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "ScanResult".to_string(),
                id: scan.id.clone(),
            });
        }

        Ok(())
    }
}
