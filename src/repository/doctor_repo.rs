// ==========================================
// CycleWeave LCA - 诊断报告数据仓储
// ==========================================
// 红线: 报告只插入不修改
// 存储: doctor_analysis (id + lca_id + doc_json)
// ==========================================

use crate::domain::doctor::DoctorAnalysis;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::{decode_docs, format_ts};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::sync::{Arc, Mutex};

pub struct DoctorAnalysisRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DoctorAnalysisRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, analysis: &DoctorAnalysis) -> RepositoryResult<String> {
        let doc_json = serde_json::to_string(analysis)?;
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO doctor_analysis (id, lca_id, doc_json, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                analysis.id,
                analysis.lca_id,
                doc_json,
                format_ts(analysis.created_at),
            ],
        )?;

        Ok(analysis.id.clone())
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<DoctorAnalysis>> {
        let conn = self.get_conn()?;

        let doc: Option<String> = conn
            .query_row(
                "SELECT doc_json FROM doctor_analysis WHERE id = ?1",
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
    pub fn list(&self, skip: u32, limit: u32) -> RepositoryResult<Vec<DoctorAnalysis>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT doc_json FROM doctor_analysis
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?1 OFFSET ?2
            "#,
        )?;

        let docs = stmt
            .query_map(params![limit, skip], |row| row.get::<_, String>(0))?
            .collect::<SqliteResult<Vec<_>>>()?;

        decode_docs(docs)
    }

    /// 查询某评估的全部报告 (按创建时间倒序)
    pub fn find_by_lca_id(&self, lca_id: &str, limit: u32) -> RepositoryResult<Vec<DoctorAnalysis>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT doc_json FROM doctor_analysis
            WHERE lca_id = ?1
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?2
            "#,
        )?;

        let docs = stmt
            .query_map(params![lca_id, limit], |row| row.get::<_, String>(0))?
            .collect::<SqliteResult<Vec<_>>>()?;

        decode_docs(docs)
    }
}
