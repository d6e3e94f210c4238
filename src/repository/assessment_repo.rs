// ==========================================
// CycleWeave LCA - 评估记录数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑 (派生字段由调用方计算)
// 存储: lca_assessment (id + doc_json)
// ==========================================

use crate::domain::assessment::AssessmentRecord;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::{decode_docs, format_ts};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::sync::{Arc, Mutex};

// ==========================================
// AssessmentRepository - 评估记录仓储
// ==========================================
pub struct AssessmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AssessmentRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 插入评估记录
    ///
    /// # 返回
    /// - Ok(id): 记录ID
    pub fn insert(&self, record: &AssessmentRecord) -> RepositoryResult<String> {
        let doc_json = serde_json::to_string(record)?;
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO lca_assessment (id, doc_json, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                record.id,
                doc_json,
                format_ts(record.created_at),
                format_ts(record.updated_at),
            ],
        )?;

        Ok(record.id.clone())
    }

    /// 整体替换评估记录文档
    ///
    /// # 返回
    /// - Err(NotFound): 记录不存在
    pub fn update(&self, record: &AssessmentRecord) -> RepositoryResult<()> {
        let doc_json = serde_json::to_string(record)?;
        let conn = self.get_conn()?;

        let rows = conn.execute(
            "UPDATE lca_assessment SET doc_json = ?1, updated_at = ?2 WHERE id = ?3",
            params![doc_json, format_ts(record.updated_at), record.id],
        )?;

        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "AssessmentRecord".to_string(),
                id: record.id.clone(),
            });
        }

        Ok(())
    }

    /// 删除评估记录 (物理删除)
    ///
    /// # 返回
    /// - Ok(rows): 被删除的行数 (0 表示不存在)
    pub fn delete(&self, id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let rows = conn.execute("DELETE FROM lca_assessment WHERE id = ?1", params![id])?;
        Ok(rows)
    }

    // ==========================================
    // 查询操作
    // ==========================================

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<AssessmentRecord>> {
        let conn = self.get_conn()?;

        let doc: Option<String> = conn
            .query_row(
                "SELECT doc_json FROM lca_assessment WHERE id = ?1",
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
    pub fn list(&self, skip: u32, limit: u32) -> RepositoryResult<Vec<AssessmentRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT doc_json FROM lca_assessment
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?1 OFFSET ?2
            "#,
        )?;

        let docs = stmt
            .query_map(params![limit, skip], |row| row.get::<_, String>(0))?
            .collect::<SqliteResult<Vec<_>>>()?;

        decode_docs(docs)
    }
}
