// ==========================================
// CycleWeave LCA - 材料护照数据仓储
// ==========================================
// 存储: passport (id + passport_id 唯一 + lca_id + doc_json)
// 查询支持存储ID 与护照编号两种键
// ==========================================

use crate::domain::passport::MaterialPassport;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::{decode_docs, format_ts};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::sync::{Arc, Mutex};

/// 护照查询键
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassportKey<'a> {
    Id(&'a str),
    PassportId(&'a str),
}

impl PassportKey<'_> {
    fn column(&self) -> &'static str {
        match self {
            PassportKey::Id(_) => "id",
            PassportKey::PassportId(_) => "passport_id",
        }
    }

    fn value(&self) -> &str {
        match self {
            PassportKey::Id(v) | PassportKey::PassportId(v) => v,
        }
    }
}

pub struct PassportRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PassportRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入护照
    ///
    /// # 返回
    /// - Err(UniqueConstraintViolation): 护照编号重复
    pub fn insert(&self, passport: &MaterialPassport) -> RepositoryResult<String> {
        let doc_json = serde_json::to_string(passport)?;
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO passport (id, passport_id, lca_id, doc_json, generated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                passport.id,
                passport.draft.passport_id,
                passport.lca_id,
                doc_json,
                format_ts(passport.draft.generated_at),
            ],
        )?;

        Ok(passport.id.clone())
    }

    pub fn find(&self, key: PassportKey<'_>) -> RepositoryResult<Option<MaterialPassport>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT doc_json FROM passport WHERE {} = ?1", key.column());

        let doc: Option<String> = conn
            .query_row(&sql, params![key.value()], |row| row.get(0))
            .optional()?;

        match doc {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// 分页查询 (按生成时间倒序)
    pub fn list(&self, skip: u32, limit: u32) -> RepositoryResult<Vec<MaterialPassport>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT doc_json FROM passport
            ORDER BY generated_at DESC, rowid DESC
            LIMIT ?1 OFFSET ?2
            "#,
        )?;

        let docs = stmt
            .query_map(params![limit, skip], |row| row.get::<_, String>(0))?
            .collect::<SqliteResult<Vec<_>>>()?;

        decode_docs(docs)
    }

    /// 查询某评估的全部护照
    pub fn find_by_lca_id(&self, lca_id: &str, limit: u32) -> RepositoryResult<Vec<MaterialPassport>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT doc_json FROM passport
            WHERE lca_id = ?1
            ORDER BY generated_at DESC, rowid DESC
            LIMIT ?2
            "#,
        )?;

        let docs = stmt
            .query_map(params![lca_id, limit], |row| row.get::<_, String>(0))?
            .collect::<SqliteResult<Vec<_>>>()?;

        decode_docs(docs)
    }

    /// 删除护照
    ///
    /// # 返回
    /// - Ok(rows): 被删除的行数 (0 表示不存在)
    pub fn delete(&self, key: PassportKey<'_>) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let sql = format!("DELETE FROM passport WHERE {} = ?1", key.column());
        let rows = conn.execute(&sql, params![key.value()])?;
        Ok(rows)
    }
}
