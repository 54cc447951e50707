// SQLite 持久化消息存储
//
// 表结构：message(id, text, is_user, created_at)
// 全量查询按 id 升序，最近消息按 id 降序取 N 条后再反转为时间顺序

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::path::Path;
use tokio::sync::Mutex;
use tokio_rusqlite::Connection;
use tracing::{debug, info};

use super::message_feed::MessageFeed;
use crate::modules::chat::domain::{Message, MessageId, NewMessage, Sender};
use crate::modules::chat::ports::{MessageStore, MessageStream, StoreError};

type MessageRow = (i64, String, bool, i64);

const SELECT_ALL: &str = "SELECT id, text, is_user, created_at FROM message ORDER BY id ASC";

const SELECT_RECENT: &str =
    "SELECT id, text, is_user, created_at FROM message ORDER BY id DESC LIMIT ?1";

/// SQLite 消息存储
pub struct SqliteMessageStore {
    conn: Connection,
    /// 串行化追加与清空，保证 ID 分配与实时视图一致
    write_lock: Mutex<()>,
    feed: MessageFeed,
}

impl SqliteMessageStore {
    /// 打开（或创建）数据库文件
    ///
    /// # Arguments
    /// * `path` - 数据库文件路径
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::DatabaseError(e.to_string()))?;
        }

        info!("Opening message database at {:?}", path);
        let conn = Connection::open(path).await?;
        Self::with_connection(conn).await
    }

    /// 内存数据库（测试用）
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().await?;
        Self::with_connection(conn).await
    }

    async fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.call(|conn| {
            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS message (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    text TEXT NOT NULL,
                    is_user INTEGER NOT NULL,
                    created_at INTEGER NOT NULL
                );",
            )?;
            Ok(())
        })
        .await?;

        let existing = Self::load_all(&conn).await?;
        debug!("Loaded {} stored messages", existing.len());

        Ok(Self {
            conn,
            write_lock: Mutex::new(()),
            feed: MessageFeed::new(existing),
        })
    }

    async fn load_all(conn: &Connection) -> Result<Vec<Message>, StoreError> {
        let rows = conn
            .call(|conn| {
                let mut stmt = conn.prepare(SELECT_ALL)?;
                let rows = stmt
                    .query_map([], read_row)?
                    .collect::<Result<Vec<_>, rusqlite::Error>>()?;
                Ok(rows)
            })
            .await?;

        rows.into_iter().map(to_message).collect()
    }
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn to_message((id, text, is_user, created_at): MessageRow) -> Result<Message, StoreError> {
    Ok(Message::restore(
        MessageId::new(id),
        text,
        Sender::from_is_user(is_user),
        from_millis(created_at)?,
    ))
}

fn from_millis(millis: i64) -> Result<DateTime<Utc>, StoreError> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| StoreError::Corrupted(format!("invalid timestamp {}", millis)))
}

#[async_trait]
impl MessageStore for SqliteMessageStore {
    async fn append(&self, message: NewMessage) -> Result<Message, StoreError> {
        let _guard = self.write_lock.lock().await;

        let created_at = from_millis(Utc::now().timestamp_millis())?;
        let millis = created_at.timestamp_millis();
        let text = message.text().to_string();
        let is_user = message.sender().is_user();

        let id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO message (text, is_user, created_at) VALUES (?1, ?2, ?3)",
                    rusqlite::params![text, is_user, millis],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;

        let stored = message.into_message(MessageId::new(id), created_at);
        self.feed.push(stored.clone());

        Ok(stored)
    }

    async fn all(&self) -> Result<Vec<Message>, StoreError> {
        Self::load_all(&self.conn).await
    }

    fn watch(&self) -> MessageStream {
        self.feed.subscribe()
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Message>, StoreError> {
        let limit = i64::try_from(limit)
            .map_err(|_| StoreError::DatabaseError("limit exceeds i64".to_string()))?;

        let mut rows = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(SELECT_RECENT)?;
                let rows = stmt
                    .query_map(rusqlite::params![limit], read_row)?
                    .collect::<Result<Vec<_>, rusqlite::Error>>()?;
                Ok(rows)
            })
            .await?;

        // 降序结果反转为时间顺序
        rows.reverse();
        rows.into_iter().map(to_message).collect()
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .call(|conn| {
                let count = conn.query_row("SELECT COUNT(*) FROM message", [], |row| row.get(0))?;
                Ok(count)
            })
            .await?;

        usize::try_from(count).map_err(|e| StoreError::Corrupted(e.to_string()))
    }

    async fn clear(&self) -> Result<usize, StoreError> {
        let _guard = self.write_lock.lock().await;

        let removed = self
            .conn
            .call(|conn| {
                let tx = conn.transaction()?;
                let removed = tx.execute("DELETE FROM message", [])?;
                tx.commit()?;
                Ok(removed)
            })
            .await?;

        self.feed.reset();
        info!("Cleared {} messages", removed);

        Ok(removed)
    }
}
