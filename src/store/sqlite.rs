// src/store/sqlite.rs
//
// Durable store backing on rusqlite. One `documents` table keyed by
// (collection, id) with the record as a JSON column; partial updates
// are read-merge-write under the connection lock, which serializes all
// writers in this process and keeps each update atomic.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;
use tokio::sync::watch;

use crate::store::{Collection, DocStore, generate_doc_id, merge_fields};

pub struct SqliteStore {
    conn: Mutex<Connection>,
    publishers: HashMap<Collection, watch::Sender<Vec<Value>>>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                id         TEXT NOT NULL,
                doc        TEXT NOT NULL,
                updated_at INTEGER NOT NULL,
                PRIMARY KEY (collection, id)
            );",
        )?;

        let mut publishers = HashMap::new();
        for collection in Collection::ALL {
            let snapshot = read_collection(&conn, collection)?;
            let (tx, _rx) = watch::channel(snapshot);
            publishers.insert(collection, tx);
        }

        tracing::info!("📦 [STORE] sqlite store open at {:?}", path);
        Ok(Self {
            conn: Mutex::new(conn),
            publishers,
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| anyhow!("sqlite store poisoned"))
    }

    fn publish(&self, conn: &Connection, collection: Collection) -> Result<()> {
        let snapshot = read_collection(conn, collection)?;
        if let Some(tx) = self.publishers.get(&collection) {
            tx.send_replace(snapshot);
        }
        Ok(())
    }
}

fn read_collection(conn: &Connection, collection: Collection) -> Result<Vec<Value>> {
    let mut stmt =
        conn.prepare("SELECT doc FROM documents WHERE collection = ?1 ORDER BY id")?;
    let rows = stmt.query_map(params![collection.name()], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for raw in rows {
        let raw = raw?;
        match serde_json::from_str(&raw) {
            Ok(doc) => out.push(doc),
            Err(e) => tracing::warn!("⚠️ [STORE] undecodable document in {collection}: {e}"),
        }
    }
    Ok(out)
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[async_trait]
impl DocStore for SqliteStore {
    async fn create_or_replace(
        &self,
        collection: Collection,
        id: &str,
        record: Value,
    ) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO documents (collection, id, doc, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![collection.name(), id, record.to_string(), now_millis()],
        )?;
        self.publish(&conn, collection)
    }

    async fn create_with_generated_id(
        &self,
        collection: Collection,
        mut record: Value,
    ) -> Result<String> {
        let id = generate_doc_id(collection);
        if let Some(obj) = record.as_object_mut() {
            obj.insert("id".into(), Value::String(id.clone()));
        }
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO documents (collection, id, doc, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![collection.name(), id, record.to_string(), now_millis()],
        )?;
        self.publish(&conn, collection)?;
        Ok(id)
    }

    async fn update_fields(&self, collection: Collection, id: &str, fields: Value) -> Result<()> {
        let conn = self.lock()?;
        let raw: Option<String> = conn
            .query_row(
                "SELECT doc FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection.name(), id],
                |row| row.get(0),
            )
            .optional()?;
        let raw = raw.ok_or_else(|| anyhow!("no document {id} in {collection}"))?;

        let mut doc: Value = serde_json::from_str(&raw)?;
        merge_fields(&mut doc, &fields)?;

        conn.execute(
            "UPDATE documents SET doc = ?3, updated_at = ?4
             WHERE collection = ?1 AND id = ?2",
            params![collection.name(), id, doc.to_string(), now_millis()],
        )?;
        self.publish(&conn, collection)
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
            params![collection.name(), id],
        )?;
        self.publish(&conn, collection)
    }

    fn subscribe_all(&self, collection: Collection) -> watch::Receiver<Vec<Value>> {
        self.publishers
            .get(&collection)
            .map(|tx| tx.subscribe())
            .unwrap_or_else(|| watch::channel(Vec::new()).1)
    }
}
