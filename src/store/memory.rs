// src/store/memory.rs
//
// In-process store backing. Documents live in a mutex-guarded map and
// every mutation republishes the owning collection over a watch
// channel, which gives subscribers exactly the live-view semantics of
// the contract: latest snapshot wins, same-record writes observed in
// write order. Default backing for a single-host workshop and for the
// integration tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::watch;

use crate::store::{Collection, DocStore, generate_doc_id, merge_fields};

pub struct MemoryStore {
    docs: Mutex<HashMap<Collection, BTreeMap<String, Value>>>,
    publishers: HashMap<Collection, watch::Sender<Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let mut docs = HashMap::new();
        let mut publishers = HashMap::new();
        for collection in Collection::ALL {
            docs.insert(collection, BTreeMap::new());
            let (tx, _rx) = watch::channel(Vec::new());
            publishers.insert(collection, tx);
        }
        Self {
            docs: Mutex::new(docs),
            publishers,
        }
    }

    fn publish(&self, collection: Collection, snapshot: Vec<Value>) {
        if let Some(tx) = self.publishers.get(&collection) {
            // send_replace: publishing must not depend on anyone listening
            tx.send_replace(snapshot);
        }
    }

    fn with_collection<T>(
        &self,
        collection: Collection,
        f: impl FnOnce(&mut BTreeMap<String, Value>) -> Result<T>,
    ) -> Result<T> {
        let mut docs = self
            .docs
            .lock()
            .map_err(|_| anyhow!("memory store poisoned"))?;
        let map = docs
            .get_mut(&collection)
            .ok_or_else(|| anyhow!("unknown collection {collection}"))?;
        let out = f(map)?;
        let snapshot = map.values().cloned().collect();
        drop(docs);
        self.publish(collection, snapshot);
        Ok(out)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocStore for MemoryStore {
    async fn create_or_replace(
        &self,
        collection: Collection,
        id: &str,
        record: Value,
    ) -> Result<()> {
        self.with_collection(collection, |map| {
            map.insert(id.to_string(), record);
            Ok(())
        })
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
        self.with_collection(collection, |map| {
            map.insert(id.clone(), record);
            Ok(())
        })?;
        Ok(id)
    }

    async fn update_fields(&self, collection: Collection, id: &str, fields: Value) -> Result<()> {
        self.with_collection(collection, |map| {
            let doc = map
                .get_mut(id)
                .ok_or_else(|| anyhow!("no document {id} in {collection}"))?;
            merge_fields(doc, &fields)
        })
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        self.with_collection(collection, |map| {
            map.remove(id);
            Ok(())
        })
    }

    fn subscribe_all(&self, collection: Collection) -> watch::Receiver<Vec<Value>> {
        self.publishers
            .get(&collection)
            .map(|tx| tx.subscribe())
            .unwrap_or_else(|| watch::channel(Vec::new()).1)
    }
}
