use async_trait::async_trait;
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::{sync::Mutex, task::JoinHandle};
use tower_sessions::{
    cookie::time::OffsetDateTime,
    session::{Id, Record},
    session_store::{self, ExpiredDeletion},
};
use tracing::{debug, warn};

/// Session records held in process memory.
///
/// Expired records are dropped when they are next loaded and by
/// [`ExpiredDeletion::delete_expired`], so abandoned carts do not outlive their session.
#[derive(Clone, Debug, Default)]
pub struct ExpiringMemoryStore {
    records: Arc<Mutex<HashMap<Id, Record>>>,
}

impl ExpiringMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held, expired or not
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

fn is_active(record: &Record, now: OffsetDateTime) -> bool {
    record.expiry_date > now
}

#[async_trait]
impl session_store::SessionStore for ExpiringMemoryStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        let mut records = self.records.lock().await;
        while records.contains_key(&record.id) {
            record.id = Id::default();
        }
        records.insert(record.id, record.clone());
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.records.lock().await.insert(record.id, record.clone());
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let mut records = self.records.lock().await;
        match records.get(session_id) {
            Some(record) if is_active(record, OffsetDateTime::now_utc()) => Ok(Some(record.clone())),
            Some(_) => {
                records.remove(session_id);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.records.lock().await.remove(session_id);
        Ok(())
    }
}

#[async_trait]
impl ExpiredDeletion for ExpiringMemoryStore {
    async fn delete_expired(&self) -> session_store::Result<()> {
        let now = OffsetDateTime::now_utc();
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|_, record| is_active(record, now));

        let removed = before - records.len();
        if removed > 0 {
            debug!(removed, remaining = records.len(), "Deleted expired sessions");
        }
        Ok(())
    }
}

/// Sweep expired sessions every `period` until the returned task is aborted
pub fn spawn_expired_session_cleanup(
    store: ExpiringMemoryStore,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // First tick fires immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            if let Err(e) = store.delete_expired().await {
                warn!("Failed to delete expired sessions: {}", e);
            }
        }
    })
}
