use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use mockall::mock;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::domain::database::connection_string::ConnectionString;
use crate::domain::database::engine::{
    DatabaseEngine, DatabaseSession, EngineFactory, PoolStatus,
};
use crate::domain::database::pool_settings::PoolSettings;
use crate::domain::database::schema::SchemaRegistry;
use crate::domain::errors::DatabaseError;
use crate::domain::logger::Logger;

mock! {
    pub Log {}

    impl Logger for Log {
        fn info(&self, message: &str);
        fn warn(&self, message: &str);
        fn error(&self, message: &str);
        fn debug(&self, message: &str);
    }
}

pub fn permissive_logger() -> Arc<dyn Logger> {
    let mut logger = MockLog::new();
    logger.expect_info().returning(|_| ());
    logger.expect_warn().returning(|_| ());
    logger.expect_error().returning(|_| ());
    logger.expect_debug().returning(|_| ());
    Arc::new(logger)
}

/// Statements containing this marker fail inside a fake session.
pub const FAILING_STATEMENT: &str = "SELECT FAIL";

#[derive(Default)]
struct Journal {
    events: Mutex<Vec<String>>,
}

impl Journal {
    fn record(&self, event: impl Into<String>) {
        self.events.lock().unwrap().push(event.into());
    }

    fn snapshot(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

/// In-memory pool bounded by a semaphore, recording every session event.
pub struct FakeEngine {
    permits: Arc<Semaphore>,
    max_connections: u32,
    acquire_timeout: Duration,
    journal: Arc<Journal>,
    open: Arc<AtomicU32>,
    peak: Arc<AtomicU32>,
    created_tables: Mutex<BTreeSet<String>>,
    create_all_calls: AtomicUsize,
    fail_create_all: bool,
    fail_dispose: bool,
    disposed: AtomicBool,
}

impl FakeEngine {
    pub fn new(settings: &PoolSettings) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(settings.max_connections() as usize)),
            max_connections: settings.max_connections(),
            acquire_timeout: settings.acquire_timeout,
            journal: Arc::new(Journal::default()),
            open: Arc::new(AtomicU32::new(0)),
            peak: Arc::new(AtomicU32::new(0)),
            created_tables: Mutex::new(BTreeSet::new()),
            create_all_calls: AtomicUsize::new(0),
            fail_create_all: false,
            fail_dispose: false,
            disposed: AtomicBool::new(false),
        }
    }

    pub fn failing_create_all(mut self) -> Self {
        self.fail_create_all = true;
        self
    }

    pub fn failing_dispose(mut self) -> Self {
        self.fail_dispose = true;
        self
    }

    pub fn events(&self) -> Vec<String> {
        self.journal.snapshot()
    }

    /// Counts events named `name`, including `name:<detail>` entries.
    pub fn count(&self, name: &str) -> usize {
        let prefix = format!("{name}:");
        self.journal
            .snapshot()
            .iter()
            .filter(|event| event.as_str() == name || event.starts_with(&prefix))
            .count()
    }

    pub async fn wait_for(&self, name: &str, expected: usize) {
        let waited = tokio::time::timeout(Duration::from_secs(5), async {
            while self.count(name) < expected {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await;
        assert!(waited.is_ok(), "timed out waiting for {expected} `{name}` events");
    }

    pub fn open_connections(&self) -> u32 {
        self.open.load(Ordering::SeqCst)
    }

    pub fn peak_connections(&self) -> u32 {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn created_tables(&self) -> Vec<String> {
        self.created_tables.lock().unwrap().iter().cloned().collect()
    }

    pub fn create_all_calls(&self) -> usize {
        self.create_all_calls.load(Ordering::SeqCst)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatabaseEngine for FakeEngine {
    async fn acquire(&self) -> Result<Box<dyn DatabaseSession>, DatabaseError> {
        if self.is_disposed() {
            return Err(DatabaseError::UseAfterDispose);
        }
        let permit = tokio::time::timeout(self.acquire_timeout, self.permits.clone().acquire_owned())
            .await
            .map_err(|_| DatabaseError::session("timed out waiting for a pooled connection"))?
            .map_err(|_| DatabaseError::UseAfterDispose)?;

        let open = self.open.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(open, Ordering::SeqCst);
        self.journal.record("acquire");

        Ok(Box::new(FakeSession {
            permit: Some(permit),
            open: self.open.clone(),
            journal: self.journal.clone(),
        }))
    }

    async fn create_all(&self, registry: &SchemaRegistry) -> Result<(), DatabaseError> {
        self.create_all_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_create_all {
            return Err(DatabaseError::initialization(
                "permission denied for schema public",
            ));
        }
        let mut created = self.created_tables.lock().unwrap();
        for table in registry.tables() {
            created.insert(table.name.clone());
        }
        Ok(())
    }

    async fn dispose(&self) -> Result<(), DatabaseError> {
        self.disposed.store(true, Ordering::SeqCst);
        self.permits.close();
        if self.fail_dispose {
            return Err(DatabaseError::disposal("connection reset while terminating"));
        }
        Ok(())
    }

    fn status(&self) -> PoolStatus {
        PoolStatus {
            size: self.open_connections(),
            idle: 0,
            max_connections: self.max_connections,
        }
    }
}

struct FakeSession {
    permit: Option<OwnedSemaphorePermit>,
    open: Arc<AtomicU32>,
    journal: Arc<Journal>,
}

#[async_trait]
impl DatabaseSession for FakeSession {
    async fn execute(&mut self, statement: &str) -> Result<u64, DatabaseError> {
        if statement.contains(FAILING_STATEMENT) {
            self.journal.record("execute_failed");
            return Err(DatabaseError::session("syntax error at or near \"FAIL\""));
        }
        self.journal.record(format!("execute:{statement}"));
        Ok(1)
    }

    async fn commit(&mut self) -> Result<(), DatabaseError> {
        self.journal.record("commit");
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), DatabaseError> {
        self.journal.record("rollback");
        Ok(())
    }

    async fn close(&mut self) -> Result<(), DatabaseError> {
        if self.permit.take().is_some() {
            self.open.fetch_sub(1, Ordering::SeqCst);
            self.journal.record("close");
        } else {
            self.journal.record("close_again");
        }
        Ok(())
    }
}

/// Hands out one shared [`FakeEngine`] and counts how often it was asked to.
pub struct FakeFactory {
    pub engine: Arc<FakeEngine>,
    created: AtomicUsize,
}

impl FakeFactory {
    pub fn new(engine: FakeEngine) -> Self {
        Self {
            engine: Arc::new(engine),
            created: AtomicUsize::new(0),
        }
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl EngineFactory for FakeFactory {
    fn create(
        &self,
        _url: &ConnectionString,
        _settings: &PoolSettings,
    ) -> Result<Arc<dyn DatabaseEngine>, DatabaseError> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(self.engine.clone())
    }
}
