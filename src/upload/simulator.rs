//! Upload simulator: one cancellable ticker per upload.

use super::local_file::LocalFile;
use super::strategy::{RandomStrategy, SimulationStrategy};
use super::task::{TickOutcome, UploadTask};
use crate::config::SimulationConfig;
use crate::error::ValidationError;
use crate::registry::{chunk_count, FileRecord, RegistryStore, CHUNK_SIZE_BYTES};
use crate::types::TaskId;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Timing and record-shaping parameters
#[derive(Debug, Clone)]
pub struct SimulatorSettings {
    pub tick_interval: Duration,
    pub chunk_size_bytes: u64,
    pub replica_count: usize,
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(500),
            chunk_size_bytes: CHUNK_SIZE_BYTES,
            replica_count: 2,
        }
    }
}

impl From<&SimulationConfig> for SimulatorSettings {
    fn from(config: &SimulationConfig) -> Self {
        Self {
            tick_interval: Duration::from_millis(config.tick_interval_ms.max(1)),
            chunk_size_bytes: config.chunk_size_bytes,
            replica_count: config.replica_count,
        }
    }
}

/// State shared between the simulator, its tickers, and outstanding handles
struct Shared {
    tasks: RwLock<Vec<UploadTask>>,
    tickers: Mutex<HashMap<TaskId, JoinHandle<()>>>,
    changed: Notify,
}

impl Shared {
    /// Stop the ticker for `task_id` and drop the task if it is still uploading.
    fn cancel(&self, task_id: TaskId) -> bool {
        if let Some(handle) = self.tickers.lock().remove(&task_id) {
            handle.abort();
        }

        let cancelled = {
            let mut tasks = self.tasks.write();
            let before = tasks.len();
            tasks.retain(|t| t.id != task_id || t.status.is_terminal());
            tasks.len() != before
        };

        if cancelled {
            info!(task_id = %task_id, "Cancelled upload");
            self.changed.notify_waiters();
        }
        cancelled
    }
}

/// Handle returned by [`UploadSimulator::start_upload`].
///
/// Dropping the handle does not cancel the upload; call [`UploadHandle::cancel`]
/// (or shut down the simulator) when the owner goes away.
#[derive(Clone)]
pub struct UploadHandle {
    task_id: TaskId,
    shared: Arc<Shared>,
}

impl UploadHandle {
    pub fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Stop the upload. Returns false if it had already completed.
    pub fn cancel(&self) -> bool {
        self.shared.cancel(self.task_id)
    }
}

/// Drives simulated uploads and inserts their records into the registry
pub struct UploadSimulator {
    store: Arc<RegistryStore>,
    strategy: Arc<dyn SimulationStrategy>,
    settings: SimulatorSettings,
    shared: Arc<Shared>,
}

impl UploadSimulator {
    pub fn new(
        store: Arc<RegistryStore>,
        strategy: Arc<dyn SimulationStrategy>,
        settings: SimulatorSettings,
    ) -> Self {
        Self {
            store,
            strategy,
            settings,
            shared: Arc::new(Shared {
                tasks: RwLock::new(Vec::new()),
                tickers: Mutex::new(HashMap::new()),
                changed: Notify::new(),
            }),
        }
    }

    /// Simulator with a random strategy built from configuration
    pub fn from_config(store: Arc<RegistryStore>, config: &SimulationConfig) -> Self {
        let strategy: Arc<dyn SimulationStrategy> = match config.seed {
            Some(seed) => Arc::new(RandomStrategy::seeded(
                seed,
                config.max_increment,
                config.node_count,
            )),
            None => Arc::new(RandomStrategy::new(config.max_increment, config.node_count)),
        };
        Self::new(store, strategy, SimulatorSettings::from(config))
    }

    /// Begin a simulated upload of `file` on behalf of `owner`.
    ///
    /// Must be called from within a tokio runtime. With no file selected this
    /// fails without creating a task.
    pub fn start_upload(
        &self,
        file: Option<LocalFile>,
        owner: &str,
    ) -> Result<UploadHandle, ValidationError> {
        let file = file.ok_or(ValidationError::NoFileSelected)?;
        let task = UploadTask::new(file.name.clone(), owner.to_string());
        let task_id = task.id;

        info!(
            task_id = %task_id,
            filename = %file.name,
            owner = %owner,
            size_bytes = file.size_bytes,
            "Starting simulated upload"
        );

        // Hold the ticker map while spawning so a fast ticker cannot finish
        // before its handle is registered.
        let mut tickers = self.shared.tickers.lock();
        self.shared.tasks.write().push(task);
        let ticker = Ticker {
            task_id,
            file,
            owner: owner.to_string(),
            store: Arc::clone(&self.store),
            strategy: Arc::clone(&self.strategy),
            settings: self.settings.clone(),
            shared: Arc::clone(&self.shared),
        };
        tickers.insert(task_id, tokio::spawn(ticker.run()));
        drop(tickers);

        Ok(UploadHandle {
            task_id,
            shared: Arc::clone(&self.shared),
        })
    }

    /// Cancel an upload by task id
    pub fn cancel(&self, task_id: TaskId) -> bool {
        self.shared.cancel(task_id)
    }

    /// Snapshot of all tasks in start order, including finished ones
    pub fn tasks(&self) -> Vec<UploadTask> {
        self.shared.tasks.read().clone()
    }

    pub fn task(&self, task_id: TaskId) -> Option<UploadTask> {
        self.shared
            .tasks
            .read()
            .iter()
            .find(|t| t.id == task_id)
            .cloned()
    }

    /// Number of uploads whose ticker is still running
    pub fn active_count(&self) -> usize {
        self.shared.tickers.lock().len()
    }

    /// Wait until the task reaches a terminal state.
    ///
    /// Returns `None` if the task was cancelled or never existed.
    pub async fn wait_for_completion(&self, task_id: TaskId) -> Option<UploadTask> {
        loop {
            let changed = self.shared.changed.notified();
            match self.task(task_id) {
                None => return None,
                Some(task) if task.status.is_terminal() => return Some(task),
                Some(_) => changed.await,
            }
        }
    }

    /// Wait until the task's progress differs from `seen` or it finishes.
    ///
    /// Returns `None` if the task was cancelled or never existed.
    pub async fn wait_for_progress(&self, task_id: TaskId, seen: f64) -> Option<UploadTask> {
        loop {
            let changed = self.shared.changed.notified();
            match self.task(task_id) {
                None => return None,
                Some(task) if task.status.is_terminal() || task.progress_percent != seen => {
                    return Some(task)
                }
                Some(_) => changed.await,
            }
        }
    }

    /// Cancel every in-flight upload
    pub fn shutdown(&self) {
        let ids: Vec<TaskId> = self.shared.tickers.lock().keys().copied().collect();
        for id in ids {
            self.shared.cancel(id);
        }
    }
}

impl Drop for UploadSimulator {
    fn drop(&mut self) {
        for (_, handle) in self.shared.tickers.lock().drain() {
            handle.abort();
        }
    }
}

/// Everything one ticker needs, moved into its spawned future
struct Ticker {
    task_id: TaskId,
    file: LocalFile,
    owner: String,
    store: Arc<RegistryStore>,
    strategy: Arc<dyn SimulationStrategy>,
    settings: SimulatorSettings,
    shared: Arc<Shared>,
}

impl Ticker {
    async fn run(self) {
        let period = self.settings.tick_interval;
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            let increment = self.strategy.progress_increment();

            let outcome = {
                let mut tasks = self.shared.tasks.write();
                let Some(task) = tasks.iter_mut().find(|t| t.id == self.task_id) else {
                    return;
                };
                let outcome = task.advance(increment);
                // Registry insert happens under the task lock: no reader sees a
                // completed task whose record is not yet in the store.
                if outcome == TickOutcome::Completed {
                    let record = self.synthesize_record();
                    info!(
                        task_id = %self.task_id,
                        file_id = %record.id,
                        primary_node = %record.primary_node,
                        chunks = record.chunk_count,
                        "Upload completed"
                    );
                    task.file_id = Some(record.id.clone());
                    self.store.add_file(record);
                }
                outcome
            };

            match outcome {
                TickOutcome::Progressed(progress) => {
                    debug!(task_id = %self.task_id, progress, "Upload progressed");
                    self.shared.changed.notify_waiters();
                }
                TickOutcome::Completed => {
                    self.shared.tickers.lock().remove(&self.task_id);
                    self.shared.changed.notify_waiters();
                    return;
                }
                TickOutcome::Ignored => {
                    self.shared.tickers.lock().remove(&self.task_id);
                    return;
                }
            }
        }
    }

    fn synthesize_record(&self) -> FileRecord {
        let primary_node = self.strategy.node_label();
        let replica_nodes = (0..self.settings.replica_count)
            .map(|_| self.strategy.node_label())
            .collect();

        FileRecord {
            id: self.store.next_file_id(),
            filename: self.file.name.clone(),
            size_bytes: self.file.size_bytes,
            owner: self.owner.clone(),
            uploaded_at: Utc::now(),
            primary_node,
            replica_nodes,
            mime_type: self.file.effective_mime_type().to_string(),
            chunk_count: chunk_count(self.file.size_bytes, self.settings.chunk_size_bytes),
        }
    }
}
