use std::sync::Arc;
use std::time::Duration;

use dfs_console::error::ValidationError;
use dfs_console::registry::RegistryStore;
use dfs_console::upload::{
    LocalFile, RandomStrategy, ScriptedStrategy, SimulationStrategy, SimulatorSettings,
    UploadSimulator, UploadStatus,
};

fn simulator(strategy: impl SimulationStrategy + 'static) -> (Arc<RegistryStore>, UploadSimulator) {
    let store = Arc::new(RegistryStore::in_memory());
    let sim = UploadSimulator::new(
        Arc::clone(&store),
        Arc::new(strategy),
        SimulatorSettings::default(),
    );
    (store, sim)
}

async fn upload_and_wait(sim: &UploadSimulator, file: LocalFile, owner: &str) -> String {
    let handle = sim.start_upload(Some(file), owner).unwrap();
    let task = sim.wait_for_completion(handle.task_id()).await.unwrap();
    task.file_id.unwrap()
}

#[tokio::test(start_paused = true)]
async fn chunk_boundary_at_ten_mebibytes() {
    let (store, sim) = simulator(ScriptedStrategy::constant(50.0, "node-2"));

    let exact = upload_and_wait(&sim, LocalFile::new("exact.bin", 10_485_760, ""), "kanish").await;
    let over = upload_and_wait(&sim, LocalFile::new("over.bin", 10_485_761, ""), "kanish").await;

    let exact = store.get_file(&exact).unwrap();
    let over = store.get_file(&over).unwrap();
    assert_eq!(exact.chunk_count, 1);
    assert_eq!(over.chunk_count, 2);
    assert_eq!(exact.owner, "kanish");
    assert_eq!(exact.mime_type, "application/octet-stream");
    assert_eq!(store.list_files()[0].filename, "over.bin");
}

#[tokio::test(start_paused = true)]
async fn missing_file_creates_no_task_and_no_record() {
    let (store, sim) = simulator(ScriptedStrategy::constant(50.0, "node-1"));
    let err = sim.start_upload(None, "aditya").err().unwrap();
    assert_eq!(err, ValidationError::NoFileSelected);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(sim.tasks().is_empty());
    assert_eq!(store.file_count(), 5);
}

#[tokio::test(start_paused = true)]
async fn random_progress_ends_at_exactly_one_hundred_once() {
    let (store, sim) = simulator(RandomStrategy::seeded(42, 15.0, 5));
    let handle = sim
        .start_upload(Some(LocalFile::new("dataset.csv", 3_000_000, "text/csv")), "ganesh")
        .unwrap();

    let mut seen = 0.0;
    let mut completions = 0;
    while let Some(task) = sim.wait_for_progress(handle.task_id(), seen).await {
        assert!(task.progress_percent >= seen);
        assert!(task.progress_percent <= 100.0);
        seen = task.progress_percent;
        if task.status == UploadStatus::Completed {
            completions += 1;
            break;
        }
    }
    assert_eq!(completions, 1);
    assert_eq!(seen, 100.0);

    // Further time passing does not produce more records.
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(store.file_count(), 6);
    let record = &store.list_files()[0];
    assert_eq!(record.mime_type, "text/csv");
    assert_eq!(record.replica_nodes.len(), 2);
    assert!(record.primary_node.starts_with("node-"));
}

#[tokio::test(start_paused = true)]
async fn cancelled_upload_never_produces_record() {
    let (store, sim) = simulator(ScriptedStrategy::constant(10.0, "node-1"));
    let handle = sim
        .start_upload(Some(LocalFile::new("slow.iso", 1, "")), "aditya")
        .unwrap();

    tokio::time::sleep(Duration::from_millis(1_600)).await;
    assert!(handle.cancel());
    assert!(sim.wait_for_completion(handle.task_id()).await.is_none());

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(store.file_count(), 5);
    assert_eq!(sim.active_count(), 0);
}
