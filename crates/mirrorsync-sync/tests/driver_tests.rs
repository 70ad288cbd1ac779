use mirrorsync_sync::{
    EventKind, LocalOps, MemorySink, Sleeper, SyncConfig, SyncDriver, SyncEvent, TreeSynchronizer,
};
use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

type Hook = Box<dyn Fn(usize) + Send + Sync>;

/// Returns immediately, remembering every requested period and running a
/// hook with the 1-based sleep number.
struct ScriptedSleeper {
    periods: Arc<Mutex<Vec<Duration>>>,
    hook: Hook,
}

impl ScriptedSleeper {
    fn new(hook: impl Fn(usize) + Send + Sync + 'static) -> (Self, Arc<Mutex<Vec<Duration>>>) {
        let periods = Arc::new(Mutex::new(Vec::new()));
        let sleeper = Self {
            periods: Arc::clone(&periods),
            hook: Box::new(hook),
        };
        (sleeper, periods)
    }
}

impl Sleeper for ScriptedSleeper {
    fn sleep(&self, period: Duration) -> impl Future<Output = ()> + Send {
        let count = {
            let mut periods = self.periods.lock().unwrap();
            periods.push(period);
            periods.len()
        };
        (self.hook)(count);
        std::future::ready(())
    }
}

fn roots(temp: &TempDir) -> (PathBuf, PathBuf) {
    let source = temp.path().join("source");
    fs::create_dir(&source).unwrap();
    fs::write(source.join("a.txt"), "hello").unwrap();
    (source, temp.path().join("replica"))
}

fn config(source: &Path, replica: &Path, max_ticks: Option<u64>) -> SyncConfig {
    let mut config = SyncConfig::new(source, replica, source.with_file_name("sync.log"), 7);
    config.max_ticks = max_ticks;
    config
}

fn driver(config: &SyncConfig, sleeper: ScriptedSleeper) -> SyncDriver<MemorySink, LocalOps, ScriptedSleeper> {
    let synchronizer = TreeSynchronizer::from_config(config, MemorySink::new(), LocalOps::new());
    SyncDriver::with_parts(config, synchronizer, sleeper)
}

fn events<Z: Sleeper>(driver: &SyncDriver<MemorySink, LocalOps, Z>) -> Vec<SyncEvent> {
    driver.synchronizer().unwrap().sink().events().to_vec()
}

#[tokio::test]
async fn test_runs_bounded_number_of_ticks() {
    let temp = TempDir::new().unwrap();
    let (source, replica) = roots(&temp);
    let config = config(&source, &replica, Some(3));
    let (sleeper, periods) = ScriptedSleeper::new(|_| {});

    let mut driver = driver(&config, sleeper);
    let summary = driver.run(CancellationToken::new()).await.unwrap();

    assert_eq!(summary.ticks, 3);
    assert_eq!(summary.skipped_ticks, 0);
    // No sleep after the final tick
    assert_eq!(*periods.lock().unwrap(), vec![Duration::from_secs(7); 2]);
    assert_eq!(fs::read_to_string(replica.join("a.txt")).unwrap(), "hello");
}

#[tokio::test]
async fn test_replica_root_created_once() {
    let temp = TempDir::new().unwrap();
    let (source, replica) = roots(&temp);
    let config = config(&source, &replica, Some(2));
    let (sleeper, _) = ScriptedSleeper::new(|_| {});

    let mut driver = driver(&config, sleeper);
    let summary = driver.run(CancellationToken::new()).await.unwrap();

    assert_eq!(summary.folders_created, 1);
    assert_eq!(summary.files_copied, 1);
    assert_eq!(
        events(&driver),
        vec![
            SyncEvent::created_folder(&replica),
            SyncEvent::copied(source.join("a.txt"), replica.join("a.txt"), 5),
        ]
    );
}

#[tokio::test]
async fn test_cancellation_stops_between_ticks() {
    let temp = TempDir::new().unwrap();
    let (source, replica) = roots(&temp);
    let config = config(&source, &replica, None);
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let (sleeper, periods) = ScriptedSleeper::new(move |n| {
        if n == 2 {
            trigger.cancel();
        }
    });

    let mut driver = driver(&config, sleeper);
    let summary = driver.run(cancel).await.unwrap();

    assert_eq!(summary.ticks, 2);
    assert_eq!(periods.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_already_cancelled_runs_nothing() {
    let temp = TempDir::new().unwrap();
    let (source, replica) = roots(&temp);
    let config = config(&source, &replica, None);
    let cancel = CancellationToken::new();
    cancel.cancel();
    let (sleeper, _) = ScriptedSleeper::new(|_| {});

    let mut driver = driver(&config, sleeper);
    let summary = driver.run(cancel).await.unwrap();

    assert_eq!(summary.ticks, 0);
    assert!(!replica.exists());
}

#[tokio::test]
async fn test_source_changes_picked_up_on_next_tick() {
    let temp = TempDir::new().unwrap();
    let (source, replica) = roots(&temp);
    let config = config(&source, &replica, Some(3));
    let edit_source = source.clone();
    let (sleeper, _) = ScriptedSleeper::new(move |n| match n {
        1 => fs::write(edit_source.join("a.txt"), "hello again").unwrap(),
        2 => fs::remove_file(edit_source.join("a.txt")).unwrap(),
        _ => {}
    });

    let mut driver = driver(&config, sleeper);
    let summary = driver.run(CancellationToken::new()).await.unwrap();

    assert_eq!(summary.ticks, 3);
    assert_eq!(summary.files_copied, 2);
    assert_eq!(summary.files_deleted, 1);
    assert!(!replica.join("a.txt").exists());

    let kinds: Vec<EventKind> = events(&driver).iter().map(SyncEvent::kind).collect();
    assert_eq!(
        kinds,
        vec![
            EventKind::CreatedFolder,
            EventKind::Copied,
            EventKind::Copied,
            EventKind::Deleted,
        ]
    );
}

#[tokio::test]
async fn test_unusable_replica_root_skips_ticks() {
    let temp = TempDir::new().unwrap();
    let (source, replica) = roots(&temp);
    fs::write(&replica, "a file where the replica should be").unwrap();
    let config = config(&source, &replica, Some(2));
    let (sleeper, _) = ScriptedSleeper::new(|_| {});

    let mut driver = driver(&config, sleeper);
    let summary = driver.run(CancellationToken::new()).await.unwrap();

    assert_eq!(summary.ticks, 0);
    assert_eq!(summary.skipped_ticks, 2);
    assert!(events(&driver).is_empty());
}

#[tokio::test]
async fn test_single_tick() {
    let temp = TempDir::new().unwrap();
    let (source, replica) = roots(&temp);
    let config = config(&source, &replica, None);

    let mut driver = SyncDriver::new(&config, MemorySink::new());
    let report = driver.tick().await.unwrap().unwrap();

    assert_eq!(report.files_copied, 1);
    assert_eq!(driver.summary().ticks, 1);
    assert_eq!(driver.synchronizer().unwrap().sink().count(EventKind::CreatedFolder), 1);
}
