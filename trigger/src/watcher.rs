use crate::error::{Error, ErrorKind};
use events::{EventPublisher, TriggerEvent};
use log::*;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tokio::fs;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

/// The highest marker modification time seen so far.
///
/// `None` sits below every real timestamp. The value only ever moves forward:
/// a marker restored to an older mtime stays silent until it passes the
/// previous maximum.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TriggerState {
    last_observed: Option<SystemTime>,
}

impl TriggerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_observed(&self) -> Option<SystemTime> {
        self.last_observed
    }

    /// Records `modified_at` if it is strictly newer than anything seen before.
    /// Returns `true` when it was recorded, meaning an update must be emitted.
    pub fn observe(&mut self, modified_at: SystemTime) -> bool {
        match self.last_observed {
            Some(last) if modified_at <= last => false,
            _ => {
                self.last_observed = Some(modified_at);
                true
            }
        }
    }
}

/// Polls a marker file and publishes a [`TriggerEvent`] whenever its
/// modification time increases.
pub struct MarkerWatcher {
    marker: PathBuf,
    poll_interval: Duration,
    state: TriggerState,
    publisher: EventPublisher,
}

impl MarkerWatcher {
    pub fn new(
        marker: impl Into<PathBuf>,
        poll_interval: Duration,
        publisher: EventPublisher,
    ) -> Self {
        Self {
            marker: marker.into(),
            poll_interval,
            state: TriggerState::new(),
            publisher,
        }
    }

    /// Checks the marker once, publishing and returning the event if it changed.
    pub async fn poll_once(&mut self) -> Result<Option<TriggerEvent>, Error> {
        let Some(modified_at) = self.read_modified().await? else {
            trace!("Marker {} does not exist yet", self.marker.display());
            return Ok(None);
        };

        // State moves first so an event is never detected twice.
        if !self.state.observe(modified_at) {
            return Ok(None);
        }

        let event = TriggerEvent::MarkerUpdated {
            marker: self.marker.clone(),
            modified_at,
        };
        debug!("Detected marker change: {event:?}");
        self.publisher.publish(event.clone()).await;
        Ok(Some(event))
    }

    /// Polls forever at the configured interval. Read failures are logged and
    /// the loop carries on.
    pub async fn run(mut self) {
        info!(
            "Watching marker {} every {:?}",
            self.marker.display(),
            self.poll_interval
        );

        let mut ticker = time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if let Err(e) = self.poll_once().await {
                warn!("{e}");
            }
        }
    }

    /// Runs the watcher on its own task for the lifetime of the process.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn read_modified(&self) -> Result<Option<SystemTime>, Error> {
        let metadata = match fs::metadata(&self.marker).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::new(ErrorKind::Metadata, self.marker.clone(), e)),
        };

        metadata
            .modified()
            .map(Some)
            .map_err(|e| Error::new(ErrorKind::ModifiedTime, self.marker.clone(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use events::EventHandler;
    use std::fs::{File, OpenOptions};
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use std::time::UNIX_EPOCH;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<TriggerEvent>>,
    }

    impl Recorder {
        fn count(&self) -> usize {
            self.events.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl EventHandler for Recorder {
        async fn handle(&self, event: &TriggerEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    fn touch(path: &Path, modified: SystemTime) {
        let file: File = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)
            .unwrap();
        file.set_modified(modified).unwrap();
    }

    fn watcher(dir: &TempDir, poll_interval: Duration) -> (MarkerWatcher, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        let publisher = EventPublisher::new().with_handler(recorder.clone());
        (
            MarkerWatcher::new(dir.path().join(".trigger"), poll_interval, publisher),
            recorder,
        )
    }

    fn modified_at(event: Option<TriggerEvent>) -> Option<SystemTime> {
        event.map(|TriggerEvent::MarkerUpdated { modified_at, .. }| modified_at)
    }

    #[test]
    fn test_state_emits_once_per_strict_increase() {
        let mut state = TriggerState::new();
        let observed: Vec<bool> = [10, 10, 11, 12, 12, 13]
            .into_iter()
            .map(|secs| state.observe(at(secs)))
            .collect();
        assert_eq!(observed, [true, false, true, true, false, true]);
        assert_eq!(state.last_observed(), Some(at(13)));
    }

    #[test]
    fn test_state_ignores_timestamps_moving_backward() {
        let mut state = TriggerState::new();
        assert!(state.observe(at(100)));
        assert!(!state.observe(at(50)));
        assert!(!state.observe(at(100)));
        assert_eq!(state.last_observed(), Some(at(100)));
        assert!(state.observe(at(101)));
    }

    #[test]
    fn test_state_accepts_any_first_timestamp() {
        let mut state = TriggerState::new();
        assert!(state.observe(UNIX_EPOCH));
    }

    #[tokio::test]
    async fn test_missing_marker_is_not_a_change() {
        let dir = TempDir::new().unwrap();
        let (mut watcher, recorder) = watcher(&dir, Duration::from_secs(1));

        assert_eq!(watcher.poll_once().await.unwrap(), None);
        assert_eq!(watcher.state.last_observed(), None);
        assert_eq!(recorder.count(), 0);
    }

    #[tokio::test]
    async fn test_marker_timeline() {
        let dir = TempDir::new().unwrap();
        let (mut watcher, recorder) = watcher(&dir, Duration::from_secs(1));
        let marker = watcher.marker.clone();

        // Created with T1
        touch(&marker, at(1_700_000_000));
        assert_eq!(
            modified_at(watcher.poll_once().await.unwrap()),
            Some(at(1_700_000_000))
        );
        // Nothing changed since the last poll
        assert_eq!(watcher.poll_once().await.unwrap(), None);

        // Rewritten with T2 > T1
        touch(&marker, at(1_700_000_060));
        assert_eq!(
            modified_at(watcher.poll_once().await.unwrap()),
            Some(at(1_700_000_060))
        );

        // Restored to an older mtime
        touch(&marker, at(1_699_999_000));
        assert_eq!(watcher.poll_once().await.unwrap(), None);
        assert_eq!(watcher.state.last_observed(), Some(at(1_700_000_060)));

        assert_eq!(recorder.count(), 2);
    }

    #[tokio::test]
    async fn test_deleted_marker_keeps_the_high_water_mark() {
        let dir = TempDir::new().unwrap();
        let (mut watcher, recorder) = watcher(&dir, Duration::from_secs(1));
        let marker = watcher.marker.clone();

        touch(&marker, at(1_700_000_000));
        watcher.poll_once().await.unwrap();
        std::fs::remove_file(&marker).unwrap();
        assert_eq!(watcher.poll_once().await.unwrap(), None);

        touch(&marker, at(1_700_000_000));
        assert_eq!(watcher.poll_once().await.unwrap(), None);
        assert_eq!(recorder.count(), 1);
    }

    #[tokio::test]
    async fn test_unreadable_marker_is_reported_as_metadata_error() {
        let dir = TempDir::new().unwrap();
        let not_a_dir = dir.path().join("plain-file");
        touch(&not_a_dir, at(1));

        let mut watcher = MarkerWatcher::new(
            not_a_dir.join(".trigger"),
            Duration::from_secs(1),
            EventPublisher::new(),
        );

        let err = watcher.poll_once().await.unwrap_err();
        assert_eq!(err.error_kind, ErrorKind::Metadata);
        assert_eq!(watcher.state.last_observed(), None);
    }

    #[tokio::test]
    async fn test_spawned_watcher_publishes_changes() {
        let dir = TempDir::new().unwrap();
        let (watcher, recorder) = watcher(&dir, Duration::from_millis(10));
        let marker = watcher.marker.clone();
        let handle = watcher.spawn();

        touch(&marker, at(1_700_000_000));
        time::timeout(Duration::from_secs(5), async {
            while recorder.count() == 0 {
                time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("watcher should publish the marker change");

        // A few more polls with no change must stay silent
        time::sleep(Duration::from_millis(50)).await;
        assert_eq!(recorder.count(), 1);
        assert!(!handle.is_finished());
        handle.abort();
    }
}
