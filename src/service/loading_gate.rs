use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

pub const DEFAULT_BUSY_HOLD: Duration = Duration::from_millis(5000);

/// Busy flag with a minimum display duration. `begin` raises the flag and
/// stamps the instant; `finish` lowers it only after the hold has elapsed
/// since `begin`, even when the guarded work completed instantly. The hold
/// is a display-only timer on its own schedule, never a lock.
pub struct LoadingGate {
    tx: watch::Sender<bool>,
    hold: Duration,
    since: Mutex<Option<Instant>>,
}

impl LoadingGate {
    pub fn new(hold: Duration) -> Self {
        let (tx, _) = watch::channel(false);
        Self {
            tx,
            hold,
            since: Mutex::new(None),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    pub fn is_busy(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn begin(&self) {
        let mut since = self.since.lock().unwrap();
        *since = Some(Instant::now());
        self.tx.send_replace(true);
    }

    pub async fn finish(&self) {
        let started = self.since.lock().unwrap().take();
        if let Some(started) = started {
            let elapsed = started.elapsed();
            if elapsed < self.hold {
                tokio::time::sleep(self.hold - elapsed).await;
            }
        }
        self.tx.send_replace(false);
    }
}
