use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerKind {
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
}

/// How long each kind of banner stays up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BannerTiming {
    pub loading: Duration,
    pub result: Duration,
}

impl Default for BannerTiming {
    fn default() -> Self {
        Self {
            loading: Duration::from_millis(2000),
            result: Duration::from_millis(3000),
        }
    }
}

#[derive(Default)]
struct Slot {
    banner: Option<Banner>,
    epoch: u64,
    timer: Option<JoinHandle<()>>,
}

/// Status box of a front-end.
///
/// Each `show` arms a single hide timer. Showing a new banner aborts the
/// previous timer, so a banner is hidden exactly once, by its own timer.
#[derive(Clone)]
pub struct Notifier {
    slot: Arc<Mutex<Slot>>,
    timing: BannerTiming,
}

impl Notifier {
    pub fn new(timing: BannerTiming) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            timing,
        }
    }

    pub fn loading(&self) {
        self.show(BannerKind::Loading, "Loading...", self.timing.loading);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(BannerKind::Success, message, self.timing.result);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(BannerKind::Error, message, self.timing.result);
    }

    pub fn show(&self, kind: BannerKind, message: impl Into<String>, hide_after: Duration) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(previous) = slot.timer.take() {
            previous.abort();
        }

        slot.epoch += 1;
        let epoch = slot.epoch;
        slot.banner = Some(Banner {
            kind,
            message: message.into(),
        });

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("No async runtime; banner stays until replaced");
            return;
        };

        let shared = Arc::clone(&self.slot);
        slot.timer = Some(runtime.spawn(async move {
            tokio::time::sleep(hide_after).await;
            let mut slot = shared.lock().unwrap_or_else(PoisonError::into_inner);
            if slot.epoch == epoch {
                debug!("Hiding {:?} banner", slot.banner.as_ref().map(|b| b.kind));
                slot.banner = None;
                slot.timer = None;
            }
        }));
    }

    /// The banner visible right now, if any.
    pub fn current(&self) -> Option<Banner> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .banner
            .clone()
    }

    pub fn hide(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        slot.epoch += 1;
        slot.banner = None;
    }
}
