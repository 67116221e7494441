use crate::models::AppEvent;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

const TICK: Duration = Duration::from_secs(1);

/// Once-a-second quiz clock. Owns its task so a finished or restarted session
/// cannot leave a ticker behind.
#[derive(Debug, Default)]
pub struct SessionTimer {
    handle: Option<JoinHandle<()>>,
}

impl SessionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts ticking into `tx`. A running timer is replaced.
    pub fn start(&mut self, tx: UnboundedSender<AppEvent>) {
        self.stop();
        self.handle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(AppEvent::Tick).is_err() {
                    break;
                }
            }
        }));
        log::debug!("Session timer started");
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            log::debug!("Session timer stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for SessionTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
