// Poller Teardown Token

use tokio::sync::watch;

/// Teardown signal observed by every per-job poll loop
#[derive(Clone)]
pub struct TeardownToken {
    rx: watch::Receiver<bool>,
}

impl TeardownToken {
    /// Check if teardown was requested
    pub fn is_torn_down(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait for the teardown signal
    pub async fn wait(&mut self) {
        let _ = self.rx.changed().await;
    }
}

/// Teardown trigger held by the poller
pub struct TeardownHandle {
    tx: watch::Sender<bool>,
}

impl TeardownHandle {
    /// Signal teardown to all poll loops
    pub fn signal(&self) {
        let _ = self.tx.send(true);
    }
}

/// Create a teardown channel
pub fn teardown_channel() -> (TeardownHandle, TeardownToken) {
    let (tx, rx) = watch::channel(false);
    (TeardownHandle { tx }, TeardownToken { rx })
}
