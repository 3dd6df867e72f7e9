use serde::{Deserialize, Serialize};
use std::sync::Weak;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Outcome handed to the delegate, once per scan session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum ScanResult {
    Success(String),
    Failure(String),
    Cancelled,
}

impl ScanResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ScanResult::Success(_))
    }

    pub fn description(&self) -> String {
        match self {
            ScanResult::Success(payload) => format!("Scan completed: {}", payload),
            ScanResult::Failure(reason) => format!("Scan failed: {}", reason),
            ScanResult::Cancelled => "Scan cancelled".to_string(),
        }
    }
}

/// Receives the result of a scan session.
///
/// Exactly one of the three methods is called per session.
pub trait ScanDelegate: Send + Sync {
    fn scan_completed(&self, result: &str);
    fn scan_failed(&self, reason: &str);
    fn scan_cancelled(&self);
}

/// Route a result to the matching delegate method
pub(crate) fn deliver(delegate: &Weak<dyn ScanDelegate>, result: &ScanResult) {
    let Some(delegate) = delegate.upgrade() else {
        warn!("Scan delegate dropped; result discarded: {}", result.description());
        return;
    };

    info!("{}", result.description());
    match result {
        ScanResult::Success(payload) => delegate.scan_completed(payload),
        ScanResult::Failure(reason) => delegate.scan_failed(reason),
        ScanResult::Cancelled => delegate.scan_cancelled(),
    }
}

/// Delegate that forwards results over a tokio channel
pub struct ChannelDelegate {
    tx: mpsc::UnboundedSender<ScanResult>,
}

impl ChannelDelegate {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ScanResult>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, result: ScanResult) {
        if self.tx.send(result).is_err() {
            warn!("Scan result receiver closed");
        }
    }
}

impl ScanDelegate for ChannelDelegate {
    fn scan_completed(&self, result: &str) {
        self.send(ScanResult::Success(result.to_string()));
    }

    fn scan_failed(&self, reason: &str) {
        self.send(ScanResult::Failure(reason.to_string()));
    }

    fn scan_cancelled(&self) {
        self.send(ScanResult::Cancelled);
    }
}
