use crate::device::TorchMode;
use tracing::info;

/// Host view presenting the scanner
pub trait ScannerView: Send {
    /// Close the scanner view
    fn dismiss(&mut self);

    /// Reflect the torch state on the torch button; `icon` is `None` when no
    /// icon is configured for the new state and the button should stay as is
    fn update_torch_indicator(&mut self, mode: TorchMode, icon: Option<&str>);
}

/// View that only reports what it would display
#[derive(Debug, Default)]
pub struct TracingView {
    dismissed: bool,
}

impl TracingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }
}

impl ScannerView for TracingView {
    fn dismiss(&mut self) {
        if !self.dismissed {
            info!("Scanner view dismissed");
            self.dismissed = true;
        }
    }

    fn update_torch_indicator(&mut self, mode: TorchMode, icon: Option<&str>) {
        info!(torch = ?mode, icon = icon.unwrap_or("<unchanged>"), "Torch indicator updated");
    }
}
