use super::backend::{CaptureBackend, OutputConfig};
use super::transaction::ConfigurationTransaction;
use crate::device::{CameraPosition, CaptureDevice};
use crate::error::{Result, ScannerError};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub(crate) const INPUT_FAILURE: &str = "Failed to add Input";
pub(crate) const OUTPUT_FAILURE: &str = "Failed to add Output";

/// Camera pipeline state on top of a [`CaptureBackend`]
pub struct CaptureSession {
    backend: Box<dyn CaptureBackend>,
    input: Option<CameraPosition>,
    output: Option<OutputConfig>,
    running: bool,
}

impl CaptureSession {
    pub fn new(backend: Box<dyn CaptureBackend>) -> Self {
        Self {
            backend,
            input: None,
            output: None,
            running: false,
        }
    }

    /// Attach the input for `position`. Only one input may be attached.
    pub fn attach_input(&mut self, position: CameraPosition) -> Result<()> {
        if let Some(current) = self.input {
            warn!(%current, requested = %position, "Input already attached");
            return Err(ScannerError::configuration(INPUT_FAILURE));
        }

        if self.backend.device(position).is_none() || !self.backend.can_add_input(position) {
            return Err(ScannerError::configuration(INPUT_FAILURE));
        }

        self.backend.add_input(position).map_err(|e| {
            warn!(%position, error = %e, "Backend rejected input");
            ScannerError::configuration(INPUT_FAILURE)
        })?;

        self.input = Some(position);
        debug!(%position, "Input attached");
        Ok(())
    }

    /// Detach the current input, returning its position
    pub fn detach_input(&mut self) -> Option<CameraPosition> {
        let position = self.input.take()?;
        self.backend.remove_input(position);
        debug!(%position, "Input detached");
        Some(position)
    }

    /// Attach the output sink. Attaching again is a no-op.
    pub fn attach_output(&mut self, output: &OutputConfig) -> Result<()> {
        if self.output.is_some() {
            return Ok(());
        }

        if !self.backend.can_add_output() {
            return Err(ScannerError::configuration(OUTPUT_FAILURE));
        }

        self.backend.add_output(output).map_err(|e| {
            warn!(error = %e, "Backend rejected output");
            ScannerError::configuration(OUTPUT_FAILURE)
        })?;

        debug!(symbologies = ?output.symbologies, "Output attached");
        self.output = Some(output.clone());
        Ok(())
    }

    /// Open a configuration transaction; changes commit when it is dropped
    pub fn begin_configuration(&mut self) -> ConfigurationTransaction<'_> {
        ConfigurationTransaction::begin(self)
    }

    pub fn start_running(&mut self) {
        if self.running {
            return;
        }
        self.backend.start_running();
        self.running = true;
        info!(input = ?self.input, "Capture session running");
    }

    pub fn stop_running(&mut self) {
        if !self.running {
            debug!("Capture session is not running");
            return;
        }
        self.backend.stop_running();
        self.running = false;
        info!("Capture session stopped");
    }

    /// Stop streaming and release input and output
    pub fn teardown(&mut self) {
        self.stop_running();
        self.detach_input();
        if self.output.take().is_some() {
            self.backend.remove_output();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn active_input(&self) -> Option<CameraPosition> {
        self.input
    }

    pub fn output(&self) -> Option<&OutputConfig> {
        self.output.as_ref()
    }

    pub fn device(&self, position: CameraPosition) -> Option<Arc<dyn CaptureDevice>> {
        self.backend.device(position)
    }

    /// Device behind the attached input
    pub fn active_device(&self) -> Option<Arc<dyn CaptureDevice>> {
        self.input.and_then(|position| self.backend.device(position))
    }

    pub(super) fn backend_mut(&mut self) -> &mut dyn CaptureBackend {
        self.backend.as_mut()
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
