use super::debounce::DebounceCounter;
use super::state::ControllerState;
use crate::candidate::ScanCandidate;
use crate::config::ScannerConfig;
use crate::decoder::Decoder;
use crate::delegate::{deliver, ScanDelegate, ScanResult};
use crate::device::{
    CameraPosition, CaptureDevice, DeviceConfigurationLock, FocusSettings, TorchMode,
};
use crate::error::{Result, ScannerError};
use crate::geometry::{Point, Rect};
use crate::overlay::OverlayModel;
use crate::picker::{ImageSource, PickedImage};
use crate::session::{CaptureSession, OutputConfig};
use crate::view::ScannerView;
use image::DynamicImage;
use std::sync::{Arc, Weak};
use tracing::{debug, error, info, trace, warn};
use uuid::Uuid;

/// Drives one scan session: camera wiring, torch, camera selection and
/// result delivery.
///
/// Frame callbacks and user actions must be serialized onto the same queue;
/// every operation takes `&mut self`, so the borrow checker enforces that a
/// single caller owns the controller.
pub struct ScannerController {
    id: Uuid,
    config: ScannerConfig,
    session: CaptureSession,
    decoder: Arc<dyn Decoder>,
    view: Box<dyn ScannerView>,
    delegate: Weak<dyn ScanDelegate>,
    overlay: OverlayModel,
    debounce: DebounceCounter,
    state: ControllerState,
    position: CameraPosition,
    visible_region: Rect,
    output: OutputConfig,
    focus: FocusSettings,
}

impl ScannerController {
    pub(super) fn new(
        config: ScannerConfig,
        session: CaptureSession,
        decoder: Arc<dyn Decoder>,
        view: Box<dyn ScannerView>,
        delegate: Weak<dyn ScanDelegate>,
    ) -> Self {
        let (fx, fy) = config.camera.focus_point;
        let id = Uuid::new_v4();
        info!(session = %id, position = %config.camera.position, "Creating scanner controller");

        Self {
            id,
            overlay: OverlayModel::new(&config.ui),
            debounce: DebounceCounter::new(
                config.scan.debounce_threshold,
                config.scan.reset_on_miss,
            ),
            state: ControllerState::Idle,
            position: config.camera.position,
            visible_region: config.visible_region(),
            output: config.output(),
            focus: FocusSettings {
                point_of_interest: Point::new(fx, fy),
                ..FocusSettings::default()
            },
            config,
            session,
            decoder,
            view,
            delegate,
        }
    }

    /// Attach input and output and begin streaming.
    ///
    /// A wiring failure is delivered to the delegate, the view is dismissed
    /// and the controller becomes terminal.
    pub fn start(&mut self) -> Result<()> {
        if self.state.is_terminal() {
            return Err(ScannerError::SessionFinished);
        }

        if self.session.is_running() {
            debug!(session = %self.id, "Capture session is already running");
            return Ok(());
        }

        info!(session = %self.id, position = %self.position, "Starting scan session");
        self.debounce.reset();

        if let Err(e) = self.configure_session() {
            error!(session = %self.id, "Failed to configure capture session: {}", e);
            self.finalize(ScanResult::Failure(e.reason()));
            return Err(e);
        }

        self.session.start_running();
        self.state = ControllerState::Running;
        self.apply_focus();
        Ok(())
    }

    fn configure_session(&mut self) -> Result<()> {
        let position = self.position;
        let mut tx = self.session.begin_configuration();
        if tx.active_input().is_none() {
            tx.attach_input(position)?;
        }
        tx.attach_output(&self.output)?;
        Ok(())
    }

    /// Continuous autofocus around the configured point, on the rear camera
    fn apply_focus(&self) {
        let Some(device) = self.session.device(CameraPosition::Rear) else {
            return;
        };

        if !device.has_torch() {
            debug!(session = %self.id, "Rear camera does not support focus configuration");
            return;
        }

        let result = DeviceConfigurationLock::acquire(device.as_ref())
            .and_then(|lock| lock.apply_focus(&self.focus));
        match result {
            Ok(()) => debug!(
                session = %self.id,
                x = self.focus.point_of_interest.x,
                y = self.focus.point_of_interest.y,
                "Focus configured"
            ),
            Err(e) => warn!(session = %self.id, "Failed to configure focus: {}", e),
        }
    }

    /// Halt streaming. The session can be started again.
    pub fn stop(&mut self) {
        self.session.stop_running();
    }

    /// Swap between front and rear camera, keeping the output wired
    pub fn switch_camera(&mut self) -> Result<()> {
        if self.state.is_terminal() {
            debug!(session = %self.id, "Ignoring camera switch after session finished");
            return Ok(());
        }

        let current = self.session.active_input().unwrap_or(self.position);
        let target = current.opposite();

        if self.session.device(target).is_none() {
            debug!(session = %self.id, %target, "No alternate camera; switch ignored");
            return Ok(());
        }

        if self.session.active_input().is_none() {
            info!(session = %self.id, %target, "Initial camera changed");
            self.position = target;
            return Ok(());
        }

        let (switched, restored) = {
            let mut tx = self.session.begin_configuration();
            tx.detach_input();
            match tx.attach_input(target) {
                Ok(()) => (Ok(()), Ok(())),
                Err(e) => {
                    warn!(session = %self.id, %target, "Camera switch failed, restoring {}: {}", current, e);
                    let restored = tx.attach_input(current);
                    (Err(e), restored)
                }
            }
        };

        // No input left attached; the session cannot continue
        if let Err(e) = restored {
            error!(session = %self.id, %current, "Failed to restore camera input: {}", e);
            self.finalize(ScanResult::Failure(e.reason()));
            return Err(e);
        }
        switched?;

        self.position = target;
        info!(session = %self.id, from = %current, to = %target, "Camera switched");
        Ok(())
    }

    /// Flip the rear torch. Returns the new mode, or `None` when the torch
    /// cannot be used (front camera active, no torch, torch unavailable).
    pub fn toggle_torch(&mut self) -> Result<Option<TorchMode>> {
        if self.state.is_terminal() {
            return Ok(None);
        }

        let active = self.session.active_input().unwrap_or(self.position);
        if active == CameraPosition::Front {
            debug!(session = %self.id, "Torch ignored on front camera");
            return Ok(None);
        }

        let Some(device) = self.session.device(CameraPosition::Rear) else {
            return Ok(None);
        };

        if !device.has_torch() || !device.is_torch_available() {
            debug!(session = %self.id, "Torch not available");
            return Ok(None);
        }

        let mode = {
            let lock = DeviceConfigurationLock::acquire(device.as_ref())?;
            let next = lock.device().torch_mode().toggled();
            lock.set_torch_mode(next)?;
            next
        };

        info!(session = %self.id, torch = ?mode, "Torch toggled");
        self.view
            .update_torch_indicator(mode, self.overlay.torch_icon(mode));
        Ok(Some(mode))
    }

    /// Handle the candidates the output reported for one frame.
    ///
    /// Returns the delivered result when this frame finished the session.
    pub fn on_frame_decoded(&mut self, candidates: &[ScanCandidate]) -> Option<ScanResult> {
        if self.state != ControllerState::Running || !self.session.is_running() {
            trace!(session = %self.id, "Frame ignored; session not streaming");
            return None;
        }

        let mut hit = false;
        for candidate in candidates {
            if !self.output.symbologies.contains(&candidate.symbology) {
                trace!(symbology = %candidate.symbology, "Candidate symbology not enabled");
                continue;
            }

            if !candidate.is_within(&self.visible_region) {
                trace!(bounds = ?candidate.bounds, "Candidate outside visible region");
                continue;
            }

            hit = true;
            if self.debounce.record_hit() {
                let result = match candidate.non_empty_payload() {
                    Some(payload) => ScanResult::Success(payload.to_string()),
                    None => ScanResult::Failure(ScannerError::EmptyPayload.reason()),
                };
                self.finalize(result.clone());
                return Some(result);
            }
        }

        if hit {
            trace!(
                session = %self.id,
                count = self.debounce.count(),
                threshold = self.debounce.threshold(),
                "Candidate in frame"
            );
        } else {
            self.debounce.record_miss();
        }
        None
    }

    /// Decode a still image and finish the session with its first code
    pub fn scan_static_image(&mut self, image: &DynamicImage) -> Result<ScanResult> {
        if self.state.is_terminal() {
            return Err(ScannerError::SessionFinished);
        }

        let payloads = self.decoder.decode(image);
        debug!(session = %self.id, count = payloads.len(), "Still image decoded");

        let result = match payloads.into_iter().next() {
            Some(payload) if payload.is_empty() => {
                ScanResult::Failure(ScannerError::EmptyPayload.reason())
            }
            Some(payload) => ScanResult::Success(payload),
            None if self.config.scan.close_on_static_miss => {
                ScanResult::Failure(ScannerError::DecodeEmpty.reason())
            }
            None => {
                info!(session = %self.id, "No code in still image; session stays open");
                return Err(ScannerError::DecodeEmpty);
            }
        };

        self.finalize(result.clone());
        Ok(result)
    }

    /// Ask the image source for a picture and scan it.
    ///
    /// Returns `None` when the user dismissed the picker; nothing is
    /// delivered in that case.
    pub async fn open_gallery(&mut self, source: &dyn ImageSource) -> Result<Option<ScanResult>> {
        if self.state.is_terminal() {
            return Err(ScannerError::SessionFinished);
        }

        match source.pick_image().await? {
            PickedImage::Picked(image) => self.scan_static_image(&image).map(Some),
            PickedImage::Cancelled => {
                debug!(session = %self.id, "Gallery picker dismissed");
                Ok(None)
            }
        }
    }

    /// Stop scanning, dismiss the view and deliver `Cancelled`
    pub fn cancel(&mut self) {
        if self.state.is_terminal() {
            debug!(session = %self.id, "Cancel ignored; session already finished");
            return;
        }
        self.finalize(ScanResult::Cancelled);
    }

    fn finalize(&mut self, result: ScanResult) {
        self.session.teardown();
        self.view.dismiss();
        deliver(&self.delegate, &result);
        self.state = ControllerState::for_result(result);
        info!(session = %self.id, state = ?self.state, "Scan session finished");
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.session.is_running()
    }

    /// Camera currently attached, or the one `start` will attach
    pub fn active_position(&self) -> CameraPosition {
        self.session.active_input().unwrap_or(self.position)
    }

    /// Rear torch state
    pub fn torch_mode(&self) -> TorchMode {
        self.session
            .device(CameraPosition::Rear)
            .map(|device| device.torch_mode())
            .unwrap_or_default()
    }

    pub fn debounce_count(&self) -> u32 {
        self.debounce.count()
    }

    pub fn overlay(&self) -> &OverlayModel {
        &self.overlay
    }

    pub fn visible_region(&self) -> Rect {
        self.visible_region
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    pub fn session_id(&self) -> Uuid {
        self.id
    }
}

impl Drop for ScannerController {
    fn drop(&mut self) {
        if !self.state.is_terminal() {
            debug!(session = %self.id, "Controller dropped before finishing; cancelling");
            self.cancel();
        }
    }
}
