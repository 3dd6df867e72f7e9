//! In-memory capture backend, devices, view and delegate.
//!
//! Used by the demo binary as a virtual camera and by tests to observe what
//! the controller asked the platform to do.

use crate::delegate::{ScanDelegate, ScanResult};
use crate::device::{CameraPosition, CaptureDevice, FocusSettings, TorchMode};
use crate::error::{Result, ScannerError};
use crate::session::{CaptureBackend, OutputConfig};
use crate::view::ScannerView;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Default)]
struct MockDeviceState {
    torch: TorchMode,
    torch_available: bool,
    locked: bool,
    unlock_count: u32,
    fail_lock: bool,
    fail_focus: bool,
    focus: Option<FocusSettings>,
}

/// Camera device with controllable failures
#[derive(Debug)]
pub struct MockDevice {
    position: CameraPosition,
    has_torch: bool,
    state: Mutex<MockDeviceState>,
}

impl MockDevice {
    pub fn new(position: CameraPosition, has_torch: bool) -> Self {
        Self {
            position,
            has_torch,
            state: Mutex::new(MockDeviceState {
                torch_available: has_torch,
                ..MockDeviceState::default()
            }),
        }
    }

    pub fn rear_with_torch() -> Self {
        Self::new(CameraPosition::Rear, true)
    }

    pub fn rear_without_torch() -> Self {
        Self::new(CameraPosition::Rear, false)
    }

    pub fn front() -> Self {
        Self::new(CameraPosition::Front, false)
    }

    pub fn is_locked(&self) -> bool {
        self.state.lock().locked
    }

    pub fn unlock_count(&self) -> u32 {
        self.state.lock().unlock_count
    }

    pub fn fail_lock(&self, fail: bool) {
        self.state.lock().fail_lock = fail;
    }

    pub fn fail_focus(&self, fail: bool) {
        self.state.lock().fail_focus = fail;
    }

    pub fn set_torch_available(&self, available: bool) {
        self.state.lock().torch_available = available;
    }

    /// Focus settings last applied
    pub fn focus(&self) -> Option<FocusSettings> {
        self.state.lock().focus
    }

    fn require_lock(&self, state: &MockDeviceState) -> Result<()> {
        if state.locked {
            Ok(())
        } else {
            Err(ScannerError::system(format!(
                "{} camera modified without configuration lock",
                self.position
            )))
        }
    }
}

impl CaptureDevice for MockDevice {
    fn position(&self) -> CameraPosition {
        self.position
    }

    fn has_torch(&self) -> bool {
        self.has_torch
    }

    fn is_torch_available(&self) -> bool {
        self.has_torch && self.state.lock().torch_available
    }

    fn torch_mode(&self) -> TorchMode {
        self.state.lock().torch
    }

    fn lock_for_configuration(&self) -> Result<()> {
        let mut state = self.state.lock();
        if state.fail_lock || state.locked {
            return Err(ScannerError::DeviceLock {
                position: self.position,
                details: "device busy".to_string(),
            });
        }
        state.locked = true;
        Ok(())
    }

    fn unlock_for_configuration(&self) {
        let mut state = self.state.lock();
        state.locked = false;
        state.unlock_count += 1;
    }

    fn set_torch_mode(&self, mode: TorchMode) -> Result<()> {
        let mut state = self.state.lock();
        self.require_lock(&state)?;
        if !self.has_torch {
            return Err(ScannerError::system("device has no torch"));
        }
        state.torch = mode;
        Ok(())
    }

    fn apply_focus(&self, focus: &FocusSettings) -> Result<()> {
        let mut state = self.state.lock();
        self.require_lock(&state)?;
        if state.fail_focus {
            return Err(ScannerError::system("focus not supported"));
        }
        state.focus = Some(*focus);
        Ok(())
    }
}

/// Calls the session made on the backend, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendCall {
    AddInput(CameraPosition),
    RemoveInput(CameraPosition),
    AddOutput,
    RemoveOutput,
    BeginConfiguration,
    CommitConfiguration,
    StartRunning,
    StopRunning,
}

#[derive(Debug, Default)]
struct BackendState {
    calls: Vec<BackendCall>,
    inputs: Vec<CameraPosition>,
    output_attached: bool,
    running: bool,
    configuring: bool,
}

/// Shared view into a [`MockCaptureBackend`] after it moved into a session
#[derive(Debug, Clone, Default)]
pub struct BackendProbe {
    state: Arc<Mutex<BackendState>>,
}

impl BackendProbe {
    pub fn calls(&self) -> Vec<BackendCall> {
        self.state.lock().calls.clone()
    }

    pub fn count(&self, call: BackendCall) -> usize {
        self.state.lock().calls.iter().filter(|c| **c == call).count()
    }

    pub fn inputs(&self) -> Vec<CameraPosition> {
        self.state.lock().inputs.clone()
    }

    pub fn output_attached(&self) -> bool {
        self.state.lock().output_attached
    }

    pub fn is_running(&self) -> bool {
        self.state.lock().running
    }

    pub fn is_configuring(&self) -> bool {
        self.state.lock().configuring
    }
}

/// Virtual capture pipeline
pub struct MockCaptureBackend {
    devices: HashMap<CameraPosition, Arc<MockDevice>>,
    reject_inputs: bool,
    input_limit: Option<usize>,
    reject_outputs: bool,
    probe: BackendProbe,
}

impl MockCaptureBackend {
    /// Backend without any devices
    pub fn empty() -> Self {
        Self {
            devices: HashMap::new(),
            reject_inputs: false,
            input_limit: None,
            reject_outputs: false,
            probe: BackendProbe::default(),
        }
    }

    /// Rear camera with torch plus a front camera
    pub fn new() -> Self {
        Self::empty()
            .with_device(MockDevice::rear_with_torch())
            .with_device(MockDevice::front())
    }

    /// Only a rear camera with torch
    pub fn rear_only() -> Self {
        Self::empty().with_device(MockDevice::rear_with_torch())
    }

    pub fn with_device(mut self, device: MockDevice) -> Self {
        self.devices.insert(device.position(), Arc::new(device));
        self
    }

    pub fn reject_inputs(mut self) -> Self {
        self.reject_inputs = true;
        self
    }

    /// Accept the first `limit` inputs, then reject every further one
    pub fn reject_inputs_after(mut self, limit: usize) -> Self {
        self.input_limit = Some(limit);
        self
    }

    pub fn reject_outputs(mut self) -> Self {
        self.reject_outputs = true;
        self
    }

    pub fn probe(&self) -> BackendProbe {
        self.probe.clone()
    }

    /// Concrete handle to a device, for inspecting torch and lock state
    pub fn device_handle(&self, position: CameraPosition) -> Option<Arc<MockDevice>> {
        self.devices.get(&position).cloned()
    }

    fn record(&self, call: BackendCall) {
        self.probe.state.lock().calls.push(call);
    }
}

impl Default for MockCaptureBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureBackend for MockCaptureBackend {
    fn device(&self, position: CameraPosition) -> Option<Arc<dyn CaptureDevice>> {
        self.devices
            .get(&position)
            .map(|device| Arc::clone(device) as Arc<dyn CaptureDevice>)
    }

    fn can_add_input(&self, position: CameraPosition) -> bool {
        let under_limit = self
            .input_limit
            .map_or(true, |limit| {
                let added = self
                    .probe
                    .calls()
                    .iter()
                    .filter(|c| matches!(c, BackendCall::AddInput(_)))
                    .count();
                added < limit
            });
        !self.reject_inputs && under_limit && self.devices.contains_key(&position)
    }

    fn add_input(&mut self, position: CameraPosition) -> Result<()> {
        if !self.can_add_input(position) {
            return Err(ScannerError::DeviceUnavailable(position));
        }
        self.record(BackendCall::AddInput(position));
        self.probe.state.lock().inputs.push(position);
        Ok(())
    }

    fn remove_input(&mut self, position: CameraPosition) {
        self.record(BackendCall::RemoveInput(position));
        self.probe.state.lock().inputs.retain(|p| *p != position);
    }

    fn can_add_output(&self) -> bool {
        !self.reject_outputs && !self.probe.output_attached()
    }

    fn add_output(&mut self, output: &OutputConfig) -> Result<()> {
        if !self.can_add_output() {
            return Err(ScannerError::configuration("output rejected"));
        }
        debug!(symbologies = ?output.symbologies, "Mock output attached");
        self.record(BackendCall::AddOutput);
        self.probe.state.lock().output_attached = true;
        Ok(())
    }

    fn remove_output(&mut self) {
        self.record(BackendCall::RemoveOutput);
        self.probe.state.lock().output_attached = false;
    }

    fn begin_configuration(&mut self) {
        self.record(BackendCall::BeginConfiguration);
        self.probe.state.lock().configuring = true;
    }

    fn commit_configuration(&mut self) {
        self.record(BackendCall::CommitConfiguration);
        self.probe.state.lock().configuring = false;
    }

    fn start_running(&mut self) {
        self.record(BackendCall::StartRunning);
        self.probe.state.lock().running = true;
    }

    fn stop_running(&mut self) {
        self.record(BackendCall::StopRunning);
        self.probe.state.lock().running = false;
    }
}

#[derive(Debug, Default)]
struct ViewState {
    dismiss_count: u32,
    torch_updates: Vec<(TorchMode, Option<String>)>,
}

/// View recording dismissals and torch indicator updates
#[derive(Debug, Clone, Default)]
pub struct MockView {
    state: Arc<Mutex<ViewState>>,
}

impl MockView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dismiss_count(&self) -> u32 {
        self.state.lock().dismiss_count
    }

    pub fn torch_updates(&self) -> Vec<(TorchMode, Option<String>)> {
        self.state.lock().torch_updates.clone()
    }
}

impl ScannerView for MockView {
    fn dismiss(&mut self) {
        self.state.lock().dismiss_count += 1;
    }

    fn update_torch_indicator(&mut self, mode: TorchMode, icon: Option<&str>) {
        self.state
            .lock()
            .torch_updates
            .push((mode, icon.map(str::to_string)));
    }
}

/// Delegate recording every notification it receives
#[derive(Debug, Default)]
pub struct RecordingDelegate {
    results: Mutex<Vec<ScanResult>>,
}

impl RecordingDelegate {
    pub fn results(&self) -> Vec<ScanResult> {
        self.results.lock().clone()
    }
}

impl ScanDelegate for RecordingDelegate {
    fn scan_completed(&self, result: &str) {
        self.results
            .lock()
            .push(ScanResult::Success(result.to_string()));
    }

    fn scan_failed(&self, reason: &str) {
        self.results
            .lock()
            .push(ScanResult::Failure(reason.to_string()));
    }

    fn scan_cancelled(&self) {
        self.results.lock().push(ScanResult::Cancelled);
    }
}
