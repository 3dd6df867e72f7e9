mod lock;
mod types;

pub use lock::DeviceConfigurationLock;
pub use types::{CameraPosition, FocusSettings, TorchMode};

use crate::error::Result;

/// A physical camera the capture backend can stream from.
///
/// Mutating calls (`set_torch_mode`, `apply_focus`) are only valid while the
/// device is locked for configuration; use [`DeviceConfigurationLock`] rather
/// than calling the lock methods directly.
pub trait CaptureDevice: Send + Sync {
    /// Which side of the handset the device faces
    fn position(&self) -> CameraPosition;

    /// Whether the device has a torch at all
    fn has_torch(&self) -> bool;

    /// Whether the torch can currently be used (e.g. not overheated)
    fn is_torch_available(&self) -> bool;

    fn torch_mode(&self) -> TorchMode;

    /// Acquire exclusive configuration access
    fn lock_for_configuration(&self) -> Result<()>;

    /// Release exclusive configuration access
    fn unlock_for_configuration(&self);

    fn set_torch_mode(&self, mode: TorchMode) -> Result<()>;

    fn apply_focus(&self, focus: &FocusSettings) -> Result<()>;
}
