use super::{CaptureDevice, FocusSettings, TorchMode};
use crate::error::Result;
use tracing::trace;

/// Scoped exclusive configuration access to a capture device.
///
/// The device is unlocked when the guard is dropped, including on early
/// returns through `?`.
pub struct DeviceConfigurationLock<'a> {
    device: &'a dyn CaptureDevice,
}

impl<'a> DeviceConfigurationLock<'a> {
    pub fn acquire(device: &'a dyn CaptureDevice) -> Result<Self> {
        device.lock_for_configuration()?;
        trace!(position = %device.position(), "Device locked for configuration");
        Ok(Self { device })
    }

    pub fn device(&self) -> &dyn CaptureDevice {
        self.device
    }

    pub fn set_torch_mode(&self, mode: TorchMode) -> Result<()> {
        self.device.set_torch_mode(mode)
    }

    pub fn apply_focus(&self, focus: &FocusSettings) -> Result<()> {
        self.device.apply_focus(focus)
    }
}

impl Drop for DeviceConfigurationLock<'_> {
    fn drop(&mut self) {
        self.device.unlock_for_configuration();
        trace!(position = %self.device.position(), "Device configuration lock released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::CameraPosition;
    use crate::error::ScannerError;
    use crate::mock::MockDevice;

    #[test]
    fn test_lock_released_on_drop() {
        let device = MockDevice::rear_with_torch();
        {
            let lock = DeviceConfigurationLock::acquire(&device).unwrap();
            assert!(device.is_locked());
            lock.set_torch_mode(TorchMode::On).unwrap();
        }
        assert!(!device.is_locked());
        assert_eq!(device.torch_mode(), TorchMode::On);
    }

    #[test]
    fn test_lock_released_on_error_path() {
        fn configure(device: &MockDevice) -> Result<()> {
            let lock = DeviceConfigurationLock::acquire(device)?;
            lock.apply_focus(&FocusSettings::default())?;
            Ok(())
        }

        let device = MockDevice::rear_with_torch();
        device.fail_focus(true);
        assert!(configure(&device).is_err());
        assert!(!device.is_locked());
    }

    #[test]
    fn test_failed_acquire_does_not_unlock() {
        let device = MockDevice::front();
        device.fail_lock(true);
        let result = DeviceConfigurationLock::acquire(&device);
        assert!(matches!(
            result,
            Err(ScannerError::DeviceLock {
                position: CameraPosition::Front,
                ..
            })
        ));
        assert_eq!(device.unlock_count(), 0);
    }
}
