pub mod candidate;
pub mod config;
pub mod controller;
pub mod decoder;
pub mod delegate;
pub mod device;
pub mod error;
pub mod geometry;
pub mod keyboard_input;
pub mod mock;
pub mod overlay;
pub mod picker;
pub mod session;
pub mod view;

pub use candidate::ScanCandidate;
pub use config::{CameraConfig, IconConfig, ScanConfig, ScannerConfig, UiConfig};
pub use controller::{ControllerState, DebounceCounter, ScannerController, ScannerControllerBuilder};
pub use decoder::{load_image, load_image_from_memory, Decoder, RqrrDecoder};
pub use delegate::{ChannelDelegate, ScanDelegate, ScanResult};
pub use device::{CameraPosition, CaptureDevice, DeviceConfigurationLock, FocusSettings, TorchMode};
pub use error::{Result, ScannerError};
pub use keyboard_input::{KeyboardInputHandler, ScannerCommand};
pub use mock::{MockCaptureBackend, MockDevice, MockView, RecordingDelegate};
pub use overlay::{Locale, OverlayModel};
pub use picker::{FileImageSource, ImageSource, PickedImage};
pub use session::{CaptureBackend, CaptureSession, ConfigurationTransaction, OutputConfig, Symbology};
pub use view::{ScannerView, TracingView};
