mod backend;
mod capture;
mod transaction;
#[cfg(test)]
mod tests;

pub use backend::{CaptureBackend, OutputConfig, Symbology};
pub use capture::CaptureSession;
pub use transaction::ConfigurationTransaction;
