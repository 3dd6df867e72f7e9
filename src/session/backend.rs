use crate::device::{CameraPosition, CaptureDevice};
use crate::error::Result;
use crate::geometry::Rect;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Machine-readable code types the output can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbology {
    Qr,
    Ean13,
    Code128,
    DataMatrix,
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Symbology::Qr => "qr",
            Symbology::Ean13 => "ean13",
            Symbology::Code128 => "code128",
            Symbology::DataMatrix => "data_matrix",
        };
        f.write_str(name)
    }
}

/// Settings for the decoded-object output sink
#[derive(Debug, Clone, PartialEq)]
pub struct OutputConfig {
    pub symbologies: Vec<Symbology>,
    /// Region the platform decoder restricts itself to, in unit coordinates
    pub rect_of_interest: Rect,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            symbologies: vec![Symbology::Qr],
            rect_of_interest: Rect::new(0.2, 0.2, 0.6, 0.6),
        }
    }
}

/// Platform capture pipeline the session drives.
///
/// Implementations wrap the host camera framework. The backend only wires
/// inputs and outputs; invariants such as "one input at a time" are enforced
/// by [`super::CaptureSession`].
pub trait CaptureBackend: Send {
    /// Device for a camera position, if the hardware has one
    fn device(&self, position: CameraPosition) -> Option<Arc<dyn CaptureDevice>>;

    fn can_add_input(&self, position: CameraPosition) -> bool;

    fn add_input(&mut self, position: CameraPosition) -> Result<()>;

    fn remove_input(&mut self, position: CameraPosition);

    fn can_add_output(&self) -> bool;

    /// Attach the decoded-object output sink
    fn add_output(&mut self, output: &OutputConfig) -> Result<()>;

    fn remove_output(&mut self);

    fn begin_configuration(&mut self);

    fn commit_configuration(&mut self);

    fn start_running(&mut self);

    fn stop_running(&mut self);
}
