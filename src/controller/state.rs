use crate::delegate::ScanResult;

/// Lifecycle of one scan session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerState {
    /// Created, not started yet
    Idle,
    /// Capture session streaming frames
    Running,
    /// A success or failure was delivered
    Finalized(ScanResult),
    /// The user cancelled
    Cancelled,
}

impl ControllerState {
    /// Terminal states cannot be left; a new controller is needed
    pub fn is_terminal(&self) -> bool {
        matches!(self, ControllerState::Finalized(_) | ControllerState::Cancelled)
    }

    /// Result delivered to the delegate, if any
    pub fn result(&self) -> Option<ScanResult> {
        match self {
            ControllerState::Finalized(result) => Some(result.clone()),
            ControllerState::Cancelled => Some(ScanResult::Cancelled),
            _ => None,
        }
    }

    pub(crate) fn for_result(result: ScanResult) -> Self {
        match result {
            ScanResult::Cancelled => ControllerState::Cancelled,
            other => ControllerState::Finalized(other),
        }
    }
}
