use super::capture::CaptureSession;
use std::ops::{Deref, DerefMut};
use tracing::trace;

/// Batches session changes so observers only see the committed result.
///
/// The backend's `commit_configuration` runs when the transaction is dropped.
pub struct ConfigurationTransaction<'a> {
    session: &'a mut CaptureSession,
}

impl<'a> ConfigurationTransaction<'a> {
    pub(super) fn begin(session: &'a mut CaptureSession) -> Self {
        session.backend_mut().begin_configuration();
        trace!("Session configuration began");
        Self { session }
    }
}

impl Deref for ConfigurationTransaction<'_> {
    type Target = CaptureSession;

    fn deref(&self) -> &Self::Target {
        self.session
    }
}

impl DerefMut for ConfigurationTransaction<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.session
    }
}

impl Drop for ConfigurationTransaction<'_> {
    fn drop(&mut self) {
        self.session.backend_mut().commit_configuration();
        trace!("Session configuration committed");
    }
}
