use super::*;
use crate::device::{CameraPosition, CaptureDevice};
use crate::error::ScannerError;
use crate::mock::{BackendCall, MockCaptureBackend};

fn create_session(backend: MockCaptureBackend) -> (CaptureSession, crate::mock::BackendProbe) {
    let probe = backend.probe();
    (CaptureSession::new(Box::new(backend)), probe)
}

#[test]
fn test_attach_input_and_output() {
    let (mut session, probe) = create_session(MockCaptureBackend::new());

    session.attach_input(CameraPosition::Rear).unwrap();
    session.attach_output(&OutputConfig::default()).unwrap();

    assert_eq!(session.active_input(), Some(CameraPosition::Rear));
    assert_eq!(probe.inputs(), vec![CameraPosition::Rear]);
    assert!(probe.output_attached());
    assert_eq!(
        session.output().map(|o| o.symbologies.clone()),
        Some(vec![Symbology::Qr])
    );
}

#[test]
fn test_only_one_input_at_a_time() {
    let (mut session, probe) = create_session(MockCaptureBackend::new());

    session.attach_input(CameraPosition::Rear).unwrap();
    let result = session.attach_input(CameraPosition::Front);

    assert!(matches!(result, Err(ScannerError::Configuration { .. })));
    assert_eq!(probe.inputs(), vec![CameraPosition::Rear]);
}

#[test]
fn test_output_attached_once() {
    let (mut session, probe) = create_session(MockCaptureBackend::new());

    session.attach_output(&OutputConfig::default()).unwrap();
    session.attach_output(&OutputConfig::default()).unwrap();

    assert_eq!(probe.count(BackendCall::AddOutput), 1);
}

#[test]
fn test_missing_device_fails_with_input_reason() {
    let (mut session, _probe) = create_session(MockCaptureBackend::rear_only());

    let err = session.attach_input(CameraPosition::Front).unwrap_err();
    assert_eq!(err.reason(), "Failed to add Input");
    assert_eq!(session.active_input(), None);
}

#[test]
fn test_rejected_output_reason() {
    let (mut session, _probe) = create_session(MockCaptureBackend::new().reject_outputs());

    let err = session.attach_output(&OutputConfig::default()).unwrap_err();
    assert_eq!(err.reason(), "Failed to add Output");
}

#[test]
fn test_start_stop_idempotent() {
    let (mut session, probe) = create_session(MockCaptureBackend::new());

    session.start_running();
    session.start_running();
    assert!(session.is_running());
    assert_eq!(probe.count(BackendCall::StartRunning), 1);

    session.stop_running();
    session.stop_running();
    assert!(!session.is_running());
    assert_eq!(probe.count(BackendCall::StopRunning), 1);
}

#[test]
fn test_transaction_commits_on_drop() {
    let (mut session, probe) = create_session(MockCaptureBackend::new());
    session.attach_input(CameraPosition::Rear).unwrap();

    {
        let mut tx = session.begin_configuration();
        assert!(probe.is_configuring());
        tx.detach_input();
        tx.attach_input(CameraPosition::Front).unwrap();
    }

    assert!(!probe.is_configuring());
    let calls = probe.calls();
    let tail = &calls[calls.len() - 4..];
    assert_eq!(
        tail,
        &[
            BackendCall::BeginConfiguration,
            BackendCall::RemoveInput(CameraPosition::Rear),
            BackendCall::AddInput(CameraPosition::Front),
            BackendCall::CommitConfiguration,
        ]
    );
}

#[test]
fn test_transaction_commits_on_error_path() {
    fn swap_to_missing(session: &mut CaptureSession) -> crate::error::Result<()> {
        let mut tx = session.begin_configuration();
        tx.detach_input();
        tx.attach_input(CameraPosition::Front)?;
        Ok(())
    }

    let (mut session, probe) = create_session(MockCaptureBackend::rear_only());
    session.attach_input(CameraPosition::Rear).unwrap();

    assert!(swap_to_missing(&mut session).is_err());
    assert!(!probe.is_configuring());
    assert_eq!(probe.count(BackendCall::CommitConfiguration), 1);
}

#[test]
fn test_teardown_on_drop() {
    let backend = MockCaptureBackend::new();
    let probe = backend.probe();
    {
        let mut session = CaptureSession::new(Box::new(backend));
        session.attach_input(CameraPosition::Rear).unwrap();
        session.attach_output(&OutputConfig::default()).unwrap();
        session.start_running();
    }

    assert!(!probe.is_running());
    assert!(probe.inputs().is_empty());
    assert!(!probe.output_attached());
}

#[test]
fn test_active_device() {
    let (mut session, _probe) = create_session(MockCaptureBackend::new());
    assert!(session.active_device().is_none());

    session.attach_input(CameraPosition::Front).unwrap();
    let device = session.active_device().unwrap();
    assert_eq!(device.position(), CameraPosition::Front);
    assert!(!device.has_torch());
}
