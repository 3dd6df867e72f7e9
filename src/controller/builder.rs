use super::interface::ScannerController;
use crate::config::ScannerConfig;
use crate::decoder::{Decoder, RqrrDecoder};
use crate::delegate::ScanDelegate;
use crate::error::{Result, ScannerError};
use crate::session::{CaptureBackend, CaptureSession};
use crate::view::ScannerView;
use std::sync::{Arc, Weak};

/// Builder for [`ScannerController`]
pub struct ScannerControllerBuilder {
    config: Option<ScannerConfig>,
    backend: Option<Box<dyn CaptureBackend>>,
    decoder: Option<Arc<dyn Decoder>>,
    view: Option<Box<dyn ScannerView>>,
    delegate: Option<Weak<dyn ScanDelegate>>,
}

impl ScannerControllerBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            backend: None,
            decoder: None,
            view: None,
            delegate: None,
        }
    }

    /// Defaults to [`ScannerConfig::default`]
    pub fn config(mut self, config: ScannerConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn backend<B: CaptureBackend + 'static>(mut self, backend: B) -> Self {
        self.backend = Some(Box::new(backend));
        self
    }

    /// Defaults to [`RqrrDecoder`]
    pub fn decoder(mut self, decoder: Arc<dyn Decoder>) -> Self {
        self.decoder = Some(decoder);
        self
    }

    pub fn view<V: ScannerView + 'static>(mut self, view: V) -> Self {
        self.view = Some(Box::new(view));
        self
    }

    /// The controller keeps only a weak reference; the caller owns the delegate
    pub fn delegate<D: ScanDelegate + 'static>(mut self, delegate: &Arc<D>) -> Self {
        let weak: Weak<dyn ScanDelegate> = Arc::downgrade(delegate) as Weak<dyn ScanDelegate>;
        self.delegate = Some(weak);
        self
    }

    pub fn delegate_weak(mut self, delegate: Weak<dyn ScanDelegate>) -> Self {
        self.delegate = Some(delegate);
        self
    }

    pub fn build(self) -> Result<ScannerController> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let backend = self
            .backend
            .ok_or_else(|| ScannerError::system("Capture backend must be specified"))?;
        let view = self
            .view
            .ok_or_else(|| ScannerError::system("Scanner view must be specified"))?;
        let delegate = self
            .delegate
            .ok_or_else(|| ScannerError::system("Scan delegate must be specified"))?;
        let decoder = self
            .decoder
            .unwrap_or_else(|| Arc::new(RqrrDecoder::new()));

        Ok(ScannerController::new(
            config,
            CaptureSession::new(backend),
            decoder,
            view,
            delegate,
        ))
    }
}

impl Default for ScannerControllerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
