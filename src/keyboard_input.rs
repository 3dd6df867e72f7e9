use crate::error::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// User actions available from the terminal demo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScannerCommand {
    /// Hold or remove the simulated code in front of the camera
    ToggleCode,
    ToggleTorch,
    SwitchCamera,
    OpenGallery,
    Cancel,
}

impl ScannerCommand {
    /// Key binding for a single key code
    pub fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Char(' ') => Some(Self::ToggleCode),
            KeyCode::Char('t') | KeyCode::Char('T') => Some(Self::ToggleTorch),
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Self::SwitchCamera),
            KeyCode::Char('g') | KeyCode::Char('G') => Some(Self::OpenGallery),
            KeyCode::Char('q') | KeyCode::Esc => Some(Self::Cancel),
            _ => None,
        }
    }
}

/// Reads key presses in raw mode and forwards them as [`ScannerCommand`]s
pub struct KeyboardInputHandler {
    commands: mpsc::UnboundedSender<ScannerCommand>,
    cancellation_token: CancellationToken,
}

impl KeyboardInputHandler {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ScannerCommand>) {
        let (commands, receiver) = mpsc::unbounded_channel();
        (
            Self {
                commands,
                cancellation_token: CancellationToken::new(),
            },
            receiver,
        )
    }

    /// Start listening for keyboard input
    pub async fn start(&self) -> Result<()> {
        info!("Keyboard controls: SPACE code, t torch, c camera, g gallery, q cancel");

        let commands = self.commands.clone();
        let cancellation_token = self.cancellation_token.clone();

        task::spawn_blocking(move || {
            if let Err(e) = enable_raw_mode() {
                error!("Failed to enable raw mode for keyboard input: {}", e);
                return;
            }

            loop {
                if cancellation_token.is_cancelled() {
                    debug!("Keyboard input handler stopping");
                    break;
                }

                match event::poll(Duration::from_millis(100)) {
                    Ok(true) => {
                        let Ok(Event::Key(key_event)) = event::read() else {
                            continue;
                        };
                        // Press only, not release
                        if key_event.kind != KeyEventKind::Press {
                            continue;
                        }

                        let Some(command) = ScannerCommand::from_key(key_event.code) else {
                            debug!("Key pressed: {:?}", key_event.code);
                            continue;
                        };

                        debug!(?command, "Keyboard command");
                        if commands.send(command).is_err() {
                            debug!("Command receiver dropped");
                            break;
                        }
                        if command == ScannerCommand::Cancel {
                            break;
                        }
                    }
                    Ok(false) => {}
                    Err(e) => {
                        warn!("Error polling for keyboard events: {}", e);
                    }
                }
            }

            if let Err(e) = disable_raw_mode() {
                error!("Failed to disable raw mode: {}", e);
            }
            debug!("Keyboard input handler task exited");
        });

        Ok(())
    }

    pub async fn stop(&self) -> Result<()> {
        info!("Stopping keyboard input handler");
        self.cancellation_token.cancel();

        // Let the polling task observe cancellation and leave raw mode
        tokio::time::sleep(Duration::from_millis(200)).await;
        let _ = disable_raw_mode();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings() {
        assert_eq!(
            ScannerCommand::from_key(KeyCode::Char(' ')),
            Some(ScannerCommand::ToggleCode)
        );
        assert_eq!(
            ScannerCommand::from_key(KeyCode::Char('t')),
            Some(ScannerCommand::ToggleTorch)
        );
        assert_eq!(
            ScannerCommand::from_key(KeyCode::Char('C')),
            Some(ScannerCommand::SwitchCamera)
        );
        assert_eq!(
            ScannerCommand::from_key(KeyCode::Char('g')),
            Some(ScannerCommand::OpenGallery)
        );
        assert_eq!(
            ScannerCommand::from_key(KeyCode::Esc),
            Some(ScannerCommand::Cancel)
        );
        assert_eq!(ScannerCommand::from_key(KeyCode::Char('x')), None);
        assert_eq!(ScannerCommand::from_key(KeyCode::Enter), None);
    }

    #[tokio::test]
    async fn test_keyboard_handler_creation() {
        let (handler, _receiver) = KeyboardInputHandler::new();
        assert!(!handler.cancellation_token.is_cancelled());
    }

    #[tokio::test]
    async fn test_keyboard_handler_stop() {
        let (handler, _receiver) = KeyboardInputHandler::new();

        handler.stop().await.unwrap();
        assert!(handler.cancellation_token.is_cancelled());
    }
}
