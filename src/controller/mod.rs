mod builder;
mod debounce;
mod interface;
mod state;

pub use builder::ScannerControllerBuilder;
pub use debounce::DebounceCounter;
pub use interface::ScannerController;
pub use state::ControllerState;
