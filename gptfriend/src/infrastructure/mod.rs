pub mod event_bus;
pub mod logging;

pub use event_bus::{AppEvent, EventBus};
pub use logging::init_tracing;
