// Notification Infrastructure Layer

mod scheduler;

pub use scheduler::*;
