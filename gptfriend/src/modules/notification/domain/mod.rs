// Notification Domain Layer

mod prompts;

pub use prompts::*;
