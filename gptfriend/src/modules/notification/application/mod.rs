// Notification Application Layer

mod generator;

pub use generator::*;
