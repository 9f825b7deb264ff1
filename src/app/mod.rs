// App module - Session controller shared by the GUI and the terminal runner

pub mod controller;

pub use controller::{Controller, FLASH_DURATION, Tab};
