// Library module - Saved routines and JSON file exchange

pub mod store;
pub mod transfer;

pub use store::{LibraryError, RoutineLibrary, summary};
pub use transfer::{TransferError, export_file_name, parse_routine};
