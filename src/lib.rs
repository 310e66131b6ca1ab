pub mod error;
pub mod launch;
pub mod messages;
pub mod options;
pub mod output;
pub mod parameters;
pub mod report;
pub mod state;

pub use error::{Error, Result};
