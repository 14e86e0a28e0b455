pub mod classified;
pub mod enums;
pub mod patient;

pub use classified::*;
pub use enums::*;
pub use patient::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid value '{value}' for {field}")]
    InvalidEnum { field: String, value: String },
}
