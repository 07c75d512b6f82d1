//! Core data types for the spread scanner.

pub mod analysis;
pub mod error;
pub mod price;
pub mod symbol;
pub mod token;
pub mod venue;

pub use analysis::*;
pub use error::*;
pub use price::*;
pub use symbol::*;
pub use token::*;
pub use venue::*;
