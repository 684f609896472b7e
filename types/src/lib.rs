pub mod formatting;

pub use formatting::NumberFormat;
