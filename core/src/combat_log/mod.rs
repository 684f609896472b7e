pub mod classifier;
pub mod event;
pub mod line;
pub mod reader;

pub use classifier::EventClassifier;
pub use event::LogEvent;
pub use line::normalize_line;
pub use reader::LogFile;
