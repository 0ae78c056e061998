pub mod format;
pub mod report;
pub mod risk;
pub mod upstream;
