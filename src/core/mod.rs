pub mod dates;
pub mod financials;
pub mod merge;
pub mod report;
pub mod time;
pub mod worksheet;
