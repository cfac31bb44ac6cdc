//! The two tasks running while the tracker is up: the reporter and the input loop
pub mod report;
pub mod track;
