pub mod marts;
pub mod scenarios;
