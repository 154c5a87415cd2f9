//! Text rendering of the board and parsing of shell commands.

pub mod commands;
pub mod views;
