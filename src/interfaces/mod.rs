//! Outer surfaces: the command-line front end.

pub mod cli;
