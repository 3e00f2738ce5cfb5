//! Support library for the `city-guide` and `research` programs.
//!
//! Each program builds one [`scout`] agent, runs it once, and prints the
//! structured answer:
//!
//! - [`guide`] asks for a [`CityGuide`](records::CityGuide), with the
//!   [`capital`] lookup tool available
//! - [`research`] asks for a [`ResearchResponse`](records::ResearchResponse)
//!   with no tools

pub mod capital;
pub mod config;
pub mod error;
pub mod guide;
pub mod logging;
pub mod records;
pub mod render;
pub mod research;

pub use error::{CliError, Result};
