//! Plain-text rendering of the structured answers.

use std::io::Write;

use crate::records::{CityGuide, ResearchResponse};

/// Write a city guide as three lines.
///
/// # Errors
///
/// Returns [`scout::Error::Io`] if the writer fails.
pub fn city_guide(out: &mut impl Write, guide: &CityGuide) -> scout::Result<()> {
    writeln!(out, "{} ({}) — {}", guide.capital, guide.country, guide.summary)?;
    writeln!(out, "Famous places: {}", guide.famous_places.join("; "))?;
    writeln!(out, "Things to do: {}", guide.things_to_do.join("; "))?;
    Ok(())
}

/// Write a research answer: the topic, then the summary on its own line.
///
/// # Errors
///
/// Returns [`scout::Error::Io`] if the writer fails.
pub fn research(out: &mut impl Write, response: &ResearchResponse) -> scout::Result<()> {
    writeln!(out, "Topic: {}", response.topic)?;
    writeln!(out, "{}", response.summary)?;
    Ok(())
}
