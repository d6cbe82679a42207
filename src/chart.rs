//! Finder-chart request for the selected night.
//!
//! The core only assembles what a chart service consumes: the observing date, the site, and a
//! newline-separated coordinate list with one `<Name> hh mm ss.s ±dd mm ss.s` line per target.
//! Target names lose their whitespace so that every line splits into exactly seven tokens.
//! Rendering is delegated to a [`ChartRenderer`] collaborator.
use std::path::Path;

use hifitime::Epoch;

use crate::conversion::{format_dec_dms, format_ra_hms};
use crate::observers::ObservingSite;
use crate::obsnight_errors::ObsNightError;
use crate::targets::Target;
use crate::time::format_calendar_date;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    pub date: Epoch,
    pub site: ObservingSite,
    pub coordinates: String,
}

/// One chart line for `target`.
pub fn coordinate_line(target: &Target) -> String {
    let name: String = target.name.split_whitespace().collect();
    format!(
        "{} {} {}",
        name,
        format_ra_hms(target.ra),
        format_dec_dms(target.dec)
    )
}

impl ChartRequest {
    pub fn new(date: Epoch, site: &ObservingSite, targets: &[Target]) -> Self {
        let coordinates = targets
            .iter()
            .map(coordinate_line)
            .collect::<Vec<_>>()
            .join("\n");

        ChartRequest {
            date,
            site: site.clone(),
            coordinates,
        }
    }

    /// Observing date as `YYYY-MM-DD`.
    pub fn date_string(&self) -> String {
        format_calendar_date(&self.date)
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.coordinates.lines()
    }
}

/// Chart collaborator: produces an image or document at `output` from a request.
///
/// Errors
/// ------
/// * implementations report their own failures as [`ObsNightError::ChartFailed`] or
///   [`ObsNightError::IoError`]
pub trait ChartRenderer {
    fn render(&self, request: &ChartRequest, output: &Path) -> Result<(), ObsNightError>;
}

impl<R: ChartRenderer + ?Sized> ChartRenderer for &R {
    fn render(&self, request: &ChartRequest, output: &Path) -> Result<(), ObsNightError> {
        (**self).render(request, output)
    }
}
