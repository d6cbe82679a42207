//! Civil-hour nighttime band.
use crate::constants::{NIGHT_BAND_END_HOUR, NIGHT_BAND_START_HOUR};

/// Half-open band of local civil hours `[start_hour, end_hour)`, wrapping past midnight when
/// `start_hour > end_hour`. The default `[17, 5)` covers 17:00 through 04:59.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NightBand {
    pub start_hour: u8,
    pub end_hour: u8,
}

impl Default for NightBand {
    fn default() -> Self {
        NightBand {
            start_hour: NIGHT_BAND_START_HOUR,
            end_hour: NIGHT_BAND_END_HOUR,
        }
    }
}

impl NightBand {
    pub fn contains(&self, hour: u8) -> bool {
        if self.start_hour > self.end_hour {
            hour >= self.start_hour || hour < self.end_hour
        } else {
            (self.start_hour..self.end_hour).contains(&hour)
        }
    }
}
