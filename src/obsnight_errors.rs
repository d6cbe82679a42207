use thiserror::Error;

#[derive(Error, Debug)]
pub enum ObsNightError {
    #[error("No S/N row at {wavelength} Å in the measurement for target {target}")]
    MeasurementUnavailable { target: String, wavelength: f64 },

    #[error("No observable night between {start} and {end}: every night is unobservable or moon-excluded")]
    NoObservableNight { start: String, end: String },

    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("Invalid calendar date: {0}")]
    InvalidDate(String),

    #[error("Invalid sky coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Lookup returned no {field} for target {target}")]
    MissingLookupField { target: String, field: &'static str },

    #[error("Invalid magnitude: {0}")]
    InvalidMagnitude(String),

    #[error("Invalid observing site: {0}")]
    InvalidSite(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("S/N measurement failed: {0}")]
    MeasurementFailed(String),

    #[error("Chart rendering failed: {0}")]
    ChartFailed(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl From<ordered_float::FloatIsNan> for ObsNightError {
    fn from(_: ordered_float::FloatIsNan) -> Self {
        ObsNightError::InvalidSite("NaN geodetic value".to_string())
    }
}

impl PartialEq for ObsNightError {
    fn eq(&self, other: &Self) -> bool {
        use ObsNightError::*;
        match (self, other) {
            (
                MeasurementUnavailable {
                    target: a,
                    wavelength: wa,
                },
                MeasurementUnavailable {
                    target: b,
                    wavelength: wb,
                },
            ) => a == b && wa == wb,
            (
                NoObservableNight { start: sa, end: ea },
                NoObservableNight { start: sb, end: eb },
            ) => sa == sb && ea == eb,
            (InvalidDateRange(a), InvalidDateRange(b)) => a == b,
            (InvalidDate(a), InvalidDate(b)) => a == b,
            (InvalidCoordinate(a), InvalidCoordinate(b)) => a == b,
            (
                MissingLookupField {
                    target: a,
                    field: fa,
                },
                MissingLookupField {
                    target: b,
                    field: fb,
                },
            ) => a == b && fa == fb,
            (InvalidMagnitude(a), InvalidMagnitude(b)) => a == b,
            (InvalidSite(a), InvalidSite(b)) => a == b,
            (InvalidParameter(a), InvalidParameter(b)) => a == b,
            (MeasurementFailed(a), MeasurementFailed(b)) => a == b,
            (ChartFailed(a), ChartFailed(b)) => a == b,

            // Not comparable: equal when the variant matches
            (IoError(_), IoError(_)) => true,
            (CsvError(_), CsvError(_)) => true,
            (ConfigParse(_), ConfigParse(_)) => true,

            _ => false,
        }
    }
}
