//! # Targets and the lookup collaborator
//!
//! A [`Target`] is created once per run from what a name-resolution service returns, and is
//! immutable afterwards. Resolution itself is external: anything implementing
//! [`TargetResolver`] can be used (an HTTP client to a name resolver, a local catalog, a test
//! double). The crate ships [`CatalogResolver`], an in-memory catalog optionally loaded from CSV.
//!
//! ## Lookup contract
//!
//! `resolve(name)` never fails; it returns a [`LookupRecord`] whose fields may each be absent.
//! [`Target::from_lookup`] then decides what is fatal:
//!
//! - missing or malformed RA/Dec → error (the target cannot be scheduled),
//! - missing magnitude → `magnitude = None` (the target is scheduled but its exposure is not solved),
//! - malformed magnitude → error.
//!
//! ## CSV catalog format
//!
//! ```text
//! name,ra,dec,mag
//! M87,12h30m49.4s,+12d23m28s,9.59 g
//! NGC 4993,13 09 47.7,-23 23 02,
//! ```
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::constants::Degree;
use crate::conversion::{parse_dec_to_deg, parse_ra_to_deg};
use crate::obsnight_errors::ObsNightError;

/// Raw answer of a lookup service; every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupRecord {
    pub ra: Option<String>,
    pub dec: Option<String>,
    pub mag: Option<String>,
}

impl LookupRecord {
    pub fn new(ra: Option<&str>, dec: Option<&str>, mag: Option<&str>) -> Self {
        LookupRecord {
            ra: ra.map(str::to_string),
            dec: dec.map(str::to_string),
            mag: mag.map(str::to_string),
        }
    }
}

/// Lookup collaborator: resolves a target name to coordinates and brightness.
pub trait TargetResolver {
    fn resolve(&self, name: &str) -> LookupRecord;
}

impl<R: TargetResolver + ?Sized> TargetResolver for &R {
    fn resolve(&self, name: &str) -> LookupRecord {
        (**self).resolve(name)
    }
}

/// A sky target fixed for the duration of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    /// Identifier, unique within a run.
    pub name: String,
    /// Right ascension, degrees.
    pub ra: Degree,
    /// Declination, degrees.
    pub dec: Degree,
    /// Apparent magnitude, when the lookup reported one.
    pub magnitude: Option<f64>,
}

/// Parse a lookup magnitude such as `"9.59"`, `"9.59 g"` or `"15.3g"`.
///
/// Only the first whitespace-separated token is read; a trailing band letter is ignored.
/// `NaN` and infinities are rejected.
pub fn parse_magnitude(raw: &str) -> Result<f64, ObsNightError> {
    let token = raw
        .split_whitespace()
        .next()
        .ok_or_else(|| ObsNightError::InvalidMagnitude(raw.to_string()))?;

    token
        .parse::<f64>()
        .or_else(|_| {
            token
                .trim_end_matches(|c: char| c.is_ascii_alphabetic())
                .parse::<f64>()
        })
        .ok()
        .filter(|magnitude| magnitude.is_finite())
        .ok_or_else(|| ObsNightError::InvalidMagnitude(raw.to_string()))
}

impl Target {
    pub fn new(name: impl Into<String>, ra: Degree, dec: Degree, magnitude: Option<f64>) -> Self {
        Target {
            name: name.into(),
            ra,
            dec,
            magnitude,
        }
    }

    /// Build a target from a lookup answer.
    ///
    /// Arguments
    /// ---------
    /// * `name`: the name that was resolved
    /// * `record`: the lookup answer
    ///
    /// Return
    /// ------
    /// * the target, with `magnitude = None` when the lookup had no magnitude
    ///
    /// Errors
    /// ------
    /// * [`ObsNightError::MissingLookupField`] if RA or Dec is absent
    /// * [`ObsNightError::InvalidCoordinate`] / [`ObsNightError::InvalidMagnitude`] if a field
    ///   cannot be parsed
    pub fn from_lookup(name: &str, record: &LookupRecord) -> Result<Self, ObsNightError> {
        let missing = |field| ObsNightError::MissingLookupField {
            target: name.to_string(),
            field,
        };

        let ra = parse_ra_to_deg(record.ra.as_deref().ok_or_else(|| missing("ra"))?)?;
        let dec = parse_dec_to_deg(record.dec.as_deref().ok_or_else(|| missing("dec"))?)?;
        let magnitude = match record.mag.as_deref().map(str::trim) {
            None | Some("") => {
                warn!(target_name = name, "lookup returned no magnitude");
                None
            }
            Some(raw) => Some(parse_magnitude(raw)?),
        };

        Ok(Target::new(name, ra, dec, magnitude))
    }
}

/// Resolve every name with `resolver`, in order.
///
/// The first target that cannot be built aborts the whole resolution.
pub fn resolve_targets<R: TargetResolver>(
    names: &[&str],
    resolver: &R,
) -> Result<Vec<Target>, ObsNightError> {
    names
        .iter()
        .map(|name| Target::from_lookup(name, &resolver.resolve(name)))
        .collect()
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    name: String,
    ra: Option<String>,
    dec: Option<String>,
    mag: Option<String>,
}

/// In-memory lookup collaborator.
///
/// Unknown names resolve to an empty [`LookupRecord`].
#[derive(Debug, Clone, Default)]
pub struct CatalogResolver {
    entries: HashMap<String, LookupRecord>,
}

impl CatalogResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, record: LookupRecord) {
        self.entries.insert(name.into(), record);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read a catalog from CSV with a `name,ra,dec,mag` header.
    pub fn from_reader<Rd: Read>(reader: Rd) -> Result<Self, ObsNightError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut catalog = CatalogResolver::new();
        for row in csv_reader.deserialize::<CatalogRow>() {
            let row = row?;
            let record = LookupRecord {
                ra: row.ra,
                dec: row.dec,
                mag: row.mag,
            };
            catalog.insert(row.name, record);
        }
        Ok(catalog)
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, ObsNightError> {
        let file = std::fs::File::open(path)?;
        CatalogResolver::from_reader(file)
    }
}

impl TargetResolver for CatalogResolver {
    fn resolve(&self, name: &str) -> LookupRecord {
        self.entries.get(name).cloned().unwrap_or_default()
    }
}
