//! Reference rate quotes as supplied by the rate feed
//!
//! The engine only consumes the numeric rate; fetching, caching and staleness
//! belong to whoever produces the quote.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

use crate::error::Result;

/// A single reference rate observation (`{ "rate": 4.15, "date": "2025-06-30" }`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateQuote {
    /// Rate in percent
    pub rate: f64,
    /// Fixing date
    pub date: NaiveDate,
}

impl RateQuote {
    /// Read a quote from a JSON file
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }
}
