//! Built-in format profiles, one module per institution.

pub mod barclays;
pub mod nationwide;
pub mod tsb;
pub mod virgin_money;

use anyhow::{Context, Result};
use regex::Regex;

use crate::profile::FormatProfile;
use crate::types::InstitutionId;

const MONTHS: &str = "Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec";

/// Read-only set of format profiles, in identification order
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    profiles: Vec<FormatProfile>,
}

impl ProfileRegistry {
    /// Barclays, Virgin Money, Nationwide, TSB; first identification match wins.
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(vec![
            barclays::profile().context("building Barclays profile")?,
            virgin_money::profile().context("building Virgin Money profile")?,
            nationwide::profile().context("building Nationwide profile")?,
            tsb::profile().context("building TSB profile")?,
        ]))
    }

    pub fn new(profiles: Vec<FormatProfile>) -> Self {
        Self { profiles }
    }

    pub fn get(&self, institution: InstitutionId) -> Option<&FormatProfile> {
        self.profiles.iter().find(|p| p.institution == institution)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FormatProfile> {
        self.profiles.iter()
    }
}

/// `DD Mon` (or `DD Mon YY`) at the start of a line, captured as `date`.
pub(crate) fn day_month_anchor(with_year: bool) -> Result<Regex> {
    let pattern = if with_year {
        format!(r"(?i)^(?P<date>\d{{2}}\s+(?:{MONTHS})\s+\d{{2}})\b")
    } else {
        format!(r"(?i)^(?P<date>\d{{2}}\s(?:{MONTHS}))\b")
    };
    Ok(Regex::new(&pattern)?)
}

pub(crate) fn short_date_prefix() -> Result<Regex> {
    Ok(Regex::new(&format!(r"(?i)^\d{{2}}\s(?:{MONTHS})\s+"))?)
}

/// Decimal tokens with two (or four, as some tables print) places and an optional
/// overdrawn suffix.
pub(crate) fn amount_token(overdrawn_marker: Option<&str>) -> Result<Regex> {
    let base = r"(?P<amount>\d[\d,]*\.\d{2}(?:\d{2})?)\b";
    let pattern = match overdrawn_marker {
        Some(marker) => format!(r"{base}(?:\s?(?P<od>{})\b)?", regex::escape(marker)),
        None => base.to_string(),
    };
    Ok(Regex::new(&pattern)?)
}

/// `Page 3`, `Page 3 of 7`
pub(crate) fn page_footer() -> Result<Regex> {
    Ok(Regex::new(r"(?i)^page\s+\d+(?:\s+of\s+\d+)?$")?)
}

pub(crate) fn keywords(pattern: &str) -> Result<Option<Regex>> {
    Ok(Some(Regex::new(pattern)?))
}
