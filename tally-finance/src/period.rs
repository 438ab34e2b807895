//! Statement period inference from the document's file name.
//!
//! `TSB_April_2025.pdf`, `Nationwide Apr 2025.pdf`, `bunmite-apr-2025.pdf` and
//! `barclays_Apr2025.pdf` all name the `Apr 2025` statement.

use std::sync::LazyLock;

use regex::Regex;

/// Month/year tag derived from a file name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementPeriod {
    /// Display label such as `Apr 2025`
    pub month: Option<String>,
    pub year: Option<i32>,
}

static MONTH_YEAR: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:^|[^a-z])(?P<month>jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)[ _.-]?(?P<year>(?:19|20)\d{2})(?:\D|$)",
    )
    .ok()
});

static YEAR: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?:^|\D)(?P<year>(?:19|20)\d{2})(?:\D|$)").ok());

pub fn infer_period(file_name: &str) -> StatementPeriod {
    if let Some(caps) = MONTH_YEAR.as_ref().and_then(|re| re.captures(file_name)) {
        let month = capitalize(caps["month"].get(..3).unwrap_or_default());
        let year = caps["year"].parse().ok();
        return StatementPeriod {
            month: Some(format!("{month} {}", &caps["year"])),
            year,
        };
    }
    StatementPeriod {
        month: None,
        year: YEAR
            .as_ref()
            .and_then(|re| re.captures(file_name))
            .and_then(|caps| caps["year"].parse().ok()),
    }
}

fn capitalize(s: &str) -> String {
    let lower = s.to_ascii_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
