//! Date/session predicate for bulletin queries.
//!
//! Bulletins are not indexed by date or session. Both are encoded in
//! `unique_id` (`<row>_<DD.MM.YYYY>_<Session>`) and usually in the source PDF
//! filename, so selection is a case-insensitive substring match on either.

use std::fmt;

/// One of the two daily observation times
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Morning,
    Evening,
}

impl Session {
    /// Only the exact label `"Evening"` selects the evening session; anything
    /// else, including no label at all, falls back to morning.
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            Some("Evening") => Session::Evening,
            _ => Session::Morning,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Session::Morning => "Morning",
            Session::Evening => "Evening",
        }
    }

    pub fn time_label(&self) -> &'static str {
        match self {
            Session::Morning => "08:00",
            Session::Evening => "18:00",
        }
    }

    /// Bulletin column holding this session's water level
    pub fn water_level_column(&self) -> &'static str {
        match self {
            Session::Morning => "water_level_0800hrs_m",
            Session::Evening => "water_level_1800hrs_m",
        }
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SQL predicate fragment with its positional parameters (`$1`, `$2`, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateSessionFilter {
    pub clause: String,
    pub params: Vec<String>,
}

impl DateSessionFilter {
    pub fn is_empty(&self) -> bool {
        self.clause.is_empty()
    }
}

/// Reformat an ISO `YYYY-MM-DD` date as `DD.MM.YYYY`.
///
/// Input is not validated: missing components become empty strings, which
/// produce a pattern that matches nothing rather than an error.
pub fn dot_date(iso: &str) -> String {
    let mut parts = iso.splitn(3, '-');
    let yyyy = parts.next().unwrap_or("");
    let mm = parts.next().unwrap_or("");
    let dd = parts.next().unwrap_or("");
    format!("{dd}.{mm}.{yyyy}")
}

/// Build the `unique_id`/`source_file` predicate for a date and session label.
///
/// Returns an empty filter when either input is absent or empty, so callers
/// fall back to unfiltered results.
pub fn build_date_session_filter(date: Option<&str>, session: Option<&str>) -> DateSessionFilter {
    let (date, session) = match (non_empty(date), non_empty(session)) {
        (Some(d), Some(s)) => (d, s),
        _ => return DateSessionFilter::default(),
    };

    let date_dot = dot_date(date);

    DateSessionFilter {
        clause: "(wlb.unique_id ILIKE $1 OR wlb.source_file ILIKE $2)".to_string(),
        params: vec![
            format!("%_{date_dot}_{session}%"),
            format!("%{date_dot}%{session}%"),
        ],
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
