//! Recording file names.
//!
//! An explicit name wins and is used verbatim with the suffix appended.
//! Otherwise the name is the local wall-clock time as `YYYY-MM-DD_HHMMSS`,
//! followed by the suffix and the `.rec` extension.

use chrono::{DateTime, Local, TimeZone};

/// Extension of generated recording names
pub const RECORDING_EXTENSION: &str = ".rec";

pub fn format_timestamp<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%Y-%m-%d_%H%M%S").to_string()
}

/// Build a recording name from an optional explicit name, a suffix and a
/// clock reading.
pub fn generate<Tz: TimeZone>(explicit: Option<&str>, suffix: &str, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match explicit.filter(|name| !name.is_empty()) {
        Some(name) => format!("{}{}", name, suffix),
        None => format!("{}{}{}", format_timestamp(now), suffix, RECORDING_EXTENSION),
    }
}

/// Source of the wall-clock time for generated names.
///
/// Generated names have one second resolution: two starts within the same
/// second without an explicit name produce the same name.
pub type Clock = fn() -> DateTime<Local>;

/// The local system clock
pub fn system_clock() -> DateTime<Local> {
    Local::now()
}

/// [`generate`] with a reading of `clock`.
pub fn generate_with(explicit: Option<&str>, suffix: &str, clock: Clock) -> String {
    generate(explicit, suffix, &clock())
}
