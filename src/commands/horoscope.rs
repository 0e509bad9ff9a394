//! Horoscope prompts composed on the user's behalf.

use chrono::{Datelike, NaiveDate};
use parley_memory::Profile;

/// Period a horoscope command asks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Forecast {
    Today,
    Tomorrow,
    Year,
}

impl Forecast {
    /// English prompt for the model. Missing birth details read "unknown".
    pub fn prompt(self, today: NaiveDate, profile: Option<&Profile>) -> String {
        let birthday = profile.map_or_else(|| "unknown".to_string(), |p| p.birthday.to_string());
        let birthplace = profile.map_or("unknown", |p| p.birthplace.as_str());

        match self {
            Self::Today => format!("Today's horoscope for {today} for {birthday} in {birthplace}."),
            Self::Tomorrow => {
                let tomorrow = today.succ_opt().unwrap_or(today);
                format!("Tomorrow's horoscope for {tomorrow} for {birthday} in {birthplace}.")
            }
            Self::Year => format!(
                "Annual forecast for the year {} for {birthday} in {birthplace}.",
                today.year()
            ),
        }
    }
}
