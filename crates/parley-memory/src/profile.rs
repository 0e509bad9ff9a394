//! Birth details a user shares with `/setinfo`.

use chrono::NaiveDate;
use parley_core::error::ParleyError;

/// Name, birthday and birthplace of one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub birthday: NaiveDate,
    pub birthplace: String,
}

impl Profile {
    /// Parse `"Name, YYYY-MM-DD, Birthplace"`. The birthplace may itself
    /// contain commas ("Lyon, France").
    pub fn parse(text: &str) -> Result<Self, ParleyError> {
        let mut fields = text.splitn(3, ',').map(str::trim);
        let (Some(name), Some(birthday), Some(birthplace)) =
            (fields.next(), fields.next(), fields.next())
        else {
            return Err(ParleyError::Profile(
                "expected three comma-separated fields".into(),
            ));
        };

        if name.is_empty() || birthplace.is_empty() {
            return Err(ParleyError::Profile(
                "name and birthplace must not be empty".into(),
            ));
        }

        let birthday = NaiveDate::parse_from_str(birthday, "%Y-%m-%d")
            .map_err(|e| ParleyError::Profile(format!("birthday {birthday:?}: {e}")))?;

        Ok(Self {
            name: name.to_string(),
            birthday,
            birthplace: birthplace.to_string(),
        })
    }

    /// One-line summary handed to the model.
    pub fn prompt_line(&self) -> String {
        format!(
            "User info: Name: {}, Birthday: {}, Birthplace: {}.",
            self.name, self.birthday, self.birthplace
        )
    }
}
