use chrono::NaiveDate;

pub const MIN_YEAR: i32 = 1900;

const DATE_DIGITS: usize = 8;

#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Parses a date entered as `dd/mm/yyyy`.
pub fn parse_date(value: &str) -> Result<NaiveDate, DateError> {
    let mut parts = value.trim().split('/');
    let (Some(day), Some(month), Some(year), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(DateError::Format);
    };

    if day.len() != 2 || month.len() != 2 || year.len() != 4 {
        return Err(DateError::Format);
    }

    let number = |s: &str| -> Result<u32, DateError> {
        if s.chars().all(|c| c.is_ascii_digit()) {
            s.parse::<u32>().map_err(|_| DateError::Format)
        } else {
            Err(DateError::Format)
        }
    };

    let day = number(day)?;
    let month = number(month)?;
    let year = i32::try_from(number(year)?).map_err(|_| DateError::Format)?;

    if year < MIN_YEAR {
        return Err(DateError::TooEarly(year));
    }

    NaiveDate::from_ymd_opt(year, month, day).ok_or(DateError::Invalid)
}

/// Formats raw keyboard input as `dd/mm/yyyy` while the user is typing.
///
/// Non-digits are dropped and everything beyond the eighth digit is ignored.
#[must_use]
pub fn mask_date_input(raw: &str) -> String {
    let digits = raw
        .chars()
        .filter(char::is_ascii_digit)
        .take(DATE_DIGITS)
        .collect::<Vec<_>>();

    let mut result = String::with_capacity(DATE_DIGITS + 2);
    for (i, digit) in digits.iter().enumerate() {
        if i == 2 || i == 4 {
            result.push('/');
        }
        result.push(*digit);
    }
    if digits.len() == 2 || digits.len() == 4 {
        result.push('/');
    }
    result
}

/// Formats elapsed seconds as `h:mm:ss`, or `m:ss` below one hour.
#[must_use]
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let seconds = seconds % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("Data deve estar no formato dd/mm/aaaa")]
    Format,
    #[error("Data inválida")]
    Invalid,
    #[error("Ano deve ser a partir de 1900")]
    TooEarly(i32),
}
