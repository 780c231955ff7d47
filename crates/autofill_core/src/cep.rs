use std::fmt;

/// Number of digits in a complete CEP.
pub const CEP_LEN: usize = 8;

/// Digits before the separator in the display form (`12345-678`).
const PREFIX_LEN: usize = 5;

/// A normalized CEP: exactly [`CEP_LEN`] ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cep(String);

impl Cep {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display form with the separator after the fifth digit.
    pub fn formatted(&self) -> String {
        format_cep(&self.0)
    }
}

impl fmt::Display for Cep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CepRejection {
    /// Nothing to look up; callers ignore this silently.
    #[error("empty postal code")]
    Empty,
    #[error("postal code must have 8 digits, got {digits}")]
    WrongLength { digits: usize },
}

/// Strips every non-digit character and checks the digit count.
pub fn normalize_cep(raw: &str) -> Result<Cep, CepRejection> {
    let digits = digits_of(raw);
    match digits.len() {
        0 => Err(CepRejection::Empty),
        CEP_LEN => Ok(Cep(digits)),
        n => Err(CepRejection::WrongLength { digits: n }),
    }
}

/// Formats partial or complete input for display: digits only, at most
/// [`CEP_LEN`] of them, with a `-` after the fifth digit when more follow.
pub fn format_cep(raw: &str) -> String {
    let mut digits = digits_of(raw);
    digits.truncate(CEP_LEN);
    if digits.len() > PREFIX_LEN {
        digits.insert(PREFIX_LEN, '-');
    }
    digits
}

fn digits_of(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_accepts_common_spellings() {
        for raw in ["72006-206", "72006206", "72.006-206", " 72006-206 "] {
            assert_eq!(normalize_cep(raw).unwrap().as_str(), "72006206", "{raw}");
        }
    }

    #[test]
    fn normalize_distinguishes_empty_from_wrong_length() {
        assert_eq!(normalize_cep(""), Err(CepRejection::Empty));
        assert_eq!(normalize_cep(" -.- "), Err(CepRejection::Empty));
        assert_eq!(
            normalize_cep("1234"),
            Err(CepRejection::WrongLength { digits: 4 })
        );
        assert_eq!(
            normalize_cep("123456789"),
            Err(CepRejection::WrongLength { digits: 9 })
        );
    }

    #[test]
    fn normalize_ignores_non_ascii_digits() {
        // Arabic-Indic digits are not CEP digits.
        assert_eq!(
            normalize_cep("١٢٣٤٥٦٧٨"),
            Err(CepRejection::Empty)
        );
    }

    #[test]
    fn format_inserts_separator_only_past_five_digits() {
        assert_eq!(format_cep(""), "");
        assert_eq!(format_cep("123"), "123");
        assert_eq!(format_cep("12345"), "12345");
        assert_eq!(format_cep("123456"), "12345-6");
        assert_eq!(format_cep("01001000"), "01001-000");
        assert_eq!(format_cep("01001-000999"), "01001-000");
        assert_eq!(format_cep("ab01.001c000"), "01001-000");
    }

    #[test]
    fn format_is_idempotent() {
        let samples = [
            "", "1", "12345", "123456", "12345-6", "01001000", "01001-000",
            "0-1-0-0-1-0-0-0-9", "  99999 999 ", "abc", "1234567890123",
        ];
        for raw in samples {
            let once = format_cep(raw);
            assert_eq!(format_cep(&once), once, "{raw}");
        }
    }

    #[test]
    fn formatted_cep_matches_display_rules() {
        let cep = normalize_cep("01001000").unwrap();
        assert_eq!(cep.formatted(), "01001-000");
        assert_eq!(cep.to_string(), "01001000");
    }
}
