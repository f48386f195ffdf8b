use once_cell::sync::Lazy;
use regex::Regex;

pub type Validator = Box<dyn Fn(&str) -> Result<(), String> + Send>;

pub const MIN_AMOUNT: f64 = 0.01;
pub const MAX_AMOUNT: f64 = 10_000.0;
pub const MIN_DESCRIPTION_LENGTH: usize = 3;
pub const MAX_DESCRIPTION_LENGTH: usize = 100;
pub const MIN_NAME_LENGTH: usize = 2;

pub const AMOUNT_INVALID: &str = "Voer een geldig bedrag in";
pub const AMOUNT_TOO_LOW: &str = "Bedrag moet groter zijn dan €0";
pub const AMOUNT_TOO_HIGH: &str = "Bedrag mag niet hoger zijn dan €10.000";
pub const EMAIL_INVALID: &str = "Voer een geldig e-mailadres in";
pub const PHONE_INVALID: &str = "Voer een geldig Nederlands telefoonnummer in";
pub const PAYMENT_METHOD_REQUIRED: &str = "Selecteer minimaal één betaalmethode";

static AMOUNT_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(\.\d*)?|\.\d+)").expect("Invalid amount pattern"));
static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email pattern"));
static DUTCH_PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\+31|0031|0)[6-9]\d{8}$").expect("Invalid phone pattern"));

/// Keeps digits, `.` and `,`, then turns the first `,` into a decimal point.
pub fn normalize_amount(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ','))
        .collect();
    kept.replacen(',', ".", 1)
}

/// Reads the leading decimal number of a normalized amount. Trailing garbage
/// such as a second decimal point is ignored.
pub fn parse_amount(normalized: &str) -> Option<f64> {
    let found = AMOUNT_PREFIX.find(normalized)?;
    found.as_str().parse().ok()
}

pub fn check_amount(raw: &str) -> Result<f64, String> {
    let amount = parse_amount(&normalize_amount(raw)).ok_or(AMOUNT_INVALID)?;
    if amount < MIN_AMOUNT {
        return Err(AMOUNT_TOO_LOW.to_string());
    }
    if amount > MAX_AMOUNT {
        return Err(AMOUNT_TOO_HIGH.to_string());
    }
    Ok(amount)
}

pub fn is_valid_amount(raw: &str) -> bool {
    check_amount(raw).is_ok()
}

pub fn description_within_bounds(description: &str) -> bool {
    let len = description.trim().chars().count();
    (MIN_DESCRIPTION_LENGTH..=MAX_DESCRIPTION_LENGTH).contains(&len)
}

/// Live feedback while typing: an empty description is not an error yet.
pub fn check_description(description: &str) -> Result<(), String> {
    let len = description.trim().chars().count();
    if len > 0 && len < MIN_DESCRIPTION_LENGTH {
        return Err(format!(
            "Omschrijving moet minimaal {MIN_DESCRIPTION_LENGTH} karakters bevatten"
        ));
    }
    if len > MAX_DESCRIPTION_LENGTH {
        return Err(format!(
            "Omschrijving mag maximaal {MAX_DESCRIPTION_LENGTH} karakters bevatten"
        ));
    }
    Ok(())
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

fn strip_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

pub fn is_valid_phone(phone: &str) -> bool {
    DUTCH_PHONE.is_match(&strip_phone(phone))
}

/// `+31612345678` reads as `+31 6 12345678`, `0612345678` as `06 12345678`.
pub fn format_phone(phone: &str) -> String {
    let cleaned = strip_phone(phone);
    if let Some(rest) = cleaned.strip_prefix("+31") {
        if rest.len() == 9 && rest.is_char_boundary(1) {
            return format!("+31 {} {}", &rest[..1], &rest[1..]);
        }
        return format!("+31 {rest}");
    }
    if let Some(rest) = cleaned.strip_prefix("06") {
        return format!("06 {rest}");
    }
    phone.to_string()
}

/// Blank names fail; otherwise the raw length counts, padding included.
fn name_long_enough(name: &str) -> bool {
    !name.trim().is_empty() && name.chars().count() >= MIN_NAME_LENGTH
}

/// Completeness of the personal details block. Only an empty phone number
/// counts as absent; anything else must be a valid number.
pub fn personal_info_complete(first: &str, last: &str, email: &str, phone: Option<&str>) -> bool {
    name_long_enough(first)
        && name_long_enough(last)
        && is_valid_email(email)
        && phone.filter(|p| !p.is_empty()).is_none_or(is_valid_phone)
}

/// Euro amount in Dutch notation, e.g. `€ 1.234,50`.
pub fn format_eur(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}€ {grouped},{:02}", cents % 100)
}

pub fn initials(first: &str, last: &str) -> String {
    first
        .chars()
        .next()
        .into_iter()
        .chain(last.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

pub fn amount() -> Validator {
    Box::new(|value: &str| check_amount(value).map(|_| ()))
}

pub fn description() -> Validator {
    Box::new(check_description)
}

/// Only complains once something was typed.
pub fn min_length(min: usize, message: impl Into<String>) -> Validator {
    let message = message.into();
    Box::new(move |value: &str| {
        if !value.trim().is_empty() && value.chars().count() < min {
            Err(message.clone())
        } else {
            Ok(())
        }
    })
}

pub fn email() -> Validator {
    Box::new(|value: &str| {
        if value.is_empty() || is_valid_email(value) {
            Ok(())
        } else {
            Err(EMAIL_INVALID.to_string())
        }
    })
}

pub fn phone() -> Validator {
    Box::new(|value: &str| {
        if value.is_empty() || is_valid_phone(value) {
            Ok(())
        } else {
            Err(PHONE_INVALID.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_scenarios() {
        assert_eq!(normalize_amount("22,50"), "22.50");
        assert!(is_valid_amount("22,50"));
        assert!(!is_valid_amount("0"));
        assert!(!is_valid_amount("15000"));
        assert!(is_valid_amount("10000"));
        assert!(is_valid_amount("0.01"));
    }

    #[test]
    fn amount_messages() {
        assert_eq!(check_amount(""), Err(AMOUNT_INVALID.to_string()));
        assert_eq!(check_amount("abc"), Err(AMOUNT_INVALID.to_string()));
        assert_eq!(check_amount("0,00"), Err(AMOUNT_TOO_LOW.to_string()));
        assert_eq!(check_amount("10000.01"), Err(AMOUNT_TOO_HIGH.to_string()));
        assert_eq!(check_amount("€ 12,5"), Ok(12.5));
    }

    #[test]
    fn normalization_keeps_only_number_characters() {
        assert_eq!(normalize_amount("€ 1,234,5x"), "1.234,5");
        assert_eq!(parse_amount("1.234,5"), Some(1.234));
        assert_eq!(parse_amount(".5"), Some(0.5));
        assert_eq!(parse_amount("."), None);
    }

    #[test]
    fn description_scenarios() {
        assert!(!description_within_bounds("ab"));
        assert!(description_within_bounds(&"a".repeat(100)));
        assert!(!description_within_bounds(&"a".repeat(101)));
        assert!(!description_within_bounds("  ab  "));
    }

    #[test]
    fn description_feedback_waits_for_input() {
        assert!(check_description("").is_ok());
        assert!(check_description("ab").is_err());
        assert!(check_description("Oppassen").is_ok());
        assert!(check_description(&"x".repeat(101)).is_err());
    }

    #[test]
    fn email_and_phone() {
        assert!(is_valid_email("jan@voorbeeld.nl"));
        assert!(!is_valid_email("jan@voorbeeld"));
        assert!(!is_valid_email("jan @voorbeeld.nl"));

        assert!(is_valid_phone("06-12345678"));
        assert!(is_valid_phone("+31 6 12345678"));
        assert!(is_valid_phone("0031612345678"));
        assert!(!is_valid_phone("0512345678"));
        assert!(!is_valid_phone("0612345"));
    }

    #[test]
    fn phone_formatting() {
        assert_eq!(format_phone("+31612345678"), "+31 6 12345678");
        assert_eq!(format_phone("06-12345678"), "06 12345678");
        assert_eq!(format_phone("0031612345678"), "0031612345678");
    }

    #[test]
    fn personal_info_rules() {
        assert!(personal_info_complete("Jan", "Jansen", "jan@voorbeeld.nl", None));
        assert!(personal_info_complete("Jan", "Jansen", "jan@voorbeeld.nl", Some("")));
        assert!(!personal_info_complete("J", "Jansen", "jan@voorbeeld.nl", None));
        assert!(!personal_info_complete("Jan", "", "jan@voorbeeld.nl", None));
        assert!(!personal_info_complete("Jan", "Jansen", "jan", None));
        assert!(!personal_info_complete("Jan", "Jansen", "jan@voorbeeld.nl", Some("123")));
        assert!(personal_info_complete(
            "Jan",
            "Jansen",
            "jan@voorbeeld.nl",
            Some("06 12345678")
        ));
    }

    #[test]
    fn personal_info_checks_raw_values() {
        assert!(personal_info_complete(" J", "Jansen", "jan@voorbeeld.nl", None));
        assert!(!personal_info_complete("  ", "Jansen", "jan@voorbeeld.nl", None));
        assert!(!personal_info_complete("Jan", "Jansen", " jan@voorbeeld.nl", None));
        assert!(!personal_info_complete("Jan", "Jansen", "jan@voorbeeld.nl", Some("   ")));
    }

    #[test]
    fn euro_formatting() {
        assert_eq!(format_eur(22.5), "€ 22,50");
        assert_eq!(format_eur(1234.5), "€ 1.234,50");
        assert_eq!(format_eur(10_000.0), "€ 10.000,00");
        assert_eq!(format_eur(0.0), "€ 0,00");
    }

    #[test]
    fn validators_stay_quiet_on_empty_input() {
        assert!(email()("").is_ok());
        assert!(phone()("").is_ok());
        assert!(phone()("  ").is_err());
        assert!(min_length(2, "te kort")(" J").is_ok());
        assert!(min_length(2, "te kort")("").is_ok());
        assert_eq!(min_length(2, "te kort")("J"), Err("te kort".to_string()));
        assert!(amount()("22,50").is_ok());
    }

    #[test]
    fn initials_from_names() {
        assert_eq!(initials("jan", "jansen"), "JJ");
        assert_eq!(initials("Jan", ""), "J");
    }
}
