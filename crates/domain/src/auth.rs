//! Login derivation rules for issued credentials.
//!
//! A login is derived from the person's name: up to four letters of the
//! first name, a dot, and up to four characters built from the surname.
//! A surname may carry a trailing number (siblings with identical names);
//! the digits are folded into the second part so the login stays at most
//! nine characters.

use registar_core::{AppError, AppResult};

/// Characters used when generating an initial password.
pub const INITIAL_PASSWORD_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789@#$&*";

/// Length of a generated initial password.
pub const INITIAL_PASSWORD_LENGTH: usize = 12;

/// Derives a login name from a person's first and last name.
///
/// The surname must consist of letters optionally followed by digits;
/// anything else (leading digits, digits in the middle) is rejected.
pub fn derive_login(first_name: &str, last_name: &str) -> AppResult<String> {
    let first: String = fold_diacritics(first_name)
        .chars()
        .filter(|character| !character.is_whitespace())
        .take(4)
        .collect();
    let first = first.to_lowercase();

    if first.is_empty() {
        return Err(AppError::Validation(
            "first name must not be empty".to_owned(),
        ));
    }

    let last = last_name.trim();
    let digit_start = last
        .char_indices()
        .find(|(_, character)| character.is_ascii_digit())
        .map(|(index, _)| index);
    let (name_part, number_part) = match digit_start {
        Some(index) => last.split_at(index),
        None => (last, ""),
    };

    if name_part.is_empty() || !number_part.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(AppError::Validation(format!(
            "surname must be letters optionally followed by digits, got '{last}'"
        )));
    }

    let name_part = fold_diacritics(name_part);
    let second = match number_part.len() {
        0 => take_lowercase(&name_part, 4),
        1 => format!("{}{number_part}", take_lowercase(&name_part, 3)),
        _ => format!("{}{}", take_lowercase(&name_part, 2), &number_part[..2]),
    };

    Ok(format!("{first}.{second}"))
}

fn take_lowercase(value: &str, count: usize) -> String {
    let taken: String = value.chars().take(count).collect();
    taken.to_lowercase()
}

/// Replaces Slovak and Czech accented letters with their base letters.
fn fold_diacritics(value: &str) -> String {
    value.chars().map(fold_character).collect()
}

fn fold_character(character: char) -> char {
    match character {
        'á' | 'ä' => 'a',
        'Á' | 'Ä' => 'A',
        'č' => 'c',
        'Č' => 'C',
        'ď' => 'd',
        'Ď' => 'D',
        'é' | 'ě' => 'e',
        'É' | 'Ě' => 'E',
        'í' => 'i',
        'Í' => 'I',
        'ĺ' | 'ľ' => 'l',
        'Ĺ' | 'Ľ' => 'L',
        'ň' => 'n',
        'Ň' => 'N',
        'ó' | 'ô' | 'ö' => 'o',
        'Ó' | 'Ô' | 'Ö' => 'O',
        'ŕ' | 'ř' => 'r',
        'Ŕ' | 'Ř' => 'R',
        'š' => 's',
        'Š' => 'S',
        'ť' => 't',
        'Ť' => 'T',
        'ú' | 'ů' | 'ü' => 'u',
        'Ú' | 'Ů' | 'Ü' => 'U',
        'ý' => 'y',
        'Ý' => 'Y',
        'ž' => 'z',
        'Ž' => 'Z',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::derive_login;

    #[test]
    fn login_takes_four_letters_of_each_name() {
        assert_eq!(derive_login("Peter", "Novák").ok().as_deref(), Some("pete.nova"));
    }

    #[test]
    fn short_first_name_is_kept_whole() {
        assert_eq!(derive_login("Ján", "Kováč").ok().as_deref(), Some("jan.kova"));
    }

    #[test]
    fn single_digit_suffix_shortens_surname_to_three_letters() {
        assert_eq!(derive_login("Peter", "Kovac7").ok().as_deref(), Some("pete.kov7"));
    }

    #[test]
    fn longer_digit_suffix_keeps_two_letters_and_two_digits() {
        assert_eq!(derive_login("Peter", "Kovac12").ok().as_deref(), Some("pete.ko12"));
        assert_eq!(derive_login("Peter", "Kovac123").ok().as_deref(), Some("pete.ko12"));
    }

    #[test]
    fn spaces_in_first_name_are_dropped() {
        assert_eq!(derive_login("Anna Mária", "Novák").ok().as_deref(), Some("anna.nova"));
    }

    #[test]
    fn surname_with_leading_digit_is_rejected() {
        assert!(derive_login("Peter", "1Kovac").is_err());
    }

    #[test]
    fn surname_with_inner_digit_is_rejected() {
        assert!(derive_login("Peter", "Ko1vac").is_err());
    }

    #[test]
    fn empty_first_name_is_rejected() {
        assert!(derive_login("  ", "Novák").is_err());
    }

    proptest! {
        #[test]
        fn derived_login_is_short_lowercase_ascii(
            first in "[A-Za-z]{1,12}",
            last in "[A-Za-z]{1,12}",
        ) {
            let login = derive_login(&first, &last);
            prop_assert!(login.is_ok());
            let login = login.unwrap_or_default();
            prop_assert!(login.len() <= 9);
            prop_assert_eq!(login.matches('.').count(), 1);
            prop_assert!(
                login
                    .chars()
                    .all(|character| character.is_ascii_lowercase()
                        || character.is_ascii_digit()
                        || character == '.')
            );
        }
    }
}
