use std::{collections::HashSet, str::FromStr};

use anyhow::{anyhow, Result};
use rust_decimal::Decimal;

const NUMBER_ESCAPE_CHAR: &[char] = &['$', ',', ' ', '"', '\n'];

/// ñ 在西班牙文的字母表排在 n 之後、o 之前，
/// 在排序鍵裡用一個比任何小寫字母都大的字元墊在 n 後面
const ENYE_SUFFIX: char = '\u{7f}';

/// Parses a decimal value from a given string.
///
/// This function accepts a string representation of a decimal number,
/// potentially containing a currency sign, thousands separators and other
/// escape characters, and attempts to convert it into a `Decimal`. If the
/// conversion fails, an error is returned.
///
/// # Arguments
///
/// * `s`: A string slice containing the representation of a decimal number
///         that may include a currency sign and thousands separators.
/// * `escape_chars`: Optional characters to be escaped from the input string.
///
/// # Returns
///
/// * `Result<Decimal>`: The parsed `Decimal` value if successful, or an error
///                      if the conversion fails.
pub fn parse_decimal(s: &str, escape_chars: Option<Vec<char>>) -> Result<Decimal> {
    let cleaned = clean_escape_chars(s, escape_chars);
    Decimal::from_str(&cleaned)
        .map_err(|why| anyhow!("Failed to parse '{}' as Decimal because {:?}", cleaned, why))
}

/// Builds a primary-level Spanish collation key for a string.
///
/// Accented vowels (and ü) collate with their base letter family, so
/// "Diésel" orders under "D" rather than after every unaccented word.
/// ñ is kept as a letter of its own, ordering after plain n.
pub fn spanish_collation_key(s: &str) -> String {
    let lowered = s.to_lowercase();
    let mut key = String::with_capacity(lowered.len());

    for c in lowered.chars() {
        match c {
            'á' | 'à' | 'ä' | 'â' => key.push('a'),
            'é' | 'è' | 'ë' | 'ê' => key.push('e'),
            'í' | 'ì' | 'ï' | 'î' => key.push('i'),
            'ó' | 'ò' | 'ö' | 'ô' => key.push('o'),
            'ú' | 'ù' | 'ü' | 'û' => key.push('u'),
            'ñ' => {
                key.push('n');
                key.push(ENYE_SUFFIX);
            }
            _ => key.push(c),
        }
    }

    key
}

/// Removes a set of escape characters from a given string.
pub(crate) fn clean_escape_chars(s: &str, escape_chars: Option<Vec<char>>) -> String {
    let mut combined: Vec<char> = NUMBER_ESCAPE_CHAR.to_vec();
    if let Some(ec) = escape_chars {
        combined.extend(ec);
    }

    let filters = combined.iter().collect::<HashSet<_>>();
    s.chars().filter(|c| !filters.contains(c)).collect()
}
