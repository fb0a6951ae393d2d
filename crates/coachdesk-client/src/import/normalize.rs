//! Header and phone normalization.
//!
//! `normalize_key` is used for header matching: two headers that differ
//! only in spacing, punctuation, case, Arabic letter variants or Arabic
//! presentation forms normalize to the same string.

const ARABIC_LETTERS: std::ops::RangeInclusive<char> = '\u{0621}'..='\u{064A}';

/// Arabic Presentation Forms-B, U+FE80..=U+FEF4. Each entry is the number of
/// contextual forms followed by the base letter they fold to.
const PRESENTATION_FORMS_B: [(u32, char); 36] = [
    (1, 'ء'),
    (2, 'آ'),
    (2, 'أ'),
    (2, 'ؤ'),
    (2, 'إ'),
    (4, 'ئ'),
    (2, 'ا'),
    (4, 'ب'),
    (2, 'ة'),
    (4, 'ت'),
    (4, 'ث'),
    (4, 'ج'),
    (4, 'ح'),
    (4, 'خ'),
    (2, 'د'),
    (2, 'ذ'),
    (2, 'ر'),
    (2, 'ز'),
    (4, 'س'),
    (4, 'ش'),
    (4, 'ص'),
    (4, 'ض'),
    (4, 'ط'),
    (4, 'ظ'),
    (4, 'ع'),
    (4, 'غ'),
    (4, 'ف'),
    (4, 'ق'),
    (4, 'ك'),
    (4, 'ل'),
    (4, 'م'),
    (4, 'ن'),
    (4, 'ه'),
    (2, 'و'),
    (2, 'ى'),
    (4, 'ي'),
];

/// Lam-alef ligatures, U+FEF5..=U+FEFC, two forms each.
const LAM_ALEF_LIGATURES: [char; 4] = ['آ', 'أ', 'إ', 'ا'];

pub fn normalize_key(key: &str) -> String {
    let mut normalized = String::with_capacity(key.len());

    for character in key.chars() {
        match fold_presentation_form(character) {
            Folded::One(letter) => push_normalized(&mut normalized, letter),
            Folded::Two(first, second) => {
                push_normalized(&mut normalized, first);
                push_normalized(&mut normalized, second);
            }
        }
    }

    normalized
}

/// Digits of a phone number, with Arabic-Indic digits mapped to ASCII.
pub fn phone_digits(value: &str) -> String {
    value
        .chars()
        .filter_map(|character| match character {
            '0'..='9' => Some(character),
            '\u{0660}'..='\u{0669}' => char::from_digit(character as u32 - 0x0660, 10),
            '\u{06F0}'..='\u{06F9}' => char::from_digit(character as u32 - 0x06F0, 10),
            _ => None,
        })
        .collect()
}

enum Folded {
    One(char),
    Two(char, char),
}

fn fold_presentation_form(character: char) -> Folded {
    let code = character as u32;

    if (0xFEF5..=0xFEFC).contains(&code) {
        let alef = LAM_ALEF_LIGATURES[((code - 0xFEF5) / 2) as usize];
        return Folded::Two('ل', alef);
    }

    if (0xFE80..0xFEF5).contains(&code) {
        let mut start = 0xFE80;
        for (count, base) in PRESENTATION_FORMS_B {
            if code < start + count {
                return Folded::One(base);
            }
            start += count;
        }
    }

    Folded::One(character)
}

fn push_normalized(output: &mut String, character: char) {
    if character.is_ascii_alphanumeric() || character == '_' {
        output.push(character.to_ascii_lowercase());
        return;
    }

    if !ARABIC_LETTERS.contains(&character) {
        return;
    }

    let unified = match character {
        'أ' | 'إ' | 'آ' => 'ا',
        'ة' => 'ه',
        'ى' => 'ي',
        other => other,
    };
    output.push(unified);
}

#[cfg(test)]
mod tests {
    use super::{normalize_key, phone_digits};

    #[test]
    fn spacing_punctuation_and_presentation_forms_normalize_alike() {
        let plain = normalize_key("كود العميل");
        assert_eq!(plain, "كودالعميل");
        assert_eq!(normalize_key("كوداﻟعميل"), plain);
        assert_eq!(normalize_key("كود-العميل "), plain);
    }

    #[test]
    fn empty_input_is_empty() {
        assert_eq!(normalize_key(""), "");
        assert_eq!(normalize_key("  - . "), "");
    }

    #[test]
    fn ascii_is_lowercased_and_symbols_dropped() {
        assert_eq!(normalize_key("Client Code:"), "clientcode");
        assert_eq!(normalize_key("E-mail_Address"), "email_address");
    }

    #[test]
    fn arabic_letter_variants_are_unified() {
        assert_eq!(normalize_key("أإآا"), "اااا");
        assert_eq!(normalize_key("صورة"), "صوره");
        assert_eq!(normalize_key("مستوى"), "مستوي");
    }

    #[test]
    fn lam_alef_ligature_expands() {
        assert_eq!(normalize_key("ﻻ"), "لا");
        assert_eq!(normalize_key("ﻷ"), "لا");
    }

    #[test]
    fn every_presentation_form_folds_to_an_arabic_letter() {
        for code in 0xFE80_u32..=0xFEFC {
            let Some(character) = char::from_u32(code) else {
                continue;
            };
            let normalized = normalize_key(&character.to_string());
            assert!(!normalized.is_empty(), "U+{code:04X} was dropped");
            assert!(
                normalized
                    .chars()
                    .all(|value| ('\u{0621}'..='\u{064A}').contains(&value)),
                "U+{code:04X} folded outside the Arabic letter block"
            );
        }
    }

    #[test]
    fn presentation_forms_fold_to_expected_letters() {
        assert_eq!(normalize_key("\u{FE8F}"), "ب");
        assert_eq!(normalize_key("\u{FEDF}"), "ل");
        assert_eq!(normalize_key("\u{FEF4}"), "ي");
        assert_eq!(normalize_key("\u{FE93}"), "ه");
    }

    #[test]
    fn phone_digits_strip_formatting_and_map_arabic_indic_digits() {
        assert_eq!(phone_digits("+20 (101) 234-5678"), "201012345678");
        assert_eq!(phone_digits("٠١٠١٢٣٤٥٦٧٨"), "01012345678");
        assert_eq!(phone_digits("۰۱۲"), "012");
        assert_eq!(phone_digits("n/a"), "");
    }
}
