/* Calc-rs (c) 2025 Nathaniel Clark
 *
 * This source code is subject to the terms of the GPL v2. See LICENCE file.
 */

use calc_rs::{
    display::{self, FormatOptions},
    numbers::{
        word::{Signedness, Word, WordSize},
        Mode, Number, Radix,
    },
};
use proptest::prelude::*;
use rug::Integer;

fn any_word() -> impl Strategy<Value = Word> {
    (
        prop_oneof![
            Just(WordSize::Byte),
            Just(WordSize::Word),
            Just(WordSize::DWord),
            Just(WordSize::QWord),
        ],
        prop_oneof![
            Just(Signedness::Unsigned),
            Just(Signedness::OnesComplement),
            Just(Signedness::TwosComplement),
        ],
    )
        .prop_map(|(size, signedness)| Word::new(size, signedness))
}

/// Keys for one decimal operand: sign, integer digits, then an optional
/// point, leading fraction zeros and more digits
fn typed_operand() -> impl Strategy<Value = String> {
    (
        any::<bool>(),
        "[0-9]{1,34}",
        proptest::option::of(("0{0,12}", "[0-9]{0,20}")),
    )
        .prop_map(|(negative, int, frac)| {
            let mut keys = String::new();
            if negative {
                keys.push('-');
            }
            keys.push_str(&int);
            if let Some((zeros, digits)) = frac {
                keys.push('.');
                keys.push_str(&zeros);
                keys.push_str(&digits);
            }
            keys
        })
}

/// Feed `keys` one at a time through the entry rules
fn type_keys(keys: &str, max_digits: usize) -> String {
    let mut text = String::new();
    for c in keys.chars() {
        text = display::parse_digits(&text, c, Radix::Decimal, max_digits).unwrap();
    }
    text
}

proptest! {
    #[test]
    fn typed_text_survives_format_and_parse(keys in typed_operand(), wide in any::<bool>()) {
        let mode = if wide { Mode::Scientific } else { Mode::Standard };
        let precision = mode.precision();
        let opts = FormatOptions::default();
        let typed = type_keys(&keys, precision as usize);
        let value = display::parse(&typed, Radix::Decimal, precision, &opts).unwrap();
        // Every typed digit is kept
        let text = display::format(&value, precision, false, &opts);
        let back = display::parse(&text, Radix::Decimal, precision, &opts).unwrap();
        prop_assert_eq!(&back, &value, "typed {} shown {}", typed, text);
        prop_assert_eq!(display::format(&back, precision, false, &opts), text);
    }

    #[test]
    fn wide_entry_shown_narrow_is_stable(keys in typed_operand()) {
        let opts = FormatOptions::default();
        let typed = type_keys(&keys, Mode::Scientific.precision() as usize);
        let precision = Mode::Standard.precision();
        let value = display::parse(&typed, Radix::Decimal, precision, &opts).unwrap();
        let text = display::format(&value, precision, false, &opts);
        let back = display::parse(&text, Radix::Decimal, precision, &opts).unwrap();
        prop_assert_eq!(display::format(&back, precision, false, &opts), text.clone());
        // Only digits past the display precision may go
        prop_assert!(
            back == value || back == value.round_places(precision),
            "typed {} shown {}", typed, text
        );
    }

    #[test]
    fn display_text_reads_back(m in -999_999_999_999i64..=999_999_999_999, e in -4i64..=6) {
        let precision = Mode::Standard.precision();
        let opts = FormatOptions::default();
        let n = Number::from_parts(Integer::from(m), e, precision).unwrap();
        let text = display::format(&n, precision, false, &opts);
        let back = display::parse(&text, Radix::Decimal, precision, &opts).unwrap();
        prop_assert_eq!(back, n, "text {}", text);
    }

    #[test]
    fn exponential_text_reads_back(m in any::<i64>(), e in -300i64..=300) {
        let precision = Mode::Scientific.precision();
        let opts = FormatOptions::default();
        let n = Number::from_parts(Integer::from(m), e, precision).unwrap();
        let text = display::format(&n, precision, true, &opts);
        let back = display::parse(&text, Radix::Decimal, precision, &opts).unwrap();
        prop_assert_eq!(back, n, "text {}", text);
    }

    #[test]
    fn divide_undoes_multiply(a in -99_999_999i64..=99_999_999, b in -99_999_999i64..=99_999_999) {
        prop_assume!(b != 0);
        let precision = Mode::Standard.precision();
        let a = Number::from_integer(a, precision);
        let b = Number::from_integer(b, precision);
        let product = a.multiply(&b).unwrap();
        prop_assert_eq!(product.divide(&b).unwrap(), a);
    }

    #[test]
    fn wrapped_values_fit(word in any_word(), v in any::<i128>()) {
        let wrapped = word.wrap(Integer::from(v));
        prop_assert!(word.contains(&wrapped));
        prop_assert_eq!(word.from_pattern(word.to_pattern(&wrapped)), wrapped);
    }

    #[test]
    fn word_text_reads_back(word in any_word(), v in any::<i64>()) {
        let opts = FormatOptions::default();
        let value = word.wrap(Integer::from(v));
        for radix in [Radix::Hex, Radix::Octal, Radix::Binary] {
            let text = display::format_word(&value, &word, radix, &opts);
            let pattern = display::parse(&text, radix, 64, &opts).unwrap();
            prop_assert_eq!(word.from_pattern(pattern.to_integer()), value.clone());
        }
    }
}
