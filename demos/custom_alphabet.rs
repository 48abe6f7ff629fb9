use subdex::Alphabet;

fn main() {
    // This example shows how to create a custom alphabet from a translation table. The size of
    // the alphabet is 1 larger than the number of symbols, because a special text-delimiter/sentinel
    // symbol is always implicitly included as dense symbol 0.

    let mut digit_table = [255u8; 256];
    for (digit, symbol) in (b'0'..=b'9').zip(1u8..) {
        digit_table[digit as usize] = symbol;
    }

    let digits = Alphabet::from_translation_table(digit_table, 11, 0);
    assert_eq!(digits.num_dense_symbols(), 11);
    assert_eq!(digits.num_searchable_dense_symbols(), 10);

    // ambiguous symbols can share the same dense representation, like these pairs of upper-
    // and lowercase roman letters
    let mut roman_table = [255u8; 256];
    for (symbol, letter) in (1u8..).zip(b'a'..=b'z') {
        roman_table[letter as usize] = symbol;
        roman_table[letter.to_ascii_uppercase() as usize] = symbol;
    }

    let roman = Alphabet::from_translation_table(roman_table, 27, 0);
    assert_eq!(roman.num_dense_symbols(), 27);
    assert_eq!(roman.num_searchable_dense_symbols(), 26);
}
