//! Modified UTF-8 as used by `CONSTANT_Utf8_info`.
//!
//! Each code point of the UTF-16 form is written as 1, 2 or 3 bytes; a
//! supplementary character is therefore two 3-byte sequences, one per
//! surrogate. The bytes are folded into UTF-16 code units first and only then
//! turned into a `String`.
//!
//! Malformed input never fails: a sequence cut short by a non-continuation
//! byte or by the end of input, a stray continuation byte and a lead byte
//! above `0xEF` each produce U+FFFD, as do unpaired surrogates.

#[derive(Clone, Copy)]
enum State {
    Start,
    /// One continuation byte left, holding the bits gathered so far.
    ExpectOne(u16),
    /// Two continuation bytes left.
    ExpectTwo(u16),
}

pub fn decode(bytes: &[u8]) -> String {
    let mut units = Vec::with_capacity(bytes.len());
    let mut state = State::Start;

    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i] as u16;
        match state {
            State::Start => {
                if c < 0x80 {
                    units.push(c);
                } else if c < 0xE0 && c > 0xBF {
                    state = State::ExpectOne(c & 0x1F);
                } else if (0xE0..0xF0).contains(&c) {
                    state = State::ExpectTwo(c & 0x0F);
                } else {
                    units.push(REPLACEMENT);
                }
            }
            State::ExpectOne(_) | State::ExpectTwo(_) if !is_continuation(c) => {
                // Retry the offending byte as the start of a new sequence.
                units.push(REPLACEMENT);
                state = State::Start;
                continue;
            }
            State::ExpectOne(bits) => {
                units.push((bits << 6) | (c & 0x3F));
                state = State::Start;
            }
            State::ExpectTwo(bits) => {
                state = State::ExpectOne((bits << 6) | (c & 0x3F));
            }
        }
        i += 1;
    }

    if !matches!(state, State::Start) {
        units.push(REPLACEMENT);
    }

    char::decode_utf16(units)
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

const REPLACEMENT: u16 = 0xFFFD;

fn is_continuation(c: u16) -> bool {
    c & 0xC0 == 0x80
}

#[cfg(test)]
mod decode_tests {
    use super::*;

    #[test]
    fn it_should_pass_ascii_through() {
        assert_eq!(decode(b"java/lang/Object"), "java/lang/Object");
    }

    #[test]
    fn it_should_decode_an_empty_span() {
        assert_eq!(decode(&[]), "");
    }

    #[test]
    fn it_should_decode_the_two_byte_null() {
        assert_eq!(decode(&[0x41, 0xC0, 0x80, 0x42]), "A\u{0}B");
    }

    #[test]
    fn it_should_decode_a_two_byte_sequence() {
        assert_eq!(decode(&[0xC3, 0xA9]), "é");
    }

    #[test]
    fn it_should_decode_a_three_byte_sequence() {
        assert_eq!(decode(&[0xE2, 0x82, 0xAC]), "€");
    }

    #[test]
    fn it_should_combine_surrogate_pairs() {
        // U+1F600 as the surrogates D83D DE00, each in three bytes.
        assert_eq!(
            decode(&[0xED, 0xA0, 0xBD, 0xED, 0xB8, 0x80]),
            "\u{1F600}"
        );
    }

    #[test]
    fn it_should_replace_a_truncated_sequence() {
        assert_eq!(decode(&[0x61, 0xE2, 0x82]), "a\u{FFFD}");
    }

    #[test]
    fn it_should_replace_a_stray_continuation_byte() {
        assert_eq!(decode(&[0x80, 0x61]), "\u{FFFD}a");
    }

    #[test]
    fn it_should_restart_on_a_missing_continuation_byte() {
        assert_eq!(decode(&[0xC3, 0x61]), "\u{FFFD}a");
    }

    #[test]
    fn it_should_replace_an_unpaired_surrogate() {
        assert_eq!(decode(&[0xED, 0xA0, 0xBD, 0x61]), "\u{FFFD}a");
    }
}
