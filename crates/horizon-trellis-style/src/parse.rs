//! The tokenized literal grammar for compound property text.
//!
//! Compound properties (padding, size constraints, fit factors, flag sets)
//! serialize to short strings of whitespace-separated numbers or
//! comma-separated barewords. This module tokenizes those strings with the
//! `cssparser` tokenizer.
//!
//! Every parse function returns the count of parsed items and signals
//! failure by returning zero — on a grammar mismatch, an unknown bareword,
//! or when the destination capacity is exceeded. Callers must treat zero as
//! "no change applied", never as "zero valid items"; malformed style data
//! must not crash a running UI.

use cssparser::{Parser, ParserInput, Token};

/// One name/value pair of a bareword enumeration.
#[derive(Debug, Clone, Copy)]
pub struct EnumDef {
    pub name: &'static str,
    pub value: i64,
}

impl EnumDef {
    pub const fn new(name: &'static str, value: i64) -> Self {
        Self { name, value }
    }
}

/// Find an enumeration entry by name, case-insensitively.
pub fn find_enum<'a>(name: &str, defs: &'a [EnumDef]) -> Option<&'a EnumDef> {
    defs.iter().find(|d| d.name.eq_ignore_ascii_case(name))
}

/// Find an enumeration entry by value.
pub fn find_enum_value(value: i64, defs: &[EnumDef]) -> Option<&EnumDef> {
    defs.iter().find(|d| d.value == value)
}

/// Parse whitespace-separated integers into `dst`.
pub fn parse_ints(dst: &mut [i64], text: &str) -> usize {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    let mut n = 0;

    loop {
        match parser.next() {
            Ok(Token::Number {
                int_value: Some(v), ..
            }) => {
                if n >= dst.len() {
                    return 0;
                }
                dst[n] = *v as i64;
                n += 1;
            }
            Ok(_) => return 0,
            Err(_) => break,
        }
    }

    n
}

/// Parse whitespace-separated floats (integer literals accepted) into `dst`.
pub fn parse_floats(dst: &mut [f32], text: &str) -> usize {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    let mut n = 0;

    loop {
        match parser.next() {
            Ok(Token::Number { value, .. }) => {
                if n >= dst.len() {
                    return 0;
                }
                dst[n] = *value;
                n += 1;
            }
            Ok(_) => return 0,
            Err(_) => break,
        }
    }

    n
}

/// Parse whitespace-separated booleans into `dst`.
///
/// Accepts the barewords `true`/`false` and integer literals (positive means
/// true).
pub fn parse_bools(dst: &mut [bool], text: &str) -> usize {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    let mut n = 0;

    loop {
        let value = match parser.next() {
            Ok(Token::Ident(name)) if name.eq_ignore_ascii_case("true") => true,
            Ok(Token::Ident(name)) if name.eq_ignore_ascii_case("false") => false,
            Ok(Token::Number {
                int_value: Some(v), ..
            }) => *v > 0,
            Ok(_) => return 0,
            Err(_) => break,
        };
        if n >= dst.len() {
            return 0;
        }
        dst[n] = value;
        n += 1;
    }

    n
}

/// Parse a comma-separated list of enumeration barewords into `dst`.
pub fn parse_enums(dst: &mut [i64], text: &str, defs: &[EnumDef]) -> usize {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    let mut n = 0;

    loop {
        if n > 0 {
            match parser.next() {
                Ok(Token::Comma) => {}
                Ok(_) => return 0,
                Err(_) => break,
            }
        }
        match parser.next() {
            Ok(Token::Ident(name)) => {
                let Some(def) = find_enum(name, defs) else {
                    return 0;
                };
                if n >= dst.len() {
                    return 0;
                }
                dst[n] = def.value;
                n += 1;
            }
            Ok(_) => return 0,
            // A trailing comma with nothing after it is a mismatch.
            Err(_) if n > 0 => return 0,
            Err(_) => break,
        }
    }

    n
}

/// Parse a comma-separated bareword list into an OR-ed flag mask.
///
/// Returns `None` on any grammar mismatch or unknown bareword. An empty
/// string yields `Some(0)` — clearing every flag is a valid value.
pub fn parse_bit_flags(text: &str, defs: &[EnumDef]) -> Option<u32> {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    let mut bits = 0u32;
    let mut n = 0;

    loop {
        if n > 0 {
            match parser.next() {
                Ok(Token::Comma) => {}
                Ok(_) => return None,
                Err(_) => break,
            }
        }
        match parser.next() {
            Ok(Token::Ident(name)) => {
                let def = find_enum(name, defs)?;
                bits |= def.value as u32;
                n += 1;
            }
            Ok(_) => return None,
            Err(_) if n > 0 => return None,
            Err(_) => break,
        }
    }

    Some(bits)
}

/// Format a flag mask as the comma-separated bareword list it parses from.
pub fn format_bit_flags(bits: u32, defs: &[EnumDef]) -> String {
    let mut out = String::new();
    for def in defs {
        if bits & (def.value as u32) == 0 {
            continue;
        }
        if !out.is_empty() {
            out.push(',');
        }
        out.push_str(def.name);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLAGS: &[EnumDef] = &[
        EnumDef::new("hfill", 1 << 0),
        EnumDef::new("vfill", 1 << 1),
        EnumDef::new("hexpand", 1 << 2),
        EnumDef::new("vexpand", 1 << 3),
    ];

    #[test]
    fn parse_ints_counts_items() {
        let mut v = [0i64; 4];
        assert_eq!(parse_ints(&mut v, "1 2 3 4"), 4);
        assert_eq!(v, [1, 2, 3, 4]);
        assert_eq!(parse_ints(&mut v, "7"), 1);
        assert_eq!(v[0], 7);
        assert_eq!(parse_ints(&mut v, "-3 5"), 2);
        assert_eq!(&v[..2], &[-3, 5]);
    }

    #[test]
    fn parse_ints_rejects_garbage_and_overflow() {
        let mut v = [0i64; 4];
        assert_eq!(parse_ints(&mut v, "a b"), 0);
        assert_eq!(parse_ints(&mut v, "1 2 x"), 0);
        assert_eq!(parse_ints(&mut v, "1.5"), 0);
        assert_eq!(parse_ints(&mut v, "1 2 3 4 5"), 0);
        assert_eq!(parse_ints(&mut v, ""), 0);
    }

    #[test]
    fn parse_floats_accepts_integers() {
        let mut v = [0f32; 2];
        assert_eq!(parse_floats(&mut v, "0.5 2"), 2);
        assert_eq!(v, [0.5, 2.0]);
        assert_eq!(parse_floats(&mut v, "0.5,2"), 0);
    }

    #[test]
    fn parse_bools_accepts_words_and_numbers() {
        let mut v = [false; 3];
        assert_eq!(parse_bools(&mut v, "true 0 1"), 3);
        assert_eq!(v, [true, false, true]);
        assert_eq!(parse_bools(&mut v, "yes"), 0);
    }

    #[test]
    fn parse_enums_requires_commas() {
        let mut v = [0i64; 4];
        assert_eq!(parse_enums(&mut v, "hfill,vfill", FLAGS), 2);
        assert_eq!(&v[..2], &[1, 2]);
        assert_eq!(parse_enums(&mut v, "hfill vfill", FLAGS), 0);
        assert_eq!(parse_enums(&mut v, "hfill,", FLAGS), 0);
        assert_eq!(parse_enums(&mut v, "hfill,bogus", FLAGS), 0);
        assert_eq!(parse_enums(&mut v, "HFILL", FLAGS), 1);
    }

    #[test]
    fn bit_flags_round_trip() {
        let bits = parse_bit_flags("hfill,hexpand", FLAGS).unwrap();
        assert_eq!(bits, 0b0101);
        assert_eq!(format_bit_flags(bits, FLAGS), "hfill,hexpand");
        assert_eq!(parse_bit_flags("", FLAGS), Some(0));
        assert_eq!(parse_bit_flags("hfill nope", FLAGS), None);
    }
}
