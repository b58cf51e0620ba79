//! Numeric literal scanning and decoding.
//!
//! Decimal values are parsed by the standard library after separators are
//! removed. Radix literals are accumulated exactly and rounded once, so
//! literals wider than 53 bits still produce the nearest double.

use crate::char_codes::is_identifier_start;
use crate::scanner_impl::ScannerState;
use crate::syntax_kind::SyntaxKind;
use crate::token::{TokenFlags, TokenValue};
use esz_common::diagnostics::diagnostic_codes;
use num_bigint::{BigInt, BigUint};

impl ScannerState {
    pub(crate) fn scan_number(&mut self) -> SyntaxKind {
        let start = self.pos;
        let first = self.peek();
        let second = self.peek_at(1);

        let kind = match (first, second) {
            (Some(b'0'), Some(b'x' | b'X')) => self.scan_radix_number(16),
            (Some(b'0'), Some(b'o' | b'O')) => self.scan_radix_number(8),
            (Some(b'0'), Some(b'b' | b'B')) => self.scan_radix_number(2),
            (Some(b'0'), Some(b'0'..=b'9' | b'_')) => self.scan_leading_zero_number(start),
            _ => self.scan_decimal_number(start),
        };

        self.check_after_numeric();
        kind
    }

    /// Scan digits of `radix`, allowing `_` only between two digits when
    /// `separators` is set. Returns the number of digits seen.
    fn scan_digits(&mut self, radix: u32, separators: bool) -> usize {
        let mut count = 0;
        let mut previous_separator = false;
        while let Some(b) = self.peek() {
            if b == b'_' {
                if !separators || count == 0 {
                    self.error_span(
                        diagnostic_codes::NUMERIC_SEPARATORS_NOT_ALLOWED_HERE,
                        &[],
                        self.pos,
                        self.pos + 1,
                    );
                } else if previous_separator {
                    self.error_span(
                        diagnostic_codes::MULTIPLE_CONSECUTIVE_NUMERIC_SEPARATORS,
                        &[],
                        self.pos,
                        self.pos + 1,
                    );
                }
                self.token_flags |= TokenFlags::CONTAINS_SEPARATOR;
                previous_separator = true;
                self.pos += 1;
                continue;
            }
            if !(b as char).is_digit(radix) {
                break;
            }
            count += 1;
            previous_separator = false;
            self.pos += 1;
        }
        if previous_separator && count > 0 {
            self.error_span(
                diagnostic_codes::NUMERIC_SEPARATORS_NOT_ALLOWED_HERE,
                &[],
                self.pos - 1,
                self.pos,
            );
        }
        count
    }

    fn digits_text(&self, start: usize, end: usize) -> String {
        self.source
            .get(start..end)
            .unwrap_or("")
            .chars()
            .filter(|&c| c != '_')
            .collect()
    }

    fn scan_radix_number(&mut self, radix: u32) -> SyntaxKind {
        self.pos += 2;
        let digits_start = self.pos;
        let count = self.scan_digits(radix, true);
        let digits = self.digits_text(digits_start, self.pos);
        if count == 0 {
            let code = if radix == 16 {
                diagnostic_codes::HEXADECIMAL_DIGIT_EXPECTED
            } else {
                diagnostic_codes::DIGIT_EXPECTED
            };
            self.error_span(code, &[], self.pos, self.pos + 1);
            self.token_value = TokenValue::Number(0.0);
            return SyntaxKind::NumericLiteral;
        }
        if self.peek() == Some(b'n') {
            self.pos += 1;
            let value = BigInt::parse_bytes(digits.as_bytes(), radix).unwrap_or_default();
            self.token_value = TokenValue::BigInt(value);
            return SyntaxKind::BigIntLiteral;
        }
        self.token_value = TokenValue::Number(radix_digits_to_f64(&digits, radix));
        SyntaxKind::NumericLiteral
    }

    /// `0` followed by more digits: a legacy octal literal (`017`) or a
    /// non-octal decimal literal (`08`, `018.1`).
    fn scan_leading_zero_number(&mut self, start: usize) -> SyntaxKind {
        self.pos += 1;
        if self.peek() == Some(b'_') {
            self.error_span(
                diagnostic_codes::NUMERIC_SEPARATORS_NOT_ALLOWED_HERE,
                &[],
                self.pos,
                self.pos + 1,
            );
        }
        self.scan_digits(10, false);
        let integer = self.digits_text(start, self.pos);
        let is_octal = integer.bytes().all(|b| (b'0'..=b'7').contains(&b));

        if is_octal {
            self.token_flags |= TokenFlags::LEGACY_OCTAL;
            self.token_value = TokenValue::Number(radix_digits_to_f64(&integer, 8));
        } else {
            self.token_flags |= TokenFlags::NON_OCTAL_DECIMAL;
            if self.peek() == Some(b'.') {
                self.pos += 1;
                self.scan_fraction_digits();
            }
            self.scan_exponent();
            let text = self.digits_text(start, self.pos);
            self.token_value = TokenValue::Number(text.parse::<f64>().unwrap_or(f64::NAN));
        }

        if self.peek() == Some(b'n') {
            self.pos += 1;
            self.error_at_token(diagnostic_codes::INVALID_BIGINT_LITERAL, &[]);
        }
        SyntaxKind::NumericLiteral
    }

    fn scan_fraction_digits(&mut self) {
        if self.peek() == Some(b'_') {
            self.error_span(
                diagnostic_codes::NUMERIC_SEPARATORS_NOT_ALLOWED_HERE,
                &[],
                self.pos,
                self.pos + 1,
            );
        }
        self.scan_digits(10, true);
    }

    /// Scan an optional exponent part. Returns whether one was present.
    fn scan_exponent(&mut self) -> bool {
        if !matches!(self.peek(), Some(b'e' | b'E')) {
            return false;
        }
        self.pos += 1;
        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        if self.peek() == Some(b'_') {
            self.error_span(
                diagnostic_codes::NUMERIC_SEPARATORS_NOT_ALLOWED_HERE,
                &[],
                self.pos,
                self.pos + 1,
            );
        }
        if self.scan_digits(10, true) == 0 {
            self.error_span(diagnostic_codes::DIGIT_EXPECTED, &[], self.pos, self.pos + 1);
        }
        true
    }

    fn scan_decimal_number(&mut self, start: usize) -> SyntaxKind {
        let mut integer_only = true;
        if self.peek() != Some(b'.') {
            self.scan_digits(10, true);
        }
        if self.peek() == Some(b'.') {
            self.pos += 1;
            integer_only = false;
            self.scan_fraction_digits();
        }
        if self.scan_exponent() {
            integer_only = false;
        }

        let text = self.digits_text(start, self.pos);
        if self.peek() == Some(b'n') {
            self.pos += 1;
            if !integer_only {
                self.error_at_token(diagnostic_codes::INVALID_BIGINT_LITERAL, &[]);
                self.token_value = TokenValue::Number(text.parse::<f64>().unwrap_or(f64::NAN));
                return SyntaxKind::NumericLiteral;
            }
            let value = BigInt::parse_bytes(text.as_bytes(), 10).unwrap_or_default();
            self.token_value = TokenValue::BigInt(value);
            return SyntaxKind::BigIntLiteral;
        }
        self.token_value = TokenValue::Number(text.parse::<f64>().unwrap_or(f64::NAN));
        SyntaxKind::NumericLiteral
    }

    /// An identifier start or a digit may not directly follow a numeric literal.
    fn check_after_numeric(&mut self) {
        let Some(c) = self.char_at(self.pos) else {
            return;
        };
        if !(c.is_ascii_digit() || c == '\\' || is_identifier_start(c as u32)) {
            return;
        }
        let error_start = self.pos;
        while let Some(c) = self.char_at(self.pos) {
            if !(c.is_ascii_alphanumeric() || c == '_' || c == '$' || is_identifier_start(c as u32)) {
                break;
            }
            self.pos += c.len_utf8();
        }
        self.error_span(
            diagnostic_codes::IDENTIFIER_DIRECTLY_AFTER_NUMERIC_LITERAL,
            &[],
            error_start,
            self.pos.max(error_start + 1),
        );
    }
}

/// Decode separator-free digits of `radix` into the nearest double.
pub fn radix_digits_to_f64(digits: &str, radix: u32) -> f64 {
    if let Ok(value) = u64::from_str_radix(digits, radix) {
        // u64 -> f64 rounds to nearest, ties to even.
        return value as f64;
    }
    match BigUint::parse_bytes(digits.as_bytes(), radix) {
        Some(value) => biguint_to_f64(&value),
        None => f64::NAN,
    }
}

/// Convert an arbitrary-width integer to the nearest double.
///
/// Takes the top 64 bits, folds every discarded bit into a sticky low bit and
/// lets the `u64 -> f64` conversion do the single rounding step.
pub fn biguint_to_f64(value: &BigUint) -> f64 {
    let bits = value.bits();
    if bits <= 64 {
        return value.iter_u64_digits().next().unwrap_or(0) as f64;
    }
    let shift = bits - 64;
    if shift > 1100 {
        return f64::INFINITY;
    }
    let top = (value >> shift).iter_u64_digits().next().unwrap_or(0);
    let lost_bits = value.trailing_zeros().is_some_and(|zeros| zeros < shift);
    let mantissa = top | u64::from(lost_bits);
    (mantissa as f64) * 2f64.powi(shift as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Token;

    fn lex_one(source: &str) -> (Token, ScannerState) {
        let mut scanner = ScannerState::new(source);
        let token = scanner.lex();
        (token, scanner)
    }

    fn number(source: &str) -> f64 {
        let (token, scanner) = lex_one(source);
        assert!(scanner.diagnostics().is_empty(), "{source}: {:?}", scanner.diagnostics());
        token.number_value().unwrap()
    }

    fn first_error(source: &str) -> u32 {
        let (_, scanner) = lex_one(source);
        scanner.diagnostics()[0].code
    }

    #[test]
    fn decimal_forms() {
        assert_eq!(number("0"), 0.0);
        assert_eq!(number("1_000_000"), 1_000_000.0);
        assert_eq!(number(".5"), 0.5);
        assert_eq!(number("5."), 5.0);
        assert_eq!(number("1e3"), 1000.0);
        assert_eq!(number("2.5E-1"), 0.25);
    }

    #[test]
    fn radix_forms() {
        assert_eq!(number("0xFF"), 255.0);
        assert_eq!(number("0o17"), 15.0);
        assert_eq!(number("0b1010_1010"), 170.0);
        assert_eq!(number("0x1_0000_0000_0000_0001"), 18_446_744_073_709_551_616.0);
    }

    #[test]
    fn wide_hex_rounds_to_nearest() {
        // 2^64 + 2^11 + 1 sits just above the halfway point between two doubles.
        let value = number("0x10000000000000801");
        assert_eq!(value, 18_446_744_073_709_555_712.0);
        // Exactly halfway rounds to even.
        assert_eq!(number("0x10000000000000800"), 18_446_744_073_709_551_616.0);
    }

    #[test]
    fn legacy_and_non_octal_decimal() {
        let (token, _) = lex_one("017");
        assert_eq!(token.number_value(), Some(15.0));
        assert!(token.flags.contains(TokenFlags::LEGACY_OCTAL));
        let (token, scanner) = lex_one("018.1");
        assert_eq!(token.number_value(), Some(18.1));
        assert!(token.flags.contains(TokenFlags::NON_OCTAL_DECIMAL));
        assert!(scanner.diagnostics().is_empty());
    }

    #[test]
    fn bigint_values() {
        let (token, scanner) = lex_one("0xfedc_ba98_7654_3210n");
        assert_eq!(token.kind, SyntaxKind::BigIntLiteral);
        assert!(scanner.diagnostics().is_empty());
        match token.value {
            TokenValue::BigInt(value) => assert_eq!(value.to_string(), "18364758544493064720"),
            other => panic!("expected bigint, got {other:?}"),
        }
        let (token, _) = lex_one("123n");
        assert_eq!(token.kind, SyntaxKind::BigIntLiteral);
    }

    #[test]
    fn invalid_bigints() {
        assert_eq!(first_error("018.1n"), diagnostic_codes::INVALID_BIGINT_LITERAL);
        assert_eq!(first_error("07n"), diagnostic_codes::INVALID_BIGINT_LITERAL);
        assert_eq!(first_error("1.5n"), diagnostic_codes::INVALID_BIGINT_LITERAL);
        assert_eq!(first_error("1e3n"), diagnostic_codes::INVALID_BIGINT_LITERAL);
    }

    #[test]
    fn separator_placement() {
        assert_eq!(first_error("1__0"), diagnostic_codes::MULTIPLE_CONSECUTIVE_NUMERIC_SEPARATORS);
        assert_eq!(first_error("1_"), diagnostic_codes::NUMERIC_SEPARATORS_NOT_ALLOWED_HERE);
        assert_eq!(first_error("0_1"), diagnostic_codes::NUMERIC_SEPARATORS_NOT_ALLOWED_HERE);
        assert_eq!(first_error("0x_1"), diagnostic_codes::NUMERIC_SEPARATORS_NOT_ALLOWED_HERE);
        assert_eq!(first_error("1._5"), diagnostic_codes::NUMERIC_SEPARATORS_NOT_ALLOWED_HERE);
        assert_eq!(first_error("1e_5"), diagnostic_codes::NUMERIC_SEPARATORS_NOT_ALLOWED_HERE);
        assert_eq!(first_error("08_1"), diagnostic_codes::NUMERIC_SEPARATORS_NOT_ALLOWED_HERE);
    }

    #[test]
    fn identifier_after_numeric() {
        assert_eq!(first_error("3in"), diagnostic_codes::IDENTIFIER_DIRECTLY_AFTER_NUMERIC_LITERAL);
        assert_eq!(first_error("0b12"), diagnostic_codes::IDENTIFIER_DIRECTLY_AFTER_NUMERIC_LITERAL);
    }

    #[test]
    fn missing_digits() {
        assert_eq!(first_error("0x"), diagnostic_codes::HEXADECIMAL_DIGIT_EXPECTED);
        assert_eq!(first_error("1e"), diagnostic_codes::DIGIT_EXPECTED);
    }
}
