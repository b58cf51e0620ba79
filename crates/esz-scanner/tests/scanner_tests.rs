use esz_common::Position;
use esz_common::diagnostics::diagnostic_codes;
use esz_scanner::{ScannerState, SyntaxKind, Token, TokenFlags, TokenType, TokenValue};

fn scan_all(source: &str) -> (Vec<Token>, ScannerState) {
    let mut scanner = ScannerState::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = scanner.lex();
        if token.kind == SyntaxKind::EndOfFileToken {
            break;
        }
        tokens.push(token);
    }
    (tokens, scanner)
}

#[test]
fn test_scan_empty() {
    let mut scanner = ScannerState::new("");
    let token = scanner.lex();
    assert_eq!(token.kind, SyntaxKind::EndOfFileToken);
    assert!(token.range.is_empty());
}

#[test]
fn test_postfix_update_line_breaks() {
    let (tokens, _) = scan_all("a++\nb++");
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::PlusPlusToken,
            SyntaxKind::Identifier,
            SyntaxKind::PlusPlusToken,
        ]
    );
    assert!(tokens[2].has_preceding_line_break());
    assert!(!tokens[3].has_preceding_line_break());
}

#[test]
fn test_return_newline() {
    let (tokens, _) = scan_all("return\na");
    assert_eq!(tokens[0].kind, SyntaxKind::ReturnKeyword);
    assert!(tokens[1].flags.contains(TokenFlags::PRECEDING_LINE_BREAK));
}

#[test]
fn test_token_values_and_types() {
    let (tokens, scanner) = scan_all("let x = 'hi' + 0x10 + true + null + 5n");
    assert!(scanner.diagnostics().is_empty());
    assert_eq!(tokens[0].kind, SyntaxKind::LetKeyword);
    assert_eq!(tokens[0].token_type(), TokenType::Identifier);
    assert_eq!(tokens[1].string_value(), "x");
    assert_eq!(tokens[3].value, TokenValue::String("hi".into()));
    assert_eq!(tokens[3].raw.as_str(), "'hi'");
    assert_eq!(tokens[5].number_value(), Some(16.0));
    assert_eq!(tokens[7].value, TokenValue::Boolean(true));
    assert_eq!(tokens[9].token_type(), TokenType::Null);
    assert_eq!(tokens[11].token_type(), TokenType::BigInt);
}

#[test]
fn test_positions_are_byte_columns() {
    let (tokens, _) = scan_all("é = 1;\n  ü");
    assert_eq!(tokens[0].range.end, 2);
    assert_eq!(tokens[1].location.start, Position::new(0, 3));
    let last = tokens.last().unwrap();
    assert_eq!(last.location.start, Position::new(1, 2));
    assert_eq!(last.location.end, Position::new(1, 4));
}

#[test]
fn test_keywords_are_canonical_atoms() {
    let (first, _) = scan_all("function");
    let (second, _) = scan_all("function");
    assert!(esz_common::Atom::ptr_eq(&first[0].raw, &second[0].raw));
}

#[test]
fn test_private_identifier() {
    let (tokens, scanner) = scan_all("#secret in obj");
    assert!(scanner.diagnostics().is_empty());
    assert_eq!(tokens[0].kind, SyntaxKind::PrivateIdentifier);
    assert_eq!(tokens[0].string_value(), "secret");
    assert_eq!(tokens[1].kind, SyntaxKind::InKeyword);
}

#[test]
fn test_unicode_identifiers_and_escapes() {
    let (tokens, scanner) = scan_all("℘x \\u{1D400}b a\\u200Cb");
    assert!(scanner.diagnostics().is_empty(), "{:?}", scanner.diagnostics());
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[1].string_value(), "\u{1D400}b");
    assert_eq!(tokens[2].string_value(), "a\u{200C}b");
}

#[test]
fn test_invalid_identifier_escape() {
    let (_, scanner) = scan_all("a\\u0020b");
    assert_eq!(
        scanner.diagnostics()[0].code,
        diagnostic_codes::INVALID_ESCAPED_IDENTIFIER_CHARACTER
    );
}

#[test]
fn test_unterminated_comment() {
    let (_, scanner) = scan_all("a /* never closed");
    assert_eq!(scanner.diagnostics()[0].code, diagnostic_codes::UNTERMINATED_COMMENT);
}

#[test]
fn test_comment_collection() {
    let mut scanner = ScannerState::new("// one\n/* two */ x");
    scanner.set_collect_comments(true);
    assert_eq!(scanner.lex().kind, SyntaxKind::Identifier);
    let comments = scanner.take_comments();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].value, " one");
    assert_eq!(comments[1].value, " two ");
    assert_eq!(comments[1].location.start, Position::new(1, 0));
}

#[test]
fn test_ill_formed_input_never_panics() {
    let inputs = [
        "\\", "\\u", "\\u{", "\\u{110000}", "'\\x", "`${", "`\\u{", "0x", "0b2", "1e+", "#",
        "/*", "'", "\"\\", "`", "}", "@#!", "0.e", "08.5e", "\u{2028}'\u{2029}'", "\\u{0}",
    ];
    for input in inputs {
        let mut scanner = ScannerState::new(input);
        scanner.set_regex_detection(true);
        for _ in 0..64 {
            if scanner.lex().kind == SyntaxKind::EndOfFileToken {
                break;
            }
        }
    }
}

#[test]
fn test_reset_rescans_sub_range() {
    let mut scanner = ScannerState::new("aa\nbb cc");
    scanner.lex();
    let bb = scanner.lex();
    scanner.lex();
    scanner.reset(bb.start() as usize, bb.location.start.line, bb.location.start.column);
    let again = scanner.lex();
    assert_eq!(again.raw.as_str(), "bb");
    assert_eq!(again.location, bb.location);
}
