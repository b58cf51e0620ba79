use std::time::Duration;

use esz_regexp::{RegexErrorKind, TranslateOptions, TranslatedRegex, translate, validate};

fn compile(pattern: &str, flags: &str) -> regex::Regex {
    let translated = translate(pattern, flags, &TranslateOptions::default())
        .unwrap_or_else(|err| panic!("/{pattern}/{flags} failed: {err}"));
    translated
        .compile()
        .unwrap_or_else(|err| panic!("/{pattern}/{flags} -> {} failed: {err}", translated.pattern))
}

fn translated(pattern: &str, flags: &str) -> TranslatedRegex {
    translate(pattern, flags, &TranslateOptions::default())
        .unwrap_or_else(|err| panic!("/{pattern}/{flags} failed: {err}"))
}

fn error_kind(pattern: &str, flags: &str) -> RegexErrorKind {
    match translate(pattern, flags, &TranslateOptions::default()) {
        Ok(t) => panic!("/{pattern}/{flags} translated to {}", t.pattern),
        Err(err) => err.kind(),
    }
}

#[test]
fn astral_range_in_unicode_mode() {
    let re = compile("[\u{1F4A9}-\u{1F4AB}]", "u");
    assert!(re.is_match("\u{1F4A9}"));
    assert!(re.is_match("\u{1F4AA}"));
    assert!(re.is_match("\u{1F4AB}"));
    assert!(!re.is_match("a"));
    assert!(!re.is_match("\u{1F4AC}"));
}

#[test]
fn astral_range_without_unicode_flag_is_out_of_order() {
    // Without `u` the class holds code units and the range runs from the low
    // half of the first character to the high half of the second.
    assert_eq!(error_kind("[\u{1F4A9}-\u{1F4AB}]", ""), RegexErrorKind::Syntax);
}

#[test]
fn lone_surrogates_in_classes_are_unsupported() {
    assert_eq!(error_kind("[\\uD83D]", ""), RegexErrorKind::Unsupported);
    assert_eq!(error_kind("[\u{1F4A9}]", ""), RegexErrorKind::Unsupported);
    assert_eq!(error_kind("\\uDCA9", ""), RegexErrorKind::Unsupported);
}

#[test]
fn surrogate_pair_literal_without_unicode_flag() {
    let re = compile("a\u{1F4A9}b", "");
    assert!(re.is_match("a\u{1F4A9}b"));
    let re = compile("\\uD83D\\uDCA9", "");
    assert!(re.is_match("\u{1F4A9}"));
}

#[test]
fn quantified_astral_literal_without_unicode_flag_is_unsupported() {
    // The quantifier applies to the trailing surrogate alone.
    assert_eq!(error_kind("\u{1F4A9}+", ""), RegexErrorKind::Unsupported);
    let re = compile("\u{1F4A9}+", "u");
    assert!(re.is_match("\u{1F4A9}\u{1F4A9}"));
}

#[test]
fn duplicate_named_groups_in_separate_alternatives() {
    let t = translated("(?<y>\\d{4})-\\d{2}|\\d{2}-(?<y>\\d{4})", "");
    assert_eq!(t.group_indices("y"), &[1, 2]);
    assert_eq!(t.group_index("y"), Some(1));
    let re = t.compile().unwrap();

    let caps = re.captures("1999-12").unwrap();
    assert_eq!(t.named_match(&caps, "y").unwrap().as_str(), "1999");
    let caps = re.captures("12-1999").unwrap();
    assert_eq!(t.named_match(&caps, "y").unwrap().as_str(), "1999");
    assert!(t.named_match(&caps, "missing").is_none());
}

#[test]
fn duplicate_named_groups_in_one_alternative_are_syntax_errors() {
    assert_eq!(error_kind("(?<a>x)(?<a>y)", ""), RegexErrorKind::Syntax);
    assert_eq!(error_kind("(?<a>x)|((?<a>y)(?<a>z))", ""), RegexErrorKind::Syntax);
}

#[test]
fn lookaround_and_backreferences_are_unsupported() {
    assert_eq!(error_kind("a(?=b)", ""), RegexErrorKind::Unsupported);
    assert_eq!(error_kind("a(?!b)", ""), RegexErrorKind::Unsupported);
    assert_eq!(error_kind("(?<=a)b", ""), RegexErrorKind::Unsupported);
    assert_eq!(error_kind("(?<!a)b", ""), RegexErrorKind::Unsupported);
    assert_eq!(error_kind("(a)\\1", ""), RegexErrorKind::Unsupported);
    assert_eq!(error_kind("(?<n>a)\\k<n>", ""), RegexErrorKind::Unsupported);
}

#[test]
fn syntax_errors_win_over_unsupported_constructs() {
    assert_eq!(error_kind("(?=a)(", ""), RegexErrorKind::Syntax);
    assert_eq!(error_kind("(a)\\1[", ""), RegexErrorKind::Syntax);
}

#[test]
fn unicode_mode_is_strict() {
    for pattern in ["\\a", "{", "}", "]", "a{1", "\\c", "\\1", "\\-", "(?=a)*", "\\u{110000}"] {
        assert_eq!(error_kind(pattern, "u"), RegexErrorKind::Syntax, "/{pattern}/u");
    }
    assert!(validate("[\\-]", "u").is_ok());
    assert!(validate("\\/", "u").is_ok());
}

#[test]
fn annex_b_leniency_without_unicode_flag() {
    let re = compile("\\a{", "");
    assert!(re.is_match("a{"));
    let re = compile("}]", "");
    assert!(re.is_match("}]"));
    let re = compile("x{1", "");
    assert!(re.is_match("x{1"));
    let re = compile("\\c1", "");
    assert!(re.is_match("\\c1"));
    let re = compile("\\8\\101", "");
    assert!(re.is_match("8A"));
    let re = compile("\\k", "");
    assert!(re.is_match("k"));
    let re = compile("[\\c_]", "");
    assert!(re.is_match("\u{1F}"));
}

#[test]
fn dot_excludes_line_terminators_unless_dot_all() {
    let re = compile("^a.b$", "");
    assert!(re.is_match("a-b"));
    for terminator in ["\n", "\r", "\u{2028}", "\u{2029}"] {
        assert!(!re.is_match(&format!("a{terminator}b")));
    }
    let re = compile("^a.b$", "s");
    assert!(re.is_match("a\nb"));
    assert!(re.is_match("a\u{2028}b"));
}

#[test]
fn word_boundary_is_ascii() {
    let re = compile("\\bfoo\\b", "");
    assert!(re.is_match("\u{e9}foo\u{e9}"));
    assert!(re.is_match("a foo b"));
    assert!(!re.is_match("afoo"));
}

#[test]
fn multiline_anchors_are_unsupported() {
    assert_eq!(error_kind("^a", "m"), RegexErrorKind::Unsupported);
    assert_eq!(error_kind("a$", "m"), RegexErrorKind::Unsupported);
    assert!(translate("a", "m", &TranslateOptions::default()).is_ok());
}

#[test]
fn ignore_case() {
    let re = compile("abc", "i");
    assert!(re.is_match("ABC"));
    let re = compile("[a-c]+", "i");
    assert!(re.is_match("CAB"));
}

#[test]
fn word_class_with_ignore_case() {
    let re = compile("^\\w$", "i");
    assert!(re.is_match("K"));
    assert!(!re.is_match("\u{17F}"));
    assert!(!re.is_match("\u{212A}"));
    let re = compile("^\\w$", "ui");
    assert!(re.is_match("\u{17F}"));
    assert!(re.is_match("\u{212A}"));
}

#[test]
fn flags_are_reported() {
    let t = translated("a", "gy");
    assert!(t.sticky());
    assert!(t.global());
    assert!(!translated("a", "").sticky());
    assert_eq!(error_kind("a", "gg"), RegexErrorKind::Syntax);
    assert_eq!(error_kind("a", "uv"), RegexErrorKind::Syntax);
}

#[test]
fn unicode_properties() {
    let re = compile("^\\p{Script=Greek}+$", "u");
    assert!(re.is_match("\u{3B1}\u{3B2}"));
    assert!(!re.is_match("ab"));
    let re = compile("^\\P{L}$", "u");
    assert!(re.is_match("1"));
    assert!(!re.is_match("a"));
    // Without `u`, `\p` is an identity escape.
    let re = compile("\\p{L}", "");
    assert!(re.is_match("p{L}"));
    assert_eq!(error_kind("\\p{Foo=Bar}", "u"), RegexErrorKind::Syntax);
}

#[test]
fn unicode_sets_difference() {
    let re = compile("^[\\p{L}--[a-z]]$", "v");
    assert!(re.is_match("A"));
    assert!(re.is_match("\u{3B1}"));
    assert!(!re.is_match("q"));
    let re = compile("^[\\p{L}&&[a-f]]$", "v");
    assert!(re.is_match("c"));
    assert!(!re.is_match("g"));
    assert_eq!(error_kind("[\\q{abc}]", "v"), RegexErrorKind::Unsupported);
    let re = compile("^[\\q{a|b}]$", "v");
    assert!(re.is_match("b"));
}

#[test]
fn empty_patterns_and_classes() {
    let re = compile("", "");
    assert!(re.is_match(""));
    let re = compile("a[]", "");
    assert!(!re.is_match("a"));
    assert!(!re.is_match("ab"));
    let re = compile("^[^]$", "");
    assert!(re.is_match("\n"));
    assert!(re.is_match("\u{1F4A9}"));
}

#[test]
fn large_repetition_counts_are_unsupported() {
    assert_eq!(error_kind("a{1001}", ""), RegexErrorKind::Unsupported);
    assert!(translate("a{2,1000}", "", &TranslateOptions::default()).is_ok());
}

#[test]
fn host_size_limit_maps_to_unsupported() {
    let options = TranslateOptions::default().with_size_limit(64);
    let err = translate("\\w{100}", "u", &options).unwrap_err();
    assert_eq!(err.kind(), RegexErrorKind::Unsupported);
}

#[test]
fn zero_budget_times_out() {
    let pattern = "(?:a|b)".repeat(2_000);
    let options = TranslateOptions::default().with_timeout(Duration::ZERO);
    let err = translate(&pattern, "", &options).unwrap_err();
    assert_eq!(err.kind(), RegexErrorKind::Timeout);
}

#[test]
fn common_syntax_errors() {
    for pattern in ["(", ")", "[", "*", "a**", "(?<>a)", "(?<1a>a)", "a{2,1}", "\\", "(?x)"] {
        assert_eq!(error_kind(pattern, ""), RegexErrorKind::Syntax, "/{pattern}/");
    }
    let err = validate("(", "").unwrap_err();
    assert_eq!(err.to_string(), "Invalid regular expression: Unterminated group");
}

#[test]
fn ignore_case_without_unicode_uses_upper_case_mapping() {
    let re = compile("^s$", "i");
    assert!(re.is_match("S"));
    assert!(!re.is_match("\u{17F}"));
    let re = compile("^[a-z]$", "i");
    assert!(re.is_match("Q"));
    assert!(!re.is_match("\u{212A}"));
    let re = compile("^\u{3C3}$", "i");
    assert!(re.is_match("\u{3C2}"));
    assert!(re.is_match("\u{3A3}"));
    let re = compile("^\u{DF}$", "i");
    assert!(!re.is_match("\u{1E9E}"));
    let re = compile("^s$", "iu");
    assert!(re.is_match("\u{17F}"));
}

#[test]
fn code_unit_atoms_are_exact_only_inside_the_bmp() {
    let t = translated("^.$", "");
    assert!(t.exact_for("a\u{FFFF}"));
    assert!(!t.exact_for("\u{1F4A9}"));
    let t = translated("[^a]", "");
    assert!(!t.exact_for("\u{1F4A9}"));
    let t = translated("^.$", "u");
    assert!(t.exact_for("\u{1F4A9}"));
    let t = translated("ab", "");
    assert!(t.exact_for("\u{1F4A9}"));
}

#[test]
fn unknown_property_names_are_syntax_errors() {
    for pattern in ["\\p{Nope}", "\\P{letter}", "\\p{Greek}", "\\p{sc=greek}", "[\\p{Nope}]"] {
        assert_eq!(error_kind(pattern, "u"), RegexErrorKind::Syntax, "/{pattern}/u");
    }
    assert!(validate("\\p{Nope}", "").is_ok());
    assert!(translate("\\p{sc=Latn}\\p{Lu}\\p{ASCII}", "u", &TranslateOptions::default()).is_ok());
}
