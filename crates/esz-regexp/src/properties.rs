//! Names accepted inside `\p{…}` and `\P{…}`.
//!
//! Matching is exact: no loose matching of case, spaces or underscores.
//! Script names are checked against the host's Unicode tables.

use regex::Regex;

use crate::error::{RegexError, syntax};

const GENERAL_CATEGORY_NAMES: [&str; 2] = ["General_Category", "gc"];
const SCRIPT_NAMES: [&str; 4] = ["Script", "sc", "Script_Extensions", "scx"];

#[rustfmt::skip]
const GENERAL_CATEGORY_VALUES: &[&str] = &[
    "Cased_Letter", "LC",
    "Close_Punctuation", "Pe",
    "Connector_Punctuation", "Pc",
    "Control", "Cc", "cntrl",
    "Currency_Symbol", "Sc",
    "Dash_Punctuation", "Pd",
    "Decimal_Number", "Nd", "digit",
    "Enclosing_Mark", "Me",
    "Final_Punctuation", "Pf",
    "Format", "Cf",
    "Initial_Punctuation", "Pi",
    "Letter", "L",
    "Letter_Number", "Nl",
    "Line_Separator", "Zl",
    "Lowercase_Letter", "Ll",
    "Mark", "M", "Combining_Mark",
    "Math_Symbol", "Sm",
    "Modifier_Letter", "Lm",
    "Modifier_Symbol", "Sk",
    "Nonspacing_Mark", "Mn",
    "Number", "N",
    "Open_Punctuation", "Ps",
    "Other", "C",
    "Other_Letter", "Lo",
    "Other_Number", "No",
    "Other_Punctuation", "Po",
    "Other_Symbol", "So",
    "Paragraph_Separator", "Zp",
    "Private_Use", "Co",
    "Punctuation", "P", "punct",
    "Separator", "Z",
    "Space_Separator", "Zs",
    "Spacing_Mark", "Mc",
    "Surrogate", "Cs",
    "Symbol", "S",
    "Titlecase_Letter", "Lt",
    "Unassigned", "Cn",
    "Uppercase_Letter", "Lu",
];

#[rustfmt::skip]
const BINARY_PROPERTIES: &[&str] = &[
    "ASCII",
    "ASCII_Hex_Digit", "AHex",
    "Alphabetic", "Alpha",
    "Any",
    "Assigned",
    "Bidi_Control", "Bidi_C",
    "Bidi_Mirrored", "Bidi_M",
    "Case_Ignorable", "CI",
    "Cased",
    "Changes_When_Casefolded", "CWCF",
    "Changes_When_Casemapped", "CWCM",
    "Changes_When_Lowercased", "CWL",
    "Changes_When_NFKC_Casefolded", "CWKCF",
    "Changes_When_Titlecased", "CWT",
    "Changes_When_Uppercased", "CWU",
    "Dash",
    "Default_Ignorable_Code_Point", "DI",
    "Deprecated", "Dep",
    "Diacritic", "Dia",
    "Emoji",
    "Emoji_Component", "EComp",
    "Emoji_Modifier", "EMod",
    "Emoji_Modifier_Base", "EBase",
    "Emoji_Presentation", "EPres",
    "Extended_Pictographic", "ExtPict",
    "Extender", "Ext",
    "Grapheme_Base", "Gr_Base",
    "Grapheme_Extend", "Gr_Ext",
    "Hex_Digit", "Hex",
    "IDS_Binary_Operator", "IDSB",
    "IDS_Trinary_Operator", "IDST",
    "ID_Continue", "IDC",
    "ID_Start", "IDS",
    "Ideographic", "Ideo",
    "Join_Control", "Join_C",
    "Logical_Order_Exception", "LOE",
    "Lowercase", "Lower",
    "Math",
    "Noncharacter_Code_Point", "NChar",
    "Pattern_Syntax", "Pat_Syn",
    "Pattern_White_Space", "Pat_WS",
    "Quotation_Mark", "QMark",
    "Radical",
    "Regional_Indicator", "RI",
    "Sentence_Terminal", "STerm",
    "Soft_Dotted", "SD",
    "Terminal_Punctuation", "Term",
    "Unified_Ideograph", "UIdeo",
    "Uppercase", "Upper",
    "Variation_Selector", "VS",
    "White_Space", "space",
    "XID_Continue", "XIDC",
    "XID_Start", "XIDS",
];

/// Check a property escape's `name=value` or lone `value`.
pub(crate) fn check_property(name: Option<&str>, value: &str) -> Result<(), RegexError> {
    let known = match name {
        None => GENERAL_CATEGORY_VALUES.contains(&value) || BINARY_PROPERTIES.contains(&value),
        Some(name) if GENERAL_CATEGORY_NAMES.contains(&name) => {
            GENERAL_CATEGORY_VALUES.contains(&value)
        }
        Some(name) if SCRIPT_NAMES.contains(&name) => is_script(value),
        Some(name) => return syntax(format!("Invalid property name '{name}'")),
    };
    if !known {
        return syntax(format!("Invalid property name '{value}'"));
    }
    Ok(())
}

/// Script names and aliases all start with an ASCII capital; the host's
/// loose matching would also take `greek` or `old italic`.
fn is_script(value: &str) -> bool {
    value.starts_with(|c: char| c.is_ascii_uppercase())
        && !value.contains("__")
        && Regex::new(&format!(r"\p{{Script={value}}}")).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lone_values_are_categories_or_binary_properties() {
        assert!(check_property(None, "L").is_ok());
        assert!(check_property(None, "Lowercase_Letter").is_ok());
        assert!(check_property(None, "ASCII_Hex_Digit").is_ok());
        assert!(check_property(None, "Nope").is_err());
        assert!(check_property(None, "letter").is_err());
        assert!(check_property(None, "Greek").is_err());
    }

    #[test]
    fn named_values() {
        assert!(check_property(Some("gc"), "Lu").is_ok());
        assert!(check_property(Some("gc"), "ASCII").is_err());
        assert!(check_property(Some("Script"), "Greek").is_ok());
        assert!(check_property(Some("scx"), "Latn").is_ok());
        assert!(check_property(Some("sc"), "greek").is_err());
        assert!(check_property(Some("sc"), "Nope").is_err());
        assert!(check_property(Some("Foo"), "Bar").is_err());
    }
}
