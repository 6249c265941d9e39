//! Property-based tests for dotenv parsing and substitution

use proptest::prelude::*;
use runmd::env::{parse_env, substitute_env, EnvMap};

fn key() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_]{0,15}"
}

/// Values without quotes, `#`-free edges or surrounding whitespace
fn value() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_./:=@-]{0,24}"
}

proptest! {
    #[test]
    fn test_unquoted_line_round_trips(key in key(), value in value()) {
        let env = parse_env(&format!("{}={}\n", key, value));
        prop_assert_eq!(env.get(&key), Some(value.as_str()));
    }

    #[test]
    fn test_quoted_line_round_trips(
        key in key(),
        value in "[A-Za-z0-9 _./:=@-]{0,24}",
        quote in prop::sample::select(vec!['"', '\'']),
    ) {
        let env = parse_env(&format!("{}={}{}{}\n", key, quote, value, quote));
        prop_assert_eq!(env.get(&key), Some(value.as_str()));
    }

    #[test]
    fn test_padding_is_trimmed(key in key(), value in value(), pad in "[ \t]{0,4}") {
        let env = parse_env(&format!("{pad}{key}{pad}={pad}{value}{pad}\n"));
        prop_assert_eq!(env.get(&key), Some(value.as_str()));
    }

    #[test]
    fn test_parse_never_panics(text in "\\PC{0,300}") {
        let _ = parse_env(&text);
    }

    #[test]
    fn test_known_placeholder_is_replaced(
        name in key(),
        value in value(),
        prefix in "[a-z ]{0,10}",
        suffix in "[a-z ]{0,10}",
    ) {
        let env: EnvMap = [(name.clone(), value.clone())].into_iter().collect();
        let text = format!("{}${{{}}}{}", prefix, name, suffix);
        prop_assert_eq!(substitute_env(&text, &env), format!("{}{}{}", prefix, value, suffix));
    }

    #[test]
    fn test_unknown_placeholder_is_verbatim(name in key(), other in key(), value in value()) {
        prop_assume!(name != other);
        let env: EnvMap = [(other, value)].into_iter().collect();
        let text = format!("run ${{{}}} now", name);
        prop_assert_eq!(substitute_env(&text, &env), text.clone());
    }

    #[test]
    fn test_adjacent_placeholders_resolve_independently(
        a in key(),
        b in key(),
        va in value(),
        vb in value(),
    ) {
        prop_assume!(a != b);
        let env: EnvMap = [(a.clone(), va.clone()), (b.clone(), vb.clone())].into_iter().collect();
        let text = format!("${{{}}}${{{}}}", a, b);
        prop_assert_eq!(substitute_env(&text, &env), format!("{}{}", va, vb));
    }

    #[test]
    fn test_text_without_placeholders_is_unchanged(text in "[^$]{0,200}", key in key()) {
        let env: EnvMap = [(key, "x".to_string())].into_iter().collect();
        prop_assert_eq!(substitute_env(&text, &env), text.clone());
    }
}
