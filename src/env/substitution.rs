//! `${NAME}` placeholder substitution

use super::EnvMap;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;

/// Dollar, open brace, one or more ASCII word characters, close brace
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([A-Za-z0-9_]+)\}").expect("placeholder pattern is valid")
});

/// Replace every `${NAME}` whose name is in `env`
///
/// Unknown names are left verbatim. Borrows the input when nothing changes.
pub fn substitute_env<'a>(content: &'a str, env: &EnvMap) -> Cow<'a, str> {
    if env.is_empty() {
        return Cow::Borrowed(content);
    }

    PLACEHOLDER.replace_all(content, |caps: &Captures<'_>| match env.get(&caps[1]) {
        Some(value) => value.to_string(),
        None => caps[0].to_string(),
    })
}
