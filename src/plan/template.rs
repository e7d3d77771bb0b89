//! `{{name}}` placeholder substitution.
//!
//! Unknown names are left in place verbatim so a partially applied template
//! stays visibly broken. Substituted values are never rescanned.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}").expect("placeholder pattern is valid")
});

/// Replace every `{{name}}` in `template` that has an entry in `variables`.
///
/// ```
/// use std::collections::HashMap;
/// use vicon::plan::template::resolve;
///
/// let mut vars = HashMap::new();
/// vars.insert("input".to_string(), "x".to_string());
///
/// assert_eq!(resolve("{{input}}-{{bogus}}", &vars), "x-{{bogus}}");
/// ```
pub fn resolve(template: &str, variables: &HashMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match variables.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Names of the placeholders still present in `text`, in order of appearance.
pub fn unresolved_placeholders(text: &str) -> Vec<String> {
    PLACEHOLDER
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}
