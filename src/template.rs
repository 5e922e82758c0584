//! URL path templates
//!
//! Operation paths are written as templates such as
//! `/projects/{project_id}/apps/{app_name}`. Rendering substitutes every
//! placeholder with its percent-encoded path parameter.

use crate::error::{Error, Result};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Regex for matching path placeholders: {name}
static PATH_PARAM_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\s*([a-zA-Z_][a-zA-Z0-9_]*)\s*\}").unwrap());

/// Render a path template, substituting `{name}` placeholders.
///
/// Every placeholder must have a non-empty value in `params`; otherwise
/// `Error::MissingPathParam` names the first offending placeholder. Values
/// are percent-encoded so a `/` inside a value cannot change the path shape.
pub fn render_path(template: &str, params: &HashMap<String, String>) -> Result<String> {
    let mut result = String::with_capacity(template.len());
    let mut last = 0;

    for cap in PATH_PARAM_REGEX.captures_iter(template) {
        let full_match = cap.get(0).unwrap();
        let name = cap.get(1).unwrap().as_str();

        let value = params
            .get(name)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::missing_path_param(name))?;

        result.push_str(&template[last..full_match.start()]);
        result.push_str(&encode_path_segment(value));
        last = full_match.end();
    }

    result.push_str(&template[last..]);
    Ok(result)
}

/// Percent-encode a single path segment
pub fn encode_path_segment(value: &str) -> String {
    // form encoding turns spaces into '+' and escapes literal '+' as %2B,
    // so swapping '+' back to %20 yields a valid path segment
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_simple_substitution() {
        let result = render_path("/projects/{id}", &params(&[("id", "abc")])).unwrap();
        assert_eq!(result, "/projects/abc");
    }

    #[test]
    fn test_multiple_substitutions() {
        let result = render_path(
            "/projects/{project_id}/apps/{app_name}/revisions",
            &params(&[("project_id", "p-1"), ("app_name", "web")]),
        )
        .unwrap();
        assert_eq!(result, "/projects/p-1/apps/web/revisions");
    }

    #[test]
    fn test_missing_param() {
        let err = render_path("/projects/{project_id}", &HashMap::new()).unwrap_err();
        assert!(matches!(err, Error::MissingPathParam { ref name } if name == "project_id"));
    }

    #[test]
    fn test_empty_param_is_missing() {
        let err = render_path("/projects/{id}", &params(&[("id", "")])).unwrap_err();
        assert!(matches!(err, Error::MissingPathParam { .. }));
    }

    #[test]
    fn test_no_templates() {
        let result = render_path("/projects", &HashMap::new()).unwrap();
        assert_eq!(result, "/projects");
    }

    #[test]
    fn test_whitespace_in_placeholder() {
        let result = render_path("/a/{ id }", &params(&[("id", "1")])).unwrap();
        assert_eq!(result, "/a/1");
    }

    #[test_case("plain", "plain" ; "unreserved")]
    #[test_case("a b", "a%20b" ; "space")]
    #[test_case("a/b", "a%2Fb" ; "slash")]
    #[test_case("a+b", "a%2Bb" ; "plus")]
    #[test_case("ü", "%C3%BC" ; "utf8")]
    fn test_encode_path_segment(input: &str, expected: &str) {
        assert_eq!(encode_path_segment(input), expected);
    }
}
