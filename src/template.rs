//! Message template rendering.
//!
//! Substitutes `${NAME}` markers in a message template with values looked
//! up from the pipeline environment.

use std::sync::LazyLock;

use regex::Regex;

/// Matches `${NAME}` markers; names are non-empty and matched non-greedily
static VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{(.+?)\}").expect("marker pattern must compile"));

/// Render a template by substituting `${NAME}` markers.
///
/// Markers are collected in one pass over the input template; each one
/// is then replaced globally with `lookup(name)`, or the empty string when
/// the lookup has no value, so repeated markers resolve together.
/// Replacement values are never re-scanned: a value that itself contains
/// `${...}` stays literal, and there is no way to escape a literal `${`.
/// Unterminated or malformed markers are left verbatim.
pub fn render<F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut rendered = template.to_string();
    for caps in VAR_PATTERN.captures_iter(template) {
        let name = &caps[1];
        let value = lookup(name).unwrap_or_default();
        rendered = rendered.replace(&format!("${{{name}}}"), &value);
    }
    rendered
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use proptest::prelude::*;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render_substitutes_known_variable() {
        let vars = env(&[("JOB_NAME", "nightly")]);
        let rendered = render("Job ${JOB_NAME} finished", |name| vars.get(name).cloned());
        assert_eq!(rendered, "Job nightly finished");
    }

    #[test]
    fn test_render_absent_variable_becomes_empty() {
        let rendered = render("before ${MISSING} after", |_| None);
        assert_eq!(rendered, "before  after");
    }

    #[test]
    fn test_render_absent_variable_removed_everywhere() {
        let rendered = render("${X}-${X}-${X}", |_| None);
        assert_eq!(rendered, "--");
    }

    #[test]
    fn test_render_repeated_variable_replaced_together() {
        let vars = env(&[("N", "7")]);
        let rendered = render("run ${N} of ${N}", |name| vars.get(name).cloned());
        assert_eq!(rendered, "run 7 of 7");
    }

    #[test]
    fn test_render_does_not_expand_markers_in_replacement_values() {
        // A value containing a marker must come through literally
        let vars = env(&[("NOTE", "see ${SECRET}"), ("SECRET", "hunter2")]);
        let rendered = render("note: ${NOTE}", |name| vars.get(name).cloned());
        assert_eq!(rendered, "note: see ${SECRET}");
    }

    #[test]
    fn test_render_leaves_unterminated_marker_verbatim() {
        let vars = env(&[("A", "x")]);
        let rendered = render("${A} and ${UNTERMINATED", |name| vars.get(name).cloned());
        assert_eq!(rendered, "x and ${UNTERMINATED");
    }

    #[test]
    fn test_render_leaves_empty_marker_verbatim() {
        let rendered = render("${}", |_| Some("never".to_string()));
        assert_eq!(rendered, "${}");
    }

    proptest! {
        // Templates with no markers render unchanged
        #[test]
        fn test_render_is_identity_without_markers(template in "[a-zA-Z0-9 .,:;!?_/-]{0,64}") {
            let rendered = render(&template, |_| Some("value".to_string()));
            prop_assert_eq!(rendered, template);
        }
    }
}
