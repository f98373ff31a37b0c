/*!
 * Line Format
 * Renders structured items to the single-line text form carried by pipes
 */

use super::types::PipeResult;
use crate::core::types::Line;
use serde_json::Value;

/// How structured items are rendered before reaching a text pipe
///
/// Strings pass through verbatim unless they contain `\n` or `\r`; those
/// are written JSON-quoted, the same as every other non-string value, so
/// one item is always exactly one line. A reader recovers the original
/// text with `serde_json::from_str::<String>`. The two policies differ only in
/// how they present `null`: an interactive terminal shows an empty line,
/// a redirected stream keeps the literal so downstream parsers see a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineFormat {
    Interactive,
    Redirected,
}

impl LineFormat {
    /// Pick the policy from the console's redirection flag
    pub fn for_output(redirected: bool) -> Self {
        if redirected {
            LineFormat::Redirected
        } else {
            LineFormat::Interactive
        }
    }

    /// Render one item as one line (without terminator)
    pub fn render(self, item: &Value) -> PipeResult<Line> {
        match item {
            Value::String(s) => self.render_text(s),
            Value::Null if self == LineFormat::Interactive => Ok(Line::new()),
            other => Ok(serde_json::to_string(other)?),
        }
    }

    /// Frame raw text as one line, quoting it if it would break line framing
    pub fn render_text(self, text: &str) -> PipeResult<Line> {
        if text.contains(['\n', '\r']) {
            return Ok(serde_json::to_string(text)?);
        }
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strings_are_verbatim() {
        for format in [LineFormat::Interactive, LineFormat::Redirected] {
            assert_eq!(format.render(&json!("a b")).unwrap(), "a b");
        }
    }

    #[test]
    fn test_structured_items_stay_on_one_line() {
        let item = json!({"name": "x", "tags": [1, 2]});
        let line = LineFormat::Interactive.render(&item).unwrap();
        assert!(!line.contains('\n'));
        assert_eq!(line, r#"{"name":"x","tags":[1,2]}"#);
    }

    #[test]
    fn test_line_breaks_in_strings_are_quoted() {
        for format in [LineFormat::Interactive, LineFormat::Redirected] {
            let line = format.render(&json!("a\nb")).unwrap();
            assert_eq!(line, r#""a\nb""#);
            assert_eq!(serde_json::from_str::<String>(&line).unwrap(), "a\nb");

            let line = format.render_text("x\r").unwrap();
            assert_eq!(line, r#""x\r""#);
        }
    }

    #[test]
    fn test_null_rendering() {
        assert_eq!(LineFormat::Interactive.render(&Value::Null).unwrap(), "");
        assert_eq!(LineFormat::Redirected.render(&Value::Null).unwrap(), "null");
    }
}
