//! Prompt rendering.
//!
//! Placeholders have the form `{{name}}`. The template is scanned once,
//! left to right, and substituted text is never scanned again, so the
//! result does not depend on key order or on one key being a prefix of
//! another (`{{R}}` vs `{{R1}}`).

use crate::error::{CoreError, CoreResult};
use crate::model::ParameterAssignment;

/// What to do with a placeholder that has no matching parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Leave the placeholder in the output untouched.
    #[default]
    Lenient,
    /// Fail with a schema error.
    Strict,
}

enum Piece<'a> {
    Text(&'a str),
    Token { key: &'a str, raw: &'a str },
}

fn pieces(template: &str) -> Vec<Piece<'_>> {
    let mut out = Vec::new();
    let mut text_start = 0;
    let mut cursor = 0;

    while let Some(offset) = template[cursor..].find("{{") {
        let open = cursor + offset;
        let body = open + 2;
        let Some(len) = template[body..].find("}}") else {
            break;
        };
        let key = &template[body..body + len];
        if key.contains(['{', '}']) {
            // Not a token; retry one byte further so `{{{x}}}` still finds `{{x}}`.
            cursor = open + 1;
            continue;
        }
        if open > text_start {
            out.push(Piece::Text(&template[text_start..open]));
        }
        let close = body + len + 2;
        out.push(Piece::Token {
            key,
            raw: &template[open..close],
        });
        text_start = close;
        cursor = close;
    }

    if text_start < template.len() {
        out.push(Piece::Text(&template[text_start..]));
    }
    out
}

/// Render a numeric parameter in a locale-independent form without rounding.
///
/// Integral values print without a fractional part (`220`, not `220.0`).
pub fn format_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Render leniently: unmatched placeholders pass through.
pub fn render(template: &str, params: &ParameterAssignment) -> String {
    pieces(template)
        .into_iter()
        .map(|piece| match piece {
            Piece::Text(text) => text.to_string(),
            Piece::Token { key, raw } => params
                .get(key)
                .map(format_value)
                .unwrap_or_else(|| raw.to_string()),
        })
        .collect()
}

/// Render with an explicit [`RenderMode`].
pub fn render_with(
    template: &str,
    params: &ParameterAssignment,
    mode: RenderMode,
) -> CoreResult<String> {
    if mode == RenderMode::Strict {
        if let Some(missing) = unresolved_placeholders(template, params).first() {
            return Err(CoreError::Schema(format!(
                "placeholder `{{{{{missing}}}}}` has no parameter"
            )));
        }
    }
    Ok(render(template, params))
}

/// All placeholder names in `template`, in order of appearance.
pub fn placeholders(template: &str) -> Vec<&str> {
    pieces(template)
        .into_iter()
        .filter_map(|piece| match piece {
            Piece::Token { key, .. } => Some(key),
            Piece::Text(_) => None,
        })
        .collect()
}

/// Placeholder names that `params` does not provide.
pub fn unresolved_placeholders<'a>(
    template: &'a str,
    params: &ParameterAssignment,
) -> Vec<&'a str> {
    placeholders(template)
        .into_iter()
        .filter(|key| params.get(key).is_none())
        .collect()
}
