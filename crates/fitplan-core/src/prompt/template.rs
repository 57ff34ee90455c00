//! Named-placeholder string templates.
//!
//! Placeholders look like `{name}`. `{{` and `}}` produce literal braces.
//! Rendering is pure: the same template and table always give the same output.

use std::collections::BTreeMap;

/// Errors from parsing or rendering a template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("template placeholder {0:?} has no value")]
    MissingField(String),

    #[error("malformed template at byte {offset}: {reason}")]
    Malformed { offset: usize, reason: &'static str },
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Brace(char),
    Placeholder(&'a str),
}

fn segments(template: &str) -> Result<Vec<Segment<'_>>, TemplateError> {
    let bytes = template.as_bytes();
    let mut out = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' if bytes.get(i + 1) == Some(&b'{') => {
                out.push(Segment::Literal(&template[start..i]));
                out.push(Segment::Brace('{'));
                i += 2;
                start = i;
            }
            b'}' if bytes.get(i + 1) == Some(&b'}') => {
                out.push(Segment::Literal(&template[start..i]));
                out.push(Segment::Brace('}'));
                i += 2;
                start = i;
            }
            b'{' => {
                let close = template[i + 1..].find('}').ok_or(TemplateError::Malformed {
                    offset: i,
                    reason: "unterminated placeholder",
                })?;
                let name = &template[i + 1..i + 1 + close];
                let valid = !name.is_empty()
                    && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_');
                if !valid {
                    return Err(TemplateError::Malformed {
                        offset: i,
                        reason: "placeholder names must be non-empty [A-Za-z0-9_]",
                    });
                }
                out.push(Segment::Literal(&template[start..i]));
                out.push(Segment::Placeholder(name));
                i += close + 2;
                start = i;
            }
            b'}' => {
                return Err(TemplateError::Malformed {
                    offset: i,
                    reason: "unmatched closing brace",
                });
            }
            _ => i += 1,
        }
    }
    out.push(Segment::Literal(&template[start..]));
    out.retain(|s| !matches!(s, Segment::Literal("")));
    Ok(out)
}

/// Placeholder names in order of first appearance.
pub fn placeholders(template: &str) -> Result<Vec<&str>, TemplateError> {
    let mut names: Vec<&str> = Vec::new();
    for seg in segments(template)? {
        if let Segment::Placeholder(name) = seg {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    Ok(names)
}

/// Substitute every placeholder from `values`.
///
/// The table must cover every placeholder; extra keys are ignored.
pub fn render(template: &str, values: &BTreeMap<&str, String>) -> Result<String, TemplateError> {
    let segs = segments(template)?;

    // Check the key set up front so a partial render never escapes.
    for seg in &segs {
        if let Segment::Placeholder(name) = seg {
            if !values.contains_key(name) {
                return Err(TemplateError::MissingField((*name).to_owned()));
            }
        }
    }

    let mut out = String::with_capacity(template.len() + 64);
    for seg in segs {
        match seg {
            Segment::Literal(s) => out.push_str(s),
            Segment::Brace(c) => out.push(c),
            Segment::Placeholder(name) => out.push_str(&values[name]),
        }
    }
    Ok(out)
}
