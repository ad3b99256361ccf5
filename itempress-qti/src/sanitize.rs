//! Markup sanitization for untrusted authored content.
//!
//! Every free-form markup field MUST pass through here before compilation.
//! The allow-lists are fixed: a field that cannot be reduced to them
//! aborts the whole compilation. There is no best-effort stripping and no
//! partial document.

use itempress_core::{AssessmentItemInput, Interaction, StimulusInput};
use thiserror::Error;

/// Tags permitted in authored markup.
pub const ALLOWED_TAGS: [&str; 27] = [
    "p", "br", "em", "strong", "b", "i", "u", "sub", "sup", "span", "div", "ul", "ol", "li",
    "table", "thead", "tbody", "tr", "th", "td", "caption", "blockquote", "code", "pre", "h3",
    "h4", "img",
];

/// Attributes permitted on any allowed tag.
pub const ALLOWED_ATTRIBUTES: [&str; 8] = [
    "class", "id", "alt", "src", "width", "height", "colspan", "rowspan",
];

/// Tags with no closing counterpart.
const VOID_TAGS: [&str; 2] = ["br", "img"];

/// Errors raised when a markup field fails the allow-list.
#[derive(Debug, Error)]
pub enum SanitizeError {
    /// A tag outside the allow-list.
    #[error("{field}: tag <{tag}> is not in the allow-list")]
    DisallowedTag {
        /// Field path of the offending markup.
        field: String,
        /// The tag name found.
        tag: String,
    },

    /// An attribute outside the allow-list (including all `on*` handlers).
    #[error("{field}: attribute {attribute} is not allowed on <{tag}>")]
    DisallowedAttribute {
        /// Field path of the offending markup.
        field: String,
        /// The tag carrying the attribute.
        tag: String,
        /// The attribute name found.
        attribute: String,
    },

    /// A `src` value with an executable or data scheme.
    #[error("{field}: unsafe {attribute} url: {value}")]
    UnsafeUrl {
        /// Field path of the offending markup.
        field: String,
        /// The attribute carrying the url.
        attribute: String,
        /// The rejected value.
        value: String,
    },

    /// Comments, doctypes, CDATA, and processing instructions.
    #[error("{field}: comments, doctypes and processing instructions are not allowed")]
    DisallowedNode {
        /// Field path of the offending markup.
        field: String,
    },

    /// Markup the scanner cannot make sense of.
    #[error("{field}: malformed markup: {reason}")]
    Malformed {
        /// Field path of the offending markup.
        field: String,
        /// What the scanner choked on.
        reason: String,
    },

    /// Open/close tags that do not pair up.
    #[error("{field}: unbalanced tag <{tag}>")]
    UnbalancedTag {
        /// Field path of the offending markup.
        field: String,
        /// The tag left open or closed without opening.
        tag: String,
    },
}

/// Validate one markup field against the allow-lists.
///
/// Plain text and `{{...}}` placeholders pass through untouched; only
/// angle-bracket markup is inspected.
///
/// # Errors
///
/// Returns the first [`SanitizeError`] encountered; the caller must treat
/// it as fatal for the whole document.
pub fn sanitize_fragment(field: &str, markup: &str) -> Result<(), SanitizeError> {
    let mut stack: Vec<String> = Vec::new();
    let mut rest = markup;

    while let Some(pos) = rest.find('<') {
        rest = &rest[pos + 1..];
        if rest.starts_with('!') || rest.starts_with('?') {
            return Err(SanitizeError::DisallowedNode {
                field: field.to_string(),
            });
        }
        let Some(end) = rest.find('>') else {
            return Err(SanitizeError::Malformed {
                field: field.to_string(),
                reason: "unterminated tag".to_string(),
            });
        };
        let token = &rest[..end];
        rest = &rest[end + 1..];
        inspect_tag(field, token, &mut stack)?;
    }

    if let Some(tag) = stack.pop() {
        return Err(SanitizeError::UnbalancedTag {
            field: field.to_string(),
            tag,
        });
    }
    Ok(())
}

fn inspect_tag(field: &str, token: &str, stack: &mut Vec<String>) -> Result<(), SanitizeError> {
    let token = token.trim();

    if let Some(name) = token.strip_prefix('/') {
        let name = name.trim().to_ascii_lowercase();
        check_tag_name(field, &name)?;
        return match stack.pop() {
            Some(open) if open == name => Ok(()),
            Some(open) => Err(SanitizeError::UnbalancedTag {
                field: field.to_string(),
                tag: open,
            }),
            None => Err(SanitizeError::UnbalancedTag {
                field: field.to_string(),
                tag: name,
            }),
        };
    }

    let self_closing = token.ends_with('/');
    let token = token.strip_suffix('/').unwrap_or(token).trim_end();
    let name_end = token
        .find(|c: char| c.is_whitespace())
        .unwrap_or(token.len());
    let name = token[..name_end].to_ascii_lowercase();
    check_tag_name(field, &name)?;
    check_attributes(field, &name, &token[name_end..])?;

    if !self_closing && !VOID_TAGS.contains(&name.as_str()) {
        stack.push(name);
    }
    Ok(())
}

fn check_tag_name(field: &str, name: &str) -> Result<(), SanitizeError> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(SanitizeError::Malformed {
            field: field.to_string(),
            reason: "stray '<'; escape literal angle brackets as &lt;".to_string(),
        });
    }
    if !ALLOWED_TAGS.contains(&name) {
        return Err(SanitizeError::DisallowedTag {
            field: field.to_string(),
            tag: name.to_string(),
        });
    }
    Ok(())
}

fn check_attributes(field: &str, tag: &str, attrs: &str) -> Result<(), SanitizeError> {
    let mut rest = attrs;
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            return Ok(());
        }

        let name_end = rest
            .find(|c: char| c == '=' || c.is_whitespace())
            .unwrap_or(rest.len());
        let name = rest[..name_end].to_ascii_lowercase();
        if name.is_empty() {
            return Err(SanitizeError::Malformed {
                field: field.to_string(),
                reason: format!("bad attribute syntax on <{tag}>"),
            });
        }
        rest = rest[name_end..].trim_start();

        let mut value = None;
        if let Some(stripped) = rest.strip_prefix('=') {
            let stripped = stripped.trim_start();
            if let Some(inner) = stripped.strip_prefix('"') {
                let Some(close) = inner.find('"') else {
                    return Err(SanitizeError::Malformed {
                        field: field.to_string(),
                        reason: "unterminated attribute value".to_string(),
                    });
                };
                value = Some(&inner[..close]);
                rest = &inner[close + 1..];
            } else if let Some(inner) = stripped.strip_prefix('\'') {
                let Some(close) = inner.find('\'') else {
                    return Err(SanitizeError::Malformed {
                        field: field.to_string(),
                        reason: "unterminated attribute value".to_string(),
                    });
                };
                value = Some(&inner[..close]);
                rest = &inner[close + 1..];
            } else {
                let value_end = stripped
                    .find(char::is_whitespace)
                    .unwrap_or(stripped.len());
                value = Some(&stripped[..value_end]);
                rest = &stripped[value_end..];
            }
        }

        if name.starts_with("on") || !ALLOWED_ATTRIBUTES.contains(&name.as_str()) {
            return Err(SanitizeError::DisallowedAttribute {
                field: field.to_string(),
                tag: tag.to_string(),
                attribute: name,
            });
        }
        if name == "src" {
            if let Some(value) = value {
                check_url(field, &name, value)?;
            }
        }
    }
}

fn check_url(field: &str, attribute: &str, value: &str) -> Result<(), SanitizeError> {
    let lowered = value.trim().to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("vbscript:")
        || lowered.starts_with("data:")
    {
        return Err(SanitizeError::UnsafeUrl {
            field: field.to_string(),
            attribute: attribute.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Sanitize every free-form markup field of an item.
///
/// # Errors
///
/// Returns the first [`SanitizeError`] found across body, prompts, and
/// choice contents.
pub fn sanitize_item(item: &AssessmentItemInput) -> Result<(), SanitizeError> {
    sanitize_fragment("body", &item.body)?;
    for (index, interaction) in item.interactions.iter().enumerate() {
        match interaction {
            Interaction::Choice(choice) => {
                if let Some(prompt) = &choice.prompt {
                    sanitize_fragment(&format!("interactions[{index}].prompt"), prompt)?;
                }
                for (choice_index, option) in choice.choices.iter().enumerate() {
                    sanitize_fragment(
                        &format!("interactions[{index}].choices[{choice_index}].content"),
                        &option.content,
                    )?;
                }
            }
            Interaction::InlineChoice(inline) => {
                for (choice_index, option) in inline.choices.iter().enumerate() {
                    sanitize_fragment(
                        &format!("interactions[{index}].choices[{choice_index}].content"),
                        &option.content,
                    )?;
                }
            }
            Interaction::TextEntry(_) => {}
        }
    }
    Ok(())
}

/// Sanitize a stimulus body.
///
/// # Errors
///
/// Returns the first [`SanitizeError`] found.
pub fn sanitize_stimulus(stimulus: &StimulusInput) -> Result<(), SanitizeError> {
    sanitize_fragment("body", &stimulus.body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_markup_passes() {
        let markup = "<p>Solve <em>for</em> x.</p><ul><li>first</li><li>second</li></ul>";
        assert!(sanitize_fragment("body", markup).is_ok());
    }

    #[test]
    fn test_placeholders_pass_untouched() {
        assert!(sanitize_fragment("body", "<p>{{widget:graph}} and {{interaction:R1}}</p>").is_ok());
    }

    #[test]
    fn test_script_tag_fails_closed() {
        let err = sanitize_fragment("body", "<p>ok</p><script>alert(1)</script>").expect_err("fail");
        assert!(matches!(err, SanitizeError::DisallowedTag { tag, .. } if tag == "script"));
    }

    #[test]
    fn test_event_handler_attribute_rejected() {
        let err = sanitize_fragment("body", "<p onclick=\"steal()\">x</p>").expect_err("fail");
        assert!(matches!(
            err,
            SanitizeError::DisallowedAttribute { attribute, .. } if attribute == "onclick"
        ));
    }

    #[test]
    fn test_javascript_url_rejected() {
        let err = sanitize_fragment("body", "<img src=\"javascript:alert(1)\"/>").expect_err("fail");
        assert!(matches!(err, SanitizeError::UnsafeUrl { .. }));
    }

    #[test]
    fn test_https_image_allowed() {
        assert!(sanitize_fragment(
            "body",
            "<img src=\"https://example.org/fig.png\" alt=\"figure\" width=\"120\"/>"
        )
        .is_ok());
    }

    #[test]
    fn test_comment_rejected() {
        let err = sanitize_fragment("body", "<p>x</p><!-- hidden -->").expect_err("fail");
        assert!(matches!(err, SanitizeError::DisallowedNode { .. }));
    }

    #[test]
    fn test_unbalanced_markup_rejected() {
        let err = sanitize_fragment("body", "<p><em>never closed</p>").expect_err("fail");
        assert!(matches!(err, SanitizeError::UnbalancedTag { .. }));
    }

    #[test]
    fn test_stray_angle_bracket_rejected() {
        let err = sanitize_fragment("body", "3 < 5 is true").expect_err("fail");
        assert!(matches!(err, SanitizeError::Malformed { .. }));
    }

    #[test]
    fn test_case_insensitive_tags() {
        assert!(sanitize_fragment("body", "<P>upper</P>").is_ok());
        let err = sanitize_fragment("body", "<SCRIPT>x</SCRIPT>").expect_err("fail");
        assert!(matches!(err, SanitizeError::DisallowedTag { .. }));
    }
}
