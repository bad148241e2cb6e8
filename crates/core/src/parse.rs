//! Recovering structured output from free-form model replies
//!
//! The model is asked to answer with an `IDEA:` line followed by `FILE:`
//! sections, but nothing forces it to comply. Some models answer with a JSON
//! object instead, some wrap file bodies in Markdown fences, some do both.
//! The functions here detect the convention by inspecting the content and
//! never execute any part of the reply.

use regex::Regex;
use serde::Serialize;

/// Marker line introducing each generated file in a plain-text reply.
pub const FILE_MARKER: &str = "FILE:";

/// Filenames used when the reply is a structured object. Missing keys
/// default to empty content under these names.
pub const CANONICAL_FILENAMES: [&str; 3] = ["index.html", "style.css", "script.js"];

/// Fatal parse failure: the reply is neither a structured object nor a
/// marker-formatted text.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("reply matches no supported format (no structured object, no FILE: marker)")]
    UnrecognizedFormat,
}

/// One generated file recovered from the reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFile {
    pub name: String,
    pub content: String,
}

/// A file section whose filename failed the hygiene check. Kept out of
/// [`ParsedReply::files`] so it never reaches the publisher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedFile {
    pub name: String,
    pub reason: String,
}

/// Structured result of one reply.
///
/// `files` preserves the order in which sections appeared in the reply; a
/// later section with an already-seen filename replaces the earlier content
/// in place. An empty `files` with a recovered idea is a valid result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedReply {
    pub idea: String,
    pub files: Vec<GeneratedFile>,
    pub rejected: Vec<RejectedFile>,
}

/// Parse a raw model reply into an idea and its generated files.
///
/// Structured decoding is attempted first; replies that are not a
/// well-formed object fall through to the `FILE:` marker convention.
pub fn parse_reply(reply: &str) -> Result<ParsedReply, ParseError> {
    if let Some(parsed) = parse_structured(reply) {
        return Ok(parsed);
    }

    parse_marked(reply).ok_or(ParseError::UnrecognizedFormat)
}

// =============================================================================
// Structured convention
// =============================================================================

/// Key aliases recognized for each canonical filename.
const FILE_KEYS: [(&str, [&str; 2]); 3] = [
    ("index.html", ["index.html", "html"]),
    ("style.css", ["style.css", "css"]),
    ("script.js", ["script.js", "js"]),
];

/// Attempt to read the reply as a JSON object with string-valued fields.
///
/// Returns `None` when the reply is not such an object, when a recognized
/// key holds a non-string value, or when no recognized key is present at
/// all (an arbitrary object is not a generation result). Unknown keys are
/// ignored. This is a plain serde decode; the reply is data, never code.
fn parse_structured(reply: &str) -> Option<ParsedReply> {
    let value: serde_json::Value = serde_json::from_str(reply.trim()).ok()?;
    let object = value.as_object()?;

    let mut recognized = 0usize;

    let mut lookup = |aliases: &[&str]| -> Option<Option<String>> {
        for alias in aliases {
            match object.get(*alias) {
                None => continue,
                Some(serde_json::Value::String(text)) => {
                    recognized += 1;
                    return Some(Some(text.clone()));
                }
                // A recognized key with a non-string value rejects the
                // structured decode entirely.
                Some(_) => return None,
            }
        }
        Some(None)
    };

    let idea = lookup(&["idea", "title"])?;

    let mut files = Vec::with_capacity(CANONICAL_FILENAMES.len());
    for (name, aliases) in FILE_KEYS {
        let content = lookup(&aliases)?;
        files.push(GeneratedFile {
            name: name.to_string(),
            content: content.unwrap_or_default(),
        });
    }

    if recognized == 0 {
        return None;
    }

    Some(ParsedReply {
        idea: idea.unwrap_or_default().trim().to_string(),
        files,
        rejected: Vec::new(),
    })
}

// =============================================================================
// Marker convention
// =============================================================================

/// Parse the `IDEA:` / `FILE:` layout. Returns `None` when no file marker
/// is present anywhere in the reply.
fn parse_marked(reply: &str) -> Option<ParsedReply> {
    if !reply.contains(FILE_MARKER) {
        return None;
    }

    let mut sections = reply.split(FILE_MARKER);
    let idea = strip_idea_label(sections.next().unwrap_or_default());

    let mut files: Vec<GeneratedFile> = Vec::new();
    let mut rejected: Vec<RejectedFile> = Vec::new();

    for section in sections {
        let mut lines = section.lines();
        let name = lines.next().unwrap_or_default().trim();
        if name.is_empty() {
            continue;
        }

        let body = lines.collect::<Vec<_>>().join("\n");
        let content = strip_code_fence(&body);

        if let Err(reason) = validate_filename(name) {
            rejected.push(RejectedFile {
                name: name.to_string(),
                reason,
            });
            continue;
        }

        match files.iter_mut().find(|file| file.name == name) {
            Some(existing) => existing.content = content,
            None => files.push(GeneratedFile {
                name: name.to_string(),
                content,
            }),
        }
    }

    Some(ParsedReply {
        idea,
        files,
        rejected,
    })
}

/// Strip a leading `IDEA` label word (with optional colon) from the idea
/// section and trim the result.
fn strip_idea_label(section: &str) -> String {
    let trimmed = section.trim();
    let label = Regex::new(r"(?i)^idea\b\s*:?\s*").unwrap();
    label.replace(trimmed, "").trim().to_string()
}

/// Remove a Markdown code fence wrapping an entire file body.
///
/// Models add fences around file contents despite being told not to. Only a
/// fence that wraps the whole body is stripped; fences inside the content
/// are left alone.
fn strip_code_fence(body: &str) -> String {
    let trimmed = body.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return body.to_string();
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return body.to_string();
    };

    // The opening fence line may carry a language tag; drop that line.
    match inner.split_once('\n') {
        Some((_tag, content)) => content.trim_end_matches('\n').to_string(),
        None => body.to_string(),
    }
}

/// Check a filename for path hygiene before it may address a repository
/// path. Returns the rejection reason on failure.
pub fn validate_filename(name: &str) -> Result<(), String> {
    if name.starts_with('/') {
        return Err("absolute paths are not allowed".to_string());
    }
    if name.contains('\\') {
        return Err("backslashes are not allowed".to_string());
    }
    if name.split('/').any(|segment| segment == "..") {
        return Err("path traversal is not allowed".to_string());
    }

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, content: &str) -> GeneratedFile {
        GeneratedFile {
            name: name.to_string(),
            content: content.to_string(),
        }
    }

    // Marker convention

    #[test]
    fn test_marker_basic() {
        let reply = "IDEA: Calc\nFILE: index.html\n<h1>Calc</h1>\nFILE: style.css\nbody{}";
        let parsed = parse_reply(reply).unwrap();

        assert_eq!(parsed.idea, "Calc");
        assert_eq!(
            parsed.files,
            vec![
                file("index.html", "<h1>Calc</h1>"),
                file("style.css", "body{}"),
            ]
        );
        assert!(parsed.rejected.is_empty());
    }

    #[test]
    fn test_marker_three_files() {
        let reply = "IDEA: A pomodoro timer\n\
                     FILE: index.html\n<html></html>\n\
                     FILE: style.css\nbody { margin: 0; }\n\
                     FILE: script.js\nconsole.log('tick');";
        let parsed = parse_reply(reply).unwrap();

        assert_eq!(parsed.idea, "A pomodoro timer");
        assert_eq!(parsed.files.len(), 3);
        assert_eq!(parsed.files[2], file("script.js", "console.log('tick');"));
    }

    #[test]
    fn test_idea_label_variants() {
        for label in ["IDEA: Calc", "idea: Calc", "Idea Calc", "IDEA:Calc"] {
            let reply = format!("{label}\nFILE: index.html\nx");
            let parsed = parse_reply(&reply).unwrap();
            assert_eq!(parsed.idea, "Calc", "label {label:?}");
        }
    }

    #[test]
    fn test_idea_without_label_is_kept() {
        let reply = "A color mixer for designers\nFILE: index.html\nx";
        let parsed = parse_reply(reply).unwrap();
        assert_eq!(parsed.idea, "A color mixer for designers");
    }

    #[test]
    fn test_idea_label_prefix_of_word_is_not_stripped() {
        let reply = "Ideas come cheap\nFILE: index.html\nx";
        let parsed = parse_reply(reply).unwrap();
        assert_eq!(parsed.idea, "Ideas come cheap");
    }

    #[test]
    fn test_multiline_file_content() {
        let reply = "IDEA: x\nFILE: script.js\nlet a = 1;\nlet b = 2;\n\nrun();";
        let parsed = parse_reply(reply).unwrap();
        assert_eq!(
            parsed.files,
            vec![file("script.js", "let a = 1;\nlet b = 2;\n\nrun();")]
        );
    }

    #[test]
    fn test_empty_filename_section_dropped() {
        let reply = "IDEA: x\nFILE:\ncontent without a name\nFILE: style.css\nbody{}";
        let parsed = parse_reply(reply).unwrap();
        // The unnamed section is dropped, and its body is swallowed by the
        // split; only the named file survives.
        assert_eq!(parsed.files, vec![file("style.css", "body{}")]);
    }

    #[test]
    fn test_marker_with_zero_surviving_files_is_not_fatal() {
        let reply = "IDEA: An empty shell\nFILE:\n";
        let parsed = parse_reply(reply).unwrap();
        assert_eq!(parsed.idea, "An empty shell");
        assert!(parsed.files.is_empty());
        assert!(parsed.rejected.is_empty());
    }

    #[test]
    fn test_duplicate_filename_last_wins_in_place() {
        let reply = "IDEA: x\n\
                     FILE: index.html\nfirst\n\
                     FILE: style.css\nbody{}\n\
                     FILE: index.html\nsecond";
        let parsed = parse_reply(reply).unwrap();
        assert_eq!(
            parsed.files,
            vec![file("index.html", "second"), file("style.css", "body{}")]
        );
    }

    #[test]
    fn test_filename_surrounding_whitespace_trimmed() {
        let reply = "IDEA: x\nFILE:   index.html  \n<h1></h1>";
        let parsed = parse_reply(reply).unwrap();
        assert_eq!(parsed.files, vec![file("index.html", "<h1></h1>")]);
    }

    #[test]
    fn test_traversal_filename_rejected_not_fatal() {
        let reply = "IDEA: x\nFILE: ../evil.html\npwned\nFILE: index.html\nok";
        let parsed = parse_reply(reply).unwrap();

        assert_eq!(parsed.files, vec![file("index.html", "ok")]);
        assert_eq!(parsed.rejected.len(), 1);
        assert_eq!(parsed.rejected[0].name, "../evil.html");
        assert!(parsed.rejected[0].reason.contains("traversal"));
    }

    #[test]
    fn test_absolute_filename_rejected() {
        let reply = "IDEA: x\nFILE: /etc/passwd\nroot";
        let parsed = parse_reply(reply).unwrap();
        assert!(parsed.files.is_empty());
        assert_eq!(parsed.rejected[0].name, "/etc/passwd");
    }

    #[test]
    fn test_fenced_file_body_unwrapped() {
        let reply = "IDEA: x\nFILE: index.html\n```html\n<h1>Hi</h1>\n```";
        let parsed = parse_reply(reply).unwrap();
        assert_eq!(parsed.files, vec![file("index.html", "<h1>Hi</h1>")]);
    }

    #[test]
    fn test_fence_without_language_tag_unwrapped() {
        let reply = "IDEA: x\nFILE: style.css\n```\nbody{}\n```";
        let parsed = parse_reply(reply).unwrap();
        assert_eq!(parsed.files, vec![file("style.css", "body{}")]);
    }

    #[test]
    fn test_inner_fence_left_alone() {
        let reply = "IDEA: x\nFILE: index.html\n<pre>```</pre>";
        let parsed = parse_reply(reply).unwrap();
        assert_eq!(parsed.files, vec![file("index.html", "<pre>```</pre>")]);
    }

    // Structured convention

    #[test]
    fn test_structured_full_object() {
        let reply = r#"{
            "idea": "A tip calculator",
            "index.html": "<h1>Tips</h1>",
            "style.css": "body { font-family: Arial; }",
            "script.js": "console.log('hi');"
        }"#;
        let parsed = parse_reply(reply).unwrap();

        assert_eq!(parsed.idea, "A tip calculator");
        assert_eq!(
            parsed.files,
            vec![
                file("index.html", "<h1>Tips</h1>"),
                file("style.css", "body { font-family: Arial; }"),
                file("script.js", "console.log('hi');"),
            ]
        );
    }

    #[test]
    fn test_structured_missing_keys_default_empty() {
        let reply = r#"{"idea": "Minimal", "index.html": "<h1></h1>"}"#;
        let parsed = parse_reply(reply).unwrap();

        assert_eq!(
            parsed.files,
            vec![
                file("index.html", "<h1></h1>"),
                file("style.css", ""),
                file("script.js", ""),
            ]
        );
    }

    #[test]
    fn test_structured_title_and_short_aliases() {
        let reply = r#"{"title": "Snake", "html": "<canvas>", "css": "", "js": "loop()"}"#;
        let parsed = parse_reply(reply).unwrap();

        assert_eq!(parsed.idea, "Snake");
        assert_eq!(parsed.files[0], file("index.html", "<canvas>"));
        assert_eq!(parsed.files[2], file("script.js", "loop()"));
    }

    #[test]
    fn test_structured_unknown_keys_ignored() {
        let reply = r#"{"idea": "x", "model": "whatever", "tokens": 12}"#;
        let parsed = parse_reply(reply).unwrap();
        assert_eq!(parsed.idea, "x");
        assert_eq!(parsed.files.len(), 3);
    }

    #[test]
    fn test_structured_non_string_recognized_key_falls_through() {
        // "idea" is not a string, so the structured decode is rejected;
        // without a FILE: marker the whole parse fails.
        let reply = r#"{"idea": 42, "index.html": "<h1></h1>"}"#;
        assert_eq!(parse_reply(reply), Err(ParseError::UnrecognizedFormat));
    }

    #[test]
    fn test_structured_array_falls_through() {
        assert_eq!(
            parse_reply(r#"["index.html", "style.css"]"#),
            Err(ParseError::UnrecognizedFormat)
        );
    }

    #[test]
    fn test_object_without_recognized_keys_is_not_a_result() {
        assert_eq!(
            parse_reply(r#"{"error": "quota exceeded"}"#),
            Err(ParseError::UnrecognizedFormat)
        );
    }

    #[test]
    fn test_structured_tried_before_marker() {
        // A JSON object whose values contain the marker token must still be
        // read as structured data.
        let reply = r#"{"idea": "meta", "index.html": "FILE: not-a-marker"}"#;
        let parsed = parse_reply(reply).unwrap();
        assert_eq!(parsed.files[0], file("index.html", "FILE: not-a-marker"));
    }

    // Failure cases

    #[test]
    fn test_arbitrary_text_fails() {
        let reply = "I'm sorry, I can't help with generating websites today.";
        assert_eq!(parse_reply(reply), Err(ParseError::UnrecognizedFormat));
    }

    #[test]
    fn test_empty_reply_fails() {
        assert_eq!(parse_reply(""), Err(ParseError::UnrecognizedFormat));
        assert_eq!(parse_reply("   \n  "), Err(ParseError::UnrecognizedFormat));
    }

    // Filename validation

    #[test]
    fn test_validate_filename_accepts_plain_and_nested() {
        assert!(validate_filename("index.html").is_ok());
        assert!(validate_filename("assets/app.js").is_ok());
    }

    #[test]
    fn test_validate_filename_rejects_traversal_forms() {
        assert!(validate_filename("../up.html").is_err());
        assert!(validate_filename("a/../b.css").is_err());
        assert!(validate_filename("/rooted.js").is_err());
        assert!(validate_filename("windows\\style.css").is_err());
    }
}
