use nom::{
    Parser,
    bytes::complete::tag_no_case,
    character::complete::{char as C, space0},
    combinator::{all_consuming, rest},
    sequence::preceded,
};

use super::{
    error::FormatError,
    grammar,
    types::{EmitterSpec, SystemSpec},
};

/// One significant input line, carrying its 1-based source line number
#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    no: usize,
    text: &'a str,
}

#[derive(Debug, Clone, Copy)]
enum LineKind<'a> {
    System(&'a str),
    Emitter(&'a str),
    Field { key: &'a str, raw: &'a str },
}

/// Trimmed, non-blank, non-comment lines. A line whose first significant
/// character is `#` is a comment; inline `#` is value content.
fn significant_lines(contents: &str) -> Vec<Line<'_>> {
    let contents = contents.strip_prefix('\u{feff}').unwrap_or(contents);

    contents
        .lines()
        .enumerate()
        .map(|(i, raw)| Line {
            no: i + 1,
            text: raw.trim(),
        })
        .filter(|line| !line.text.is_empty() && !line.text.starts_with('#'))
        .collect()
}

/// `<keyword>: <name>`, keyword matched case-insensitively
fn header<'a>(
    keyword: &'static str,
) -> impl Parser<&'a str, Output = &'a str, Error = nom::error::Error<&'a str>> {
    preceded((tag_no_case(keyword), space0, C(':')), rest).map(str::trim)
}

fn malformed(line: &Line, context: &str) -> FormatError {
    FormatError::MalformedSection {
        line: line.no,
        context: context.to_string(),
    }
}

fn classify<'a>(line: &Line<'a>) -> Result<LineKind<'a>, FormatError> {
    if let Ok((_, name)) = all_consuming(header("system")).parse(line.text) {
        if name.is_empty() {
            return Err(malformed(line, "system header is missing a name"));
        }
        return Ok(LineKind::System(name));
    }

    if let Ok((_, name)) = all_consuming(header("emitter")).parse(line.text) {
        if name.is_empty() {
            return Err(malformed(line, "emitter header is missing a name"));
        }
        return Ok(LineKind::Emitter(name));
    }

    if let Some((key, raw)) = line.text.split_once('=') {
        let key = key.trim();
        if key.is_empty() {
            return Err(malformed(line, "field line is missing a key"));
        }
        return Ok(LineKind::Field {
            key,
            raw: raw.trim(),
        });
    }

    Err(malformed(
        line,
        &format!("unrecognized line `{}`", line.text),
    ))
}

/// Resolve a field line against the grammar and append it to the emitter.
/// Unknown keys and duplicates are hard failures.
fn apply_field(
    emitter: &mut EmitterSpec,
    key: &str,
    raw: &str,
    line_no: usize,
) -> Result<(), FormatError> {
    let def = grammar::lookup(key).ok_or_else(|| FormatError::UnknownField {
        line: line_no,
        key: key.to_string(),
    })?;

    if emitter.field(def.key).is_some() {
        return Err(FormatError::MalformedSection {
            line: line_no,
            context: format!("duplicate field `{}`", def.key),
        });
    }

    let value = def
        .tokenize(raw)
        .map_err(|e| FormatError::from_value(def.key, line_no, e))?;
    emitter.push_field(def.key, value);

    Ok(())
}

/// Parse a whole `.tab` file: zero or more `System:` blocks, each holding
/// zero or more `Emitter:` blocks. All-or-nothing: any error aborts the
/// parse with no partial result.
pub fn parse_file_str(contents: &str) -> Result<Vec<SystemSpec>, FormatError> {
    let lines = significant_lines(contents);

    let mut systems: Vec<SystemSpec> = Vec::new();
    let mut system: Option<SystemSpec> = None;
    let mut emitter: Option<EmitterSpec> = None;

    for line in &lines {
        match classify(line)? {
            LineKind::System(name) => {
                // An emitter is only appended once fully parsed
                if let (Some(em), Some(sys)) = (emitter.take(), system.as_mut()) {
                    sys.emitters.push(em);
                }
                if let Some(sys) = system.take() {
                    systems.push(sys);
                }
                system = Some(SystemSpec::new(name));
            }
            LineKind::Emitter(name) => {
                if system.is_none() {
                    return Err(malformed(line, "emitter block outside of a system"));
                }
                if let (Some(em), Some(sys)) = (emitter.take(), system.as_mut()) {
                    sys.emitters.push(em);
                }
                emitter = Some(EmitterSpec::new(name));
            }
            LineKind::Field { key, raw } => {
                let Some(em) = emitter.as_mut() else {
                    return Err(malformed(line, "field line outside of an emitter block"));
                };
                apply_field(em, key, raw, line.no)?;
            }
        }
    }

    if let (Some(em), Some(sys)) = (emitter.take(), system.as_mut()) {
        sys.emitters.push(em);
    }
    if let Some(sys) = system.take() {
        systems.push(sys);
    }

    Ok(systems)
}

/// Parse a standalone emitter fragment (the clipboard payload): exactly one
/// `Emitter:` block, no enclosing `System:` line
pub fn parse_emitter_fragment(contents: &str) -> Result<EmitterSpec, FormatError> {
    let lines = significant_lines(contents);
    let mut iter = lines.iter();

    let Some(first) = iter.next() else {
        return Err(FormatError::UnexpectedEof {
            context: "expected an emitter block",
        });
    };

    let mut emitter = match classify(first)? {
        LineKind::Emitter(name) => EmitterSpec::new(name),
        LineKind::System(_) => {
            return Err(malformed(first, "fragment must not contain a system header"));
        }
        LineKind::Field { .. } => {
            return Err(malformed(first, "expected an emitter header"));
        }
    };

    for line in iter {
        match classify(line)? {
            LineKind::Field { key, raw } => apply_field(&mut emitter, key, raw, line.no)?,
            LineKind::Emitter(_) | LineKind::System(_) => {
                return Err(malformed(
                    line,
                    "fragment must contain exactly one emitter block",
                ));
            }
        }
    }

    Ok(emitter)
}

/// Owning system name embedded in a fragment by the serializer, if any.
/// Looks for a `# system: <name>` comment line before the emitter block.
pub fn fragment_owner(contents: &str) -> Option<&str> {
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let comment = line.strip_prefix('#')?.trim();
        if let Some((keyword, name)) = comment.split_once(':') {
            if keyword.trim().eq_ignore_ascii_case("system") {
                return Some(name.trim());
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::{FormatError, parse_emitter_fragment, parse_file_str};
    use crate::tab::{
        serializer::format_emitter,
        types::{FieldValue, Keyframe},
    };

    const FIRE: &str = "System: Fire\n  Emitter: Base\n    Rate = 10\n    Color = 1.0, 0.5, 0.0\n";

    #[test]
    fn test_parse_single_system() {
        let systems = parse_file_str(FIRE).unwrap();

        assert_eq!(systems.len(), 1);
        assert_eq!(systems[0].name, "Fire");
        assert_eq!(systems[0].emitters.len(), 1);

        let emitter = &systems[0].emitters[0];
        assert_eq!(emitter.name, "Base");
        assert_eq!(emitter.field("Rate"), Some(&FieldValue::Int(10)));
        assert_eq!(
            emitter.field("Color"),
            Some(&FieldValue::Vector(vec![1.0, 0.5, 0.0]))
        );
    }

    #[test]
    fn test_parse_preserves_order() {
        let text = "System: A\n  Emitter: x\n  Emitter: y\nSystem: B\n  Emitter: z\n";

        let systems = parse_file_str(text).unwrap();

        assert_eq!(systems.len(), 2);
        assert_eq!(systems[0].name, "A");
        assert_eq!(systems[1].name, "B");
        let names: Vec<_> = systems[0].emitters.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["x", "y"]);
        assert_eq!(systems[1].emitters[0].name, "z");
    }

    #[test]
    fn test_parse_empty_input() {
        assert_eq!(parse_file_str("").unwrap(), vec![]);
        assert_eq!(parse_file_str("\n\n# just a comment\n").unwrap(), vec![]);
    }

    #[test]
    fn test_comments_and_blanks_skipped() {
        let text = "# particle definitions\n\nSystem: Fire\n\n  # base layer\n  Emitter: Base\n    Rate = 10\n";

        let systems = parse_file_str(text).unwrap();

        assert_eq!(systems[0].emitters[0].field("Rate"), Some(&FieldValue::Int(10)));
    }

    #[test]
    fn test_keywords_case_insensitive() {
        let text = "SYSTEM: Fire\n  emitter: Base\n    rate = 10\n";

        let systems = parse_file_str(text).unwrap();

        assert_eq!(systems[0].name, "Fire");
        // Canonical key casing is restored on lookup
        assert_eq!(systems[0].emitters[0].field("Rate"), Some(&FieldValue::Int(10)));
    }

    #[test]
    fn test_field_outside_emitter() {
        let err = parse_file_str("System: Fire\n  Rate = 10\n").unwrap_err();

        assert_eq!(
            err,
            FormatError::MalformedSection {
                line: 2,
                context: "field line outside of an emitter block".to_string(),
            }
        );
    }

    #[test]
    fn test_emitter_outside_system() {
        let err = parse_file_str("Emitter: Base\n  Rate = 10\n").unwrap_err();

        assert_eq!(
            err,
            FormatError::MalformedSection {
                line: 1,
                context: "emitter block outside of a system".to_string(),
            }
        );
    }

    #[test]
    fn test_header_missing_name() {
        let err = parse_file_str("System:\n").unwrap_err();

        assert_eq!(
            err,
            FormatError::MalformedSection {
                line: 1,
                context: "system header is missing a name".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_field_rejected() {
        let text = "System: Fire\n  Emitter: Base\n    Sparkle = 3\n";

        let err = parse_file_str(text).unwrap_err();

        assert_eq!(
            err,
            FormatError::UnknownField {
                line: 3,
                key: "Sparkle".to_string(),
            }
        );
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let text = "System: Fire\n  Emitter: Base\n    Rate = 10\n    rate = 20\n";

        let err = parse_file_str(text).unwrap_err();

        assert_eq!(
            err,
            FormatError::MalformedSection {
                line: 4,
                context: "duplicate field `Rate`".to_string(),
            }
        );
    }

    #[test]
    fn test_type_mismatch_never_substitutes_default() {
        let text = "System: Fire\n  Emitter: Base\n    Delay = abc\n";

        let err = parse_file_str(text).unwrap_err();

        assert_eq!(
            err,
            FormatError::TypeMismatch {
                line: 3,
                field: "Delay",
                expected: "a float".to_string(),
                token: "abc".to_string(),
            }
        );
    }

    #[test]
    fn test_arity_mismatch() {
        let text = "System: Fire\n  Emitter: Base\n    Color = 1.0, 0.5\n";

        let err = parse_file_str(text).unwrap_err();

        assert_eq!(
            err,
            FormatError::ArityMismatch {
                line: 3,
                field: "Color",
                expected: 3,
                got: 2,
            }
        );
    }

    #[test]
    fn test_unordered_keyframes() {
        let text = "System: Fire\n  Emitter: Base\n    Scale = (1, 1) (0, 2)\n";

        let err = parse_file_str(text).unwrap_err();

        assert_eq!(
            err,
            FormatError::UnorderedKeyframes {
                line: 3,
                field: "Scale",
                prev: 1.0,
                next: 0.0,
            }
        );
    }

    #[test]
    fn test_all_or_nothing() {
        // One malformed emitter among well-formed ones: zero systems returned
        let text = "System: A\n  Emitter: a\n    Rate = 1\nSystem: B\n  Emitter: b\n    Rate = x\nSystem: C\n  Emitter: c\n    Rate = 3\n";

        let result = parse_file_str(text);

        assert!(matches!(result, Err(FormatError::TypeMismatch { line: 6, .. })));
    }

    #[test]
    fn test_fragment_roundtrip() {
        let fragment =
            "Emitter: Base\n  Rate = 10\n  BlendMode = add\n  Scale = (0, 1) (1, 2)\n";

        let emitter = parse_emitter_fragment(fragment).unwrap();
        assert_eq!(emitter.field("BlendMode"), Some(&FieldValue::Enum("Add")));
        assert_eq!(
            emitter.field("Scale"),
            Some(&FieldValue::Keyframes(vec![
                Keyframe { time: 0.0, value: 1.0 },
                Keyframe { time: 1.0, value: 2.0 },
            ]))
        );

        let reparsed = parse_emitter_fragment(&format_emitter(&emitter, None)).unwrap();
        assert_eq!(reparsed, emitter);
    }

    #[test]
    fn test_fragment_rejects_system_header() {
        let err = parse_emitter_fragment(FIRE).unwrap_err();

        assert_eq!(
            err,
            FormatError::MalformedSection {
                line: 1,
                context: "fragment must not contain a system header".to_string(),
            }
        );
    }

    #[test]
    fn test_fragment_rejects_second_block() {
        let text = "Emitter: a\n  Rate = 1\nEmitter: b\n";

        let err = parse_emitter_fragment(text).unwrap_err();

        assert_eq!(
            err,
            FormatError::MalformedSection {
                line: 3,
                context: "fragment must contain exactly one emitter block".to_string(),
            }
        );
    }

    #[test]
    fn test_fragment_empty() {
        let err = parse_emitter_fragment("  \n# nothing here\n").unwrap_err();

        assert_eq!(
            err,
            FormatError::UnexpectedEof {
                context: "expected an emitter block",
            }
        );
    }

    #[test]
    fn test_fragment_allows_empty_emitter() {
        let emitter = parse_emitter_fragment("Emitter: Bare\n").unwrap();

        assert_eq!(emitter.name, "Bare");
        assert_eq!(emitter.fields().count(), 0);
    }
}
