use nom::{
    IResult, Parser,
    branch::alt,
    character::complete::{char as C, i64 as I, space0, space1},
    combinator::all_consuming,
    multi::separated_list1,
    number::complete::float,
    sequence::{delimited, separated_pair},
};
use thiserror::Error;

use super::types::{FieldValue, Keyframe};

/// Value kind of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Int,
    Float,
    Str,
    /// Allowed tokens in canonical casing
    Enum(&'static [&'static str]),
    /// Fixed number of floats
    Vector(usize),
    /// `(time, value)` pairs, times non-decreasing
    Keyframes,
}

/// One entry of the field table
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    /// Canonical field name
    pub key: &'static str,
    pub kind: FieldKind,
    /// Canonical token used when the field is absent
    pub default: &'static str,
}

/// A raw token run that does not tokenize as its field's declared kind
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("expected {expected}, got `{token}`")]
    Invalid { expected: String, token: String },
    #[error("expected {expected} components, got {got}")]
    Arity { expected: usize, got: usize },
    #[error("keyframe times must be non-decreasing ({prev} followed by {next})")]
    Unordered { prev: f32, next: f32 },
}

const EMITTER_SPACES: &[&str] = &[
    "World",
    "ObjectPos",
    "ObjectYpr",
    "NodePos",
    "NodeYpr",
    "Bones",
];
const PARTICLE_SPACES: &[&str] = &["World", "SameAsEmitter"];
const PARTICLE_TYPES: &[&str] = &["Point", "Sprite", "Disc", "Model"];
const BLEND_MODES: &[&str] = &["Blend", "Add", "Subtract", "Multiply"];

/// The closed field table. Keys are canonical casing, lookup is
/// case-insensitive. Unknown keys are a parse failure, never dropped.
pub static FIELDS: &[FieldDef] = &[
    FieldDef {
        key: "Delay",
        kind: FieldKind::Float,
        default: "0",
    },
    FieldDef {
        key: "Lifespan",
        kind: FieldKind::Float,
        default: "1",
    },
    FieldDef {
        key: "ParticleLifespan",
        kind: FieldKind::Float,
        default: "1",
    },
    FieldDef {
        key: "Rate",
        kind: FieldKind::Int,
        default: "10",
    },
    FieldDef {
        key: "MaxParticles",
        kind: FieldKind::Int,
        default: "100",
    },
    FieldDef {
        key: "Material",
        kind: FieldKind::Str,
        default: "",
    },
    FieldDef {
        key: "AnimName",
        kind: FieldKind::Str,
        default: "",
    },
    FieldDef {
        key: "EmitterSpace",
        kind: FieldKind::Enum(EMITTER_SPACES),
        default: "World",
    },
    FieldDef {
        key: "ParticleSpace",
        kind: FieldKind::Enum(PARTICLE_SPACES),
        default: "SameAsEmitter",
    },
    FieldDef {
        key: "ParticleType",
        kind: FieldKind::Enum(PARTICLE_TYPES),
        default: "Sprite",
    },
    FieldDef {
        key: "BlendMode",
        kind: FieldKind::Enum(BLEND_MODES),
        default: "Add",
    },
    FieldDef {
        key: "Offset",
        kind: FieldKind::Vector(3),
        default: "0, 0, 0",
    },
    FieldDef {
        key: "Velocity",
        kind: FieldKind::Vector(3),
        default: "0, 0, 0",
    },
    FieldDef {
        key: "Acceleration",
        kind: FieldKind::Vector(3),
        default: "0, 0, 0",
    },
    FieldDef {
        key: "Color",
        kind: FieldKind::Vector(3),
        default: "1, 1, 1",
    },
    FieldDef {
        key: "Scale",
        kind: FieldKind::Keyframes,
        default: "(0, 1)",
    },
    FieldDef {
        key: "Alpha",
        kind: FieldKind::Keyframes,
        default: "(0, 1)",
    },
    FieldDef {
        key: "Rotation",
        kind: FieldKind::Keyframes,
        default: "(0, 0)",
    },
];

/// Case-insensitive lookup against the field table
pub fn lookup(name: &str) -> Option<&'static FieldDef> {
    FIELDS.iter().find(|def| def.key.eq_ignore_ascii_case(name))
}

/// Signed decimal integer, standard lexical rules
fn int_literal(input: &str) -> IResult<&str, i64> {
    I(input)
}

/// Float literal, standard lexical rules
fn float_literal(input: &str) -> IResult<&str, f32> {
    float(input)
}

/// Separator between numbers: a comma with optional surrounding spaces, or
/// plain whitespace
fn num_sep<'a>() -> impl Parser<&'a str, Output = (), Error = nom::error::Error<&'a str>> {
    alt((
        delimited(space0, C(','), space0).map(|_| ()),
        space1.map(|_| ()),
    ))
}

/// `(time, value)`
fn keyframe<'a>() -> impl Parser<&'a str, Output = Keyframe, Error = nom::error::Error<&'a str>> {
    delimited(
        (C('('), space0),
        separated_pair(float_literal, delimited(space0, C(','), space0), float_literal),
        (space0, C(')')),
    )
    .map(|(time, value)| Keyframe { time, value })
}

impl FieldDef {
    /// Parse a raw token run into a typed value
    pub fn tokenize(&self, raw: &str) -> Result<FieldValue, ValueError> {
        let raw = raw.trim();
        match self.kind {
            FieldKind::Int => all_consuming(int_literal)
                .parse(raw)
                .map(|(_, value)| FieldValue::Int(value))
                .map_err(|_| self.invalid(raw)),
            FieldKind::Float => all_consuming(float_literal)
                .parse(raw)
                .map(|(_, value)| FieldValue::Float(value))
                .map_err(|_| self.invalid(raw)),
            FieldKind::Str => Ok(FieldValue::Str(raw.to_string())),
            FieldKind::Enum(allowed) => allowed
                .iter()
                .copied()
                .find(|token| token.eq_ignore_ascii_case(raw))
                .map(FieldValue::Enum)
                .ok_or_else(|| self.invalid(raw)),
            FieldKind::Vector(arity) => {
                let (_, components) = all_consuming(separated_list1(num_sep(), float_literal))
                    .parse(raw)
                    .map_err(|_| self.invalid(raw))?;

                if components.len() != arity {
                    return Err(ValueError::Arity {
                        expected: arity,
                        got: components.len(),
                    });
                }

                Ok(FieldValue::Vector(components))
            }
            FieldKind::Keyframes => {
                let (_, frames) = all_consuming(separated_list1(num_sep(), keyframe()))
                    .parse(raw)
                    .map_err(|_| self.invalid(raw))?;

                for pair in frames.windows(2) {
                    if pair[1].time < pair[0].time {
                        return Err(ValueError::Unordered {
                            prev: pair[0].time,
                            next: pair[1].time,
                        });
                    }
                }

                Ok(FieldValue::Keyframes(frames))
            }
        }
    }

    /// Typed default for this field
    pub fn default_value(&self) -> FieldValue {
        match self.tokenize(self.default) {
            Ok(value) => value,
            // Table defaults are canonical tokens, see test_defaults_tokenize
            Err(_) => unreachable!("invalid default token for `{}`", self.key),
        }
    }

    fn invalid(&self, token: &str) -> ValueError {
        ValueError::Invalid {
            expected: self.kind.expected(),
            token: token.to_string(),
        }
    }
}

impl FieldKind {
    fn expected(&self) -> String {
        match self {
            FieldKind::Int => "an integer".to_string(),
            FieldKind::Float => "a float".to_string(),
            FieldKind::Str => "a string".to_string(),
            FieldKind::Enum(allowed) => format!("one of {}", allowed.join(" | ")),
            FieldKind::Vector(arity) => format!("{arity} floats"),
            FieldKind::Keyframes => "a list of (time, value) keyframes".to_string(),
        }
    }
}

/// Canonical token text for a value, the exact inverse of [`FieldDef::tokenize`]
/// for every value `tokenize` can produce
pub fn format_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Int(v) => v.to_string(),
        FieldValue::Float(v) => v.to_string(),
        FieldValue::Str(s) => s.clone(),
        FieldValue::Enum(token) => (*token).to_string(),
        FieldValue::Vector(components) => components
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", "),
        FieldValue::Keyframes(frames) => frames
            .iter()
            .map(|frame| format!("({}, {})", frame.time, frame.value))
            .collect::<Vec<_>>()
            .join(" "),
    }
}
