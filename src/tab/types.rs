use serde::Serialize;

use super::grammar;

/// A named particle system: an ordered list of emitters.
/// Emitter order is load order and is preserved on save.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemSpec {
    pub name: String,
    pub emitters: Vec<EmitterSpec>,
}

impl SystemSpec {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            emitters: Vec::new(),
        }
    }
}

/// One emitter of a particle system: a named bag of typed fields.
/// Field order is insertion order and drives serialization order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmitterSpec {
    pub name: String,
    fields: Vec<(&'static str, FieldValue)>,
}

impl EmitterSpec {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fields: Vec::new(),
        }
    }

    /// Every grammar field set to its default, in grammar declaration order
    pub fn with_defaults(name: &str) -> Self {
        let mut emitter = Self::new(name);
        for def in grammar::FIELDS {
            emitter.fields.push((def.key, def.default_value()));
        }
        emitter
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> + '_ {
        self.fields.iter().map(|(key, value)| (*key, value))
    }

    /// Case-insensitive field lookup
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut FieldValue> {
        self.fields
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    /// Value of `name`, or the grammar default if the field is absent.
    /// None if the grammar doesn't know the field at all.
    pub fn field_or_default(&self, name: &str) -> Option<FieldValue> {
        self.field(name)
            .cloned()
            .or_else(|| grammar::lookup(name).map(|def| def.default_value()))
    }

    /// Caller must have type-checked `value` against the grammar; the parser
    /// and `with_defaults` are the only producers.
    pub(crate) fn push_field(&mut self, key: &'static str, value: FieldValue) {
        self.fields.push((key, value));
    }
}

/// A typed field value. Always agrees with the kind declared by the field's
/// grammar entry; the parser enforces this at tokenization time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FieldValue {
    Int(i64),
    Float(f32),
    Str(String),
    /// Canonical casing of one of the field's allowed tokens
    Enum(&'static str),
    Vector(Vec<f32>),
    Keyframes(Vec<Keyframe>),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
}
