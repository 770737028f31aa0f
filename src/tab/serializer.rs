use super::{
    grammar,
    types::{EmitterSpec, SystemSpec},
};

fn write_emitter(out: &mut String, spec: &EmitterSpec, indent: &str) {
    out.push_str(&format!("{indent}Emitter: {}\n", spec.name));
    for (key, value) in spec.fields() {
        out.push_str(&format!(
            "{indent}  {key} = {}\n",
            grammar::format_value(value)
        ));
    }
}

/// Canonical text for one emitter, the clipboard fragment payload. Fields are
/// emitted in insertion order, so re-parsed text keeps the author's order.
/// `owner` embeds the owning system's name as a comment line the fragment
/// parser skips and [`super::parser::fragment_owner`] recovers.
pub fn format_emitter(spec: &EmitterSpec, owner: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(owner) = owner {
        out.push_str(&format!("# system: {owner}\n"));
    }
    write_emitter(&mut out, spec, "");
    out
}

/// Canonical text for one system and all its emitters, in order
pub fn format_system(spec: &SystemSpec) -> String {
    let mut out = format!("System: {}\n", spec.name);
    for emitter in &spec.emitters {
        write_emitter(&mut out, emitter, "  ");
    }
    out
}

/// Canonical text for a whole file: systems in sequence, separated by a
/// blank line
pub fn format_file(specs: &[SystemSpec]) -> String {
    let mut out = String::new();
    for (i, spec) in specs.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format_system(spec));
    }
    out
}
