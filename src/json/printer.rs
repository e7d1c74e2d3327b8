use super::Value;
use std::fmt::Write as _;

const INDENT_STEP: usize = 4;

/// Pretty-prints with 4-space indentation, one entry per line, matching the
/// original's `PrintContext` scheme.
pub fn print(value: &Value, out: &mut String) {
    print_indented(value, out, 0);
}

fn print_indented(value: &Value, out: &mut String, indent: usize) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Int(n) => {
            let _ = write!(out, "{n}");
        }
        Value::Real(n) => {
            let _ = write!(out, "{n}");
        }
        Value::Str(s) => print_string(s, out),
        Value::Array(items) => print_array(items, out, indent),
        Value::Object(entries) => print_object(entries, out, indent),
    }
}

fn print_string(value: &str, out: &mut String) {
    out.push('"');
    for c in value.chars() {
        match c {
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out.push('"');
}

fn print_array(items: &[Value], out: &mut String, indent: usize) {
    if items.is_empty() {
        out.push_str("[]");
        return;
    }
    out.push_str("[\n");
    let inner = indent + INDENT_STEP;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(",\n");
        }
        push_indent(out, inner);
        print_indented(item, out, inner);
    }
    out.push('\n');
    push_indent(out, indent);
    out.push(']');
}

fn print_object(entries: &[(String, Value)], out: &mut String, indent: usize) {
    if entries.is_empty() {
        out.push_str("{}");
        return;
    }
    out.push_str("{\n");
    let inner = indent + INDENT_STEP;
    for (i, (key, val)) in entries.iter().enumerate() {
        if i > 0 {
            out.push_str(",\n");
        }
        push_indent(out, inner);
        print_string(key, out);
        out.push_str(": ");
        print_indented(val, out, inner);
    }
    out.push('\n');
    push_indent(out, indent);
    out.push('}');
}

fn push_indent(out: &mut String, n: usize) {
    for _ in 0..n {
        out.push(' ');
    }
}
