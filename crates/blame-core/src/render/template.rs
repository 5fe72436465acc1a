//! printf-style templates.
//!
//! `%s` prints the argument as text, `%d`/`%i`/`%f` as a number, `%j`/`%o`/`%O`
//! as JSON and `%%` as a literal percent sign. Placeholders without a matching
//! argument are left as written; arguments without a placeholder are appended,
//! separated by spaces.

use serde_json::Value;

/// Substitute `args` into `template`.
pub fn format(template: &str, args: &[Value]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('%') => {
                chars.next();
                out.push('%');
            }
            Some(spec @ ('s' | 'd' | 'i' | 'f' | 'j' | 'o' | 'O')) => match args.next() {
                Some(arg) => {
                    chars.next();
                    out.push_str(&render(spec, arg));
                }
                None => out.push('%'),
            },
            _ => out.push('%'),
        }
    }

    for arg in args {
        out.push(' ');
        out.push_str(&display(arg));
    }
    out
}

/// Render console arguments the way `console.log` does: a leading string is
/// used as the template for the rest.
pub fn format_values(args: &[Value]) -> String {
    match args.split_first() {
        Some((Value::String(first), rest)) => format(first, rest),
        _ => args.iter().map(display).collect::<Vec<_>>().join(" "),
    }
}

/// Left-align `value` in a column of `width` characters.
pub fn pad_end(width: usize, value: impl std::fmt::Display) -> String {
    format!("{value:<width$}")
}

fn render(spec: char, arg: &Value) -> String {
    match (spec, arg) {
        ('s', _) => display(arg),
        ('i', Value::Number(n)) => match n.as_f64() {
            Some(f) if n.as_i64().is_none() && n.as_u64().is_none() => f.trunc().to_string(),
            _ => n.to_string(),
        },
        ('d' | 'f', Value::Number(n)) => n.to_string(),
        ('d' | 'i' | 'f', Value::Bool(b)) => u8::from(*b).to_string(),
        // Pre-rendered numbers (e.g. padded line numbers) arrive as strings.
        ('d' | 'i' | 'f', Value::String(s)) => s.clone(),
        ('d' | 'i' | 'f', _) => "NaN".to_string(),
        _ => arg.to_string(),
    }
}

fn display(arg: &Value) -> String {
    match arg {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
