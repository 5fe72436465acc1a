use serde_json::Value;

use crate::config::Options;
use crate::model::Frame;

use super::style::Style;
use super::template;

/// The location line for `frame`, formatted with `path_format`.
pub fn location_line(options: &Options, frame: &Frame, colors: bool) -> String {
    let text = template::format(
        &options.path_format,
        &[
            Value::from(frame.file.as_str()),
            Value::from(frame.line),
            Value::from(frame.column),
        ],
    );
    Style::Accent.paint(&text, colors)
}

/// One line per row of the frame's source window, formatted with
/// `line_format`. The row for `frame.line` is highlighted.
///
/// Empty when sources are disabled or the frame carries no window.
pub fn source_lines(options: &Options, frame: &Frame, colors: bool) -> Vec<String> {
    if !options.sources {
        return Vec::new();
    }
    let Some(window) = &frame.source else {
        return Vec::new();
    };

    let width = window
        .last_line()
        .map(|n| n.to_string().len())
        .unwrap_or_default();

    window
        .iter()
        .map(|(number, code)| {
            let text = template::format(
                &options.line_format,
                &[
                    Value::from(template::pad_end(width, number)),
                    Value::from(code),
                ],
            );
            let style = if number == frame.line {
                Style::Highlight
            } else {
                Style::Plain
            };
            style.paint(&text, colors)
        })
        .collect()
}
