use crate::config::LayoutConfig;
use crate::theme::Theme;

use super::TextBlock;

pub(super) fn measure_label(text: &str, theme: &Theme, config: &LayoutConfig) -> TextBlock {
    let font_size = theme.font_size;
    let max_width = config.max_label_width_chars.max(1) as f32 * font_size * 0.56;

    let mut lines = Vec::new();
    for raw in text.split('\n') {
        lines.extend(wrap_line(raw.trim(), max_width, font_size));
    }
    if lines.is_empty() {
        lines.push(String::new());
    }

    let width = lines
        .iter()
        .map(|line| text_width(line, font_size))
        .fold(0.0, f32::max);
    let height = lines.len() as f32 * font_size * config.label_line_height;

    TextBlock {
        lines,
        width,
        height,
    }
}

pub(super) fn wrap_line(line: &str, max_width: f32, font_size: f32) -> Vec<String> {
    if text_width(line, font_size) <= max_width {
        return vec![line.to_string()];
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if text_width(&candidate, font_size) > max_width && !current.is_empty() {
            lines.push(current);
            current = word.to_string();
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

pub(super) fn text_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(char_width_factor).sum::<f32>() * font_size
}

/// Approximate advance widths for a metric-compatible sans stack, as a
/// fraction of the font size. Fixed table keeps layout identical on every
/// machine; no font files are consulted.
pub(super) fn char_width_factor(ch: char) -> f32 {
    match ch {
        ' ' => 0.31,
        '.' | ',' | ':' | ';' | '!' | '|' | '(' | ')' | '[' | ']' | '{' | '}' | '\'' => 0.32,
        'i' | 'j' | 'l' => 0.24,
        'f' | 't' | 'r' => 0.34,
        'I' => 0.28,
        'm' | 'w' => 0.84,
        'M' | 'W' => 0.93,
        '@' | '#' | '%' | '&' => 0.94,
        'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' => 0.53,
        'J' | 'L' => 0.56,
        'E' | 'F' | 'T' | 'Z' => 0.60,
        'A' | 'B' | 'K' | 'P' | 'R' | 'S' | 'V' | 'X' | 'Y' => 0.64,
        'C' | 'D' | 'G' | 'H' | 'N' | 'O' | 'Q' | 'U' => 0.74,
        '0'..='9' => 0.60,
        _ => 0.58,
    }
}
