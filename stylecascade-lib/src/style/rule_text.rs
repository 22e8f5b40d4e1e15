use crate::style::library::StyleLibrary;
use crate::style::selector::{parse_selector, ParseError, Selector};
use crate::style::sheet::{Color, StyleKey, StyleSheet, StyleValue};
use log::debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("line {line}: invalid selector: {source}")]
    Selector {
        line: usize,
        #[source]
        source: ParseError,
    },
    #[error("line {line}: unknown property `{name}`")]
    UnknownProperty { line: usize, name: String },
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
}

/// Turns byte offsets into line numbers. Offsets must be asked for in
/// non-decreasing order; each byte of the source is scanned once.
struct LineCounter<'a> {
    source: &'a str,
    scanned: usize,
    line: usize,
}

impl<'a> LineCounter<'a> {
    fn new(source: &'a str) -> Self {
        LineCounter {
            source,
            scanned: 0,
            line: 1,
        }
    }

    fn line_at(&mut self, offset: usize) -> usize {
        debug_assert!(offset >= self.scanned, "line lookups must move forward");
        if offset > self.scanned {
            self.line += self.source[self.scanned..offset].matches('\n').count();
            self.scanned = offset;
        }
        self.line
    }
}

fn syntax(line: usize, message: impl Into<String>) -> LoadError {
    LoadError::Syntax {
        line,
        message: message.into(),
    }
}

/// Blanks out `/* ... */` comments, keeping line breaks so line numbers survive.
fn strip_comments(text: &str) -> Result<String, LoadError> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        let Some(len) = rest[start + 2..].find("*/") else {
            let line = out.matches('\n').count() + 1;
            return Err(syntax(line, "unterminated comment"));
        };
        let end = start + 2 + len + 2;
        out.extend(rest[start..end].chars().map(|ch| if ch == '\n' { '\n' } else { ' ' }));
        rest = &rest[end..];
    }
    out.push_str(rest);
    Ok(out)
}

fn parse_hex_color(hex: &str) -> Option<Color> {
    if !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let short = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    match hex.len() {
        3 => Some(Color::rgb(short(0)?, short(1)?, short(2)?)),
        6 => Some(Color::rgb(channel(0)?, channel(2)?, channel(4)?)),
        8 => Some(Color {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: channel(6)?,
        }),
        _ => None,
    }
}

/// Parse one property value.
///
/// `#rgb`, `#rrggbb` and `#rrggbbaa` are colors, `12px` or `12` are pixels,
/// `50%` is a scale, `true`/`false` and `auto` are themselves, and anything
/// else is kept as a keyword (surrounding quotes removed).
pub fn parse_value(text: &str) -> Option<StyleValue> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Some(hex) = text.strip_prefix('#') {
        return parse_hex_color(hex).map(StyleValue::Color);
    }
    if let Some(px) = text.strip_suffix("px") {
        return px.trim().parse().ok().map(StyleValue::Px);
    }
    if let Some(percent) = text.strip_suffix('%') {
        return percent
            .trim()
            .parse::<f32>()
            .ok()
            .filter(|p| p.is_finite())
            .map(|p| StyleValue::Scale(p / 100.0));
    }
    if let Ok(px) = text.parse::<i32>() {
        return Some(StyleValue::Px(px));
    }
    Some(match text {
        "true" => StyleValue::Bool(true),
        "false" => StyleValue::Bool(false),
        "auto" => StyleValue::Auto,
        _ => StyleValue::Keyword(text.trim_matches(|ch: char| ch == '"' || ch == '\'').to_string()),
    })
}

/// Four-sided shorthands and the longhands they expand to (top, right, bottom, left).
fn shorthand_sides(name: &str) -> Option<[StyleKey; 4]> {
    match name {
        "margin" => Some([
            StyleKey::MarginTop,
            StyleKey::MarginRight,
            StyleKey::MarginBottom,
            StyleKey::MarginLeft,
        ]),
        "padding" => Some([
            StyleKey::PaddingTop,
            StyleKey::PaddingRight,
            StyleKey::PaddingBottom,
            StyleKey::PaddingLeft,
        ]),
        _ => None,
    }
}

fn parse_declaration(sheet: &mut StyleSheet, declaration: &str, line: usize) -> Result<(), LoadError> {
    let Some((name, value)) = declaration.split_once(':') else {
        return Err(syntax(line, format!("expected `name: value`, found `{}`", declaration)));
    };
    let name = name.trim();
    let invalid = || syntax(line, format!("invalid value `{}` for `{}`", value.trim(), name));

    if let Some(sides) = shorthand_sides(name) {
        let values = value
            .split_whitespace()
            .map(parse_value)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(invalid)?;
        // CSS side order: 1 = all, 2 = vertical horizontal, 3 = top horizontal bottom.
        let pick = |side: usize| match values.len() {
            1 => Some(&values[0]),
            2 => Some(&values[side % 2]),
            3 => Some(&values[if side == 3 { 1 } else { side }]),
            4 => Some(&values[side]),
            _ => None,
        };
        for (side, key) in sides.into_iter().enumerate() {
            let value = pick(side).ok_or_else(invalid)?;
            sheet.set(key, value.clone());
        }
        return Ok(());
    }

    let Some(key) = StyleKey::from_name(name) else {
        return Err(LoadError::UnknownProperty {
            line,
            name: name.to_string(),
        });
    };
    let value = parse_value(value).ok_or_else(invalid)?;
    sheet.set(key, value);
    Ok(())
}

fn parse_block(lines: &mut LineCounter<'_>, body_start: usize, body: &str) -> Result<StyleSheet, LoadError> {
    let mut sheet = StyleSheet::new();
    let mut offset = body_start;
    for declaration in body.split(';') {
        let trimmed = declaration.trim();
        if !trimmed.is_empty() {
            let leading = declaration.len() - declaration.trim_start().len();
            parse_declaration(&mut sheet, trimmed, lines.line_at(offset + leading))?;
        }
        offset += declaration.len() + 1;
    }
    Ok(sheet)
}

/// Parse rule text into `(selector, sheet)` pairs in source order, one
/// pair per comma-separated selector.
pub fn parse_rules(text: &str) -> Result<Vec<(Selector, StyleSheet)>, LoadError> {
    let source = strip_comments(text)?;
    let mut lines = LineCounter::new(&source);
    let mut rules = Vec::new();
    let mut offset = 0;

    loop {
        let rest = &source[offset..];
        let Some(open) = rest.find('{') else {
            let trailing = rest.trim_start();
            if !trailing.is_empty() {
                let at = offset + rest.len() - trailing.len();
                return Err(syntax(lines.line_at(at), "expected `{` after selector"));
            }
            break;
        };
        let head = &rest[..open];
        let head_line = lines.line_at(offset + head.len() - head.trim_start().len());
        if head.contains('}') {
            return Err(syntax(head_line, "unexpected `}`"));
        }
        let Some(len) = rest[open + 1..].find('}') else {
            return Err(syntax(lines.line_at(offset + open), "unclosed block"));
        };
        let body = &rest[open + 1..open + 1 + len];
        if body.contains('{') {
            return Err(syntax(lines.line_at(offset + open), "nested blocks are not supported"));
        }

        let mut selectors = Vec::new();
        for part in head.split(',') {
            let text = part.split_whitespace().collect::<Vec<_>>().join(" ");
            if text.is_empty() {
                return Err(syntax(head_line, "empty selector"));
            }
            let selector = parse_selector(&text).map_err(|source| LoadError::Selector {
                line: head_line,
                source,
            })?;
            selectors.push(selector);
        }
        let sheet = parse_block(&mut lines, offset + open + 1, body)?;
        rules.extend(selectors.into_iter().map(|selector| (selector, sheet.clone())));
        offset += open + 1 + len + 1;
    }
    Ok(rules)
}

/// Load rule blocks such as
///
/// ```text
/// window .title, dialog .title { color: #333; font-size: 14px; }
/// ```
///
/// into `library`. Each comma-separated selector of a block is stored with
/// the block's declarations. The whole text is checked before anything is
/// stored, so on error the library is left untouched. Returns the number of
/// rules stored.
pub fn load_rules(library: &mut StyleLibrary, text: &str) -> Result<usize, LoadError> {
    let rules = parse_rules(text)?;
    for (selector, sheet) in &rules {
        // Parsed selectors always end in a node with at least one qualifier.
        let stored = library.put_rule(selector, sheet);
        debug_assert!(stored, "parsed selector `{}` has no index key", selector);
    }
    debug!("loaded {} rules", rules.len());
    Ok(rules.len())
}
