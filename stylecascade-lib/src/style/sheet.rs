use std::fmt;

/// Closed set of style properties. The discriminant is the slot index in a [`StyleSheet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StyleKey {
    Display,
    Visible,
    Opacity,
    Left,
    Top,
    Right,
    Bottom,
    Width,
    Height,
    MinWidth,
    MinHeight,
    MaxWidth,
    MaxHeight,
    MarginTop,
    MarginRight,
    MarginBottom,
    MarginLeft,
    PaddingTop,
    PaddingRight,
    PaddingBottom,
    PaddingLeft,
    BorderWidth,
    BorderStyle,
    BorderColor,
    BorderRadius,
    BackgroundColor,
    BackgroundImage,
    Color,
    FontSize,
    FontFamily,
    FontWeight,
    TextAlign,
    LineHeight,
}

/// Number of slots in every [`StyleSheet`].
pub const STYLE_KEY_TOTAL: usize = StyleKey::ALL.len();

impl StyleKey {
    /// Every key, in slot order.
    pub const ALL: [StyleKey; 33] = [
        StyleKey::Display,
        StyleKey::Visible,
        StyleKey::Opacity,
        StyleKey::Left,
        StyleKey::Top,
        StyleKey::Right,
        StyleKey::Bottom,
        StyleKey::Width,
        StyleKey::Height,
        StyleKey::MinWidth,
        StyleKey::MinHeight,
        StyleKey::MaxWidth,
        StyleKey::MaxHeight,
        StyleKey::MarginTop,
        StyleKey::MarginRight,
        StyleKey::MarginBottom,
        StyleKey::MarginLeft,
        StyleKey::PaddingTop,
        StyleKey::PaddingRight,
        StyleKey::PaddingBottom,
        StyleKey::PaddingLeft,
        StyleKey::BorderWidth,
        StyleKey::BorderStyle,
        StyleKey::BorderColor,
        StyleKey::BorderRadius,
        StyleKey::BackgroundColor,
        StyleKey::BackgroundImage,
        StyleKey::Color,
        StyleKey::FontSize,
        StyleKey::FontFamily,
        StyleKey::FontWeight,
        StyleKey::TextAlign,
        StyleKey::LineHeight,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Property name as written in rule text.
    pub fn name(self) -> &'static str {
        match self {
            StyleKey::Display => "display",
            StyleKey::Visible => "visible",
            StyleKey::Opacity => "opacity",
            StyleKey::Left => "left",
            StyleKey::Top => "top",
            StyleKey::Right => "right",
            StyleKey::Bottom => "bottom",
            StyleKey::Width => "width",
            StyleKey::Height => "height",
            StyleKey::MinWidth => "min-width",
            StyleKey::MinHeight => "min-height",
            StyleKey::MaxWidth => "max-width",
            StyleKey::MaxHeight => "max-height",
            StyleKey::MarginTop => "margin-top",
            StyleKey::MarginRight => "margin-right",
            StyleKey::MarginBottom => "margin-bottom",
            StyleKey::MarginLeft => "margin-left",
            StyleKey::PaddingTop => "padding-top",
            StyleKey::PaddingRight => "padding-right",
            StyleKey::PaddingBottom => "padding-bottom",
            StyleKey::PaddingLeft => "padding-left",
            StyleKey::BorderWidth => "border-width",
            StyleKey::BorderStyle => "border-style",
            StyleKey::BorderColor => "border-color",
            StyleKey::BorderRadius => "border-radius",
            StyleKey::BackgroundColor => "background-color",
            StyleKey::BackgroundImage => "background-image",
            StyleKey::Color => "color",
            StyleKey::FontSize => "font-size",
            StyleKey::FontFamily => "font-family",
            StyleKey::FontWeight => "font-weight",
            StyleKey::TextAlign => "text-align",
            StyleKey::LineHeight => "line-height",
        }
    }

    pub fn from_name(name: &str) -> Option<StyleKey> {
        StyleKey::ALL.into_iter().find(|key| key.name() == name)
    }
}

impl fmt::Display for StyleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// A typed property value.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    Px(i32),
    /// Fraction of the reference size, `0.5` for `50%`.
    Scale(f32),
    Color(Color),
    Bool(bool),
    Keyword(String),
    Auto,
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Px(px) => write!(f, "{}px", px),
            StyleValue::Scale(scale) => write!(f, "{}%", scale * 100.0),
            StyleValue::Color(color) => write!(f, "{}", color),
            StyleValue::Bool(value) => write!(f, "{}", value),
            StyleValue::Keyword(word) => f.write_str(word),
            StyleValue::Auto => f.write_str("auto"),
        }
    }
}

/// Fixed-size property table. A slot holding `Some` is valid.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSheet {
    slots: [Option<StyleValue>; STYLE_KEY_TOTAL],
}

impl Default for StyleSheet {
    fn default() -> Self {
        StyleSheet::new()
    }
}

impl StyleSheet {
    /// A sheet with every slot invalid.
    pub fn new() -> Self {
        StyleSheet {
            slots: std::array::from_fn(|_| None),
        }
    }

    pub fn get(&self, key: StyleKey) -> Option<&StyleValue> {
        self.slots[key.index()].as_ref()
    }

    pub fn set(&mut self, key: StyleKey, value: StyleValue) -> &mut Self {
        self.slots[key.index()] = Some(value);
        self
    }

    pub fn unset(&mut self, key: StyleKey) -> Option<StyleValue> {
        self.slots[key.index()].take()
    }

    pub fn is_valid(&self, key: StyleKey) -> bool {
        self.slots[key.index()].is_some()
    }

    pub fn valid_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.valid_count() == 0
    }

    /// Valid slots in key order.
    pub fn iter(&self) -> impl Iterator<Item = (StyleKey, &StyleValue)> {
        StyleKey::ALL
            .iter()
            .zip(self.slots.iter())
            .filter_map(|(key, slot)| slot.as_ref().map(|value| (*key, value)))
    }

    /// ADD-merge: fill only the slots still invalid here. The first value
    /// seen for a property wins.
    pub fn merge(&mut self, source: &StyleSheet) {
        for (dest, src) in self.slots.iter_mut().zip(source.slots.iter()) {
            if dest.is_none() {
                if let Some(value) = src {
                    *dest = Some(value.clone());
                }
            }
        }
    }

    /// REPLACE-merge: every valid source slot overwrites this sheet.
    pub fn replace(&mut self, source: &StyleSheet) {
        for (dest, src) in self.slots.iter_mut().zip(source.slots.iter()) {
            if let Some(value) = src {
                *dest = Some(value.clone());
            }
        }
    }
}

impl fmt::Display for StyleSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in self.iter() {
            writeln!(f, "{}: {};", key, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_table_is_consistent() {
        for (index, key) in StyleKey::ALL.iter().enumerate() {
            assert_eq!(key.index(), index);
            assert_eq!(StyleKey::from_name(key.name()), Some(*key));
        }
        assert_eq!(StyleKey::from_name("colour"), None);
    }

    #[test]
    fn test_new_sheet_is_all_invalid() {
        let sheet = StyleSheet::new();
        assert!(sheet.is_empty());
        assert!(StyleKey::ALL.iter().all(|key| !sheet.is_valid(*key)));
    }

    #[test]
    fn test_merge_keeps_first_value() {
        let mut dest = StyleSheet::new();
        dest.set(StyleKey::Color, StyleValue::Color(Color::rgb(255, 0, 0)));

        let mut source = StyleSheet::new();
        source
            .set(StyleKey::Color, StyleValue::Color(Color::rgb(0, 0, 255)))
            .set(StyleKey::Width, StyleValue::Px(10));

        dest.merge(&source);
        assert_eq!(dest.get(StyleKey::Color), Some(&StyleValue::Color(Color::rgb(255, 0, 0))));
        assert_eq!(dest.get(StyleKey::Width), Some(&StyleValue::Px(10)));
        assert_eq!(dest.valid_count(), 2);
    }

    #[test]
    fn test_replace_overwrites() {
        let mut dest = StyleSheet::new();
        dest.set(StyleKey::Color, StyleValue::Keyword("red".into()))
            .set(StyleKey::Height, StyleValue::Auto);

        let mut source = StyleSheet::new();
        source.set(StyleKey::Color, StyleValue::Keyword("blue".into()));

        dest.replace(&source);
        assert_eq!(dest.get(StyleKey::Color), Some(&StyleValue::Keyword("blue".into())));
        // Slots invalid in the source are left alone.
        assert_eq!(dest.get(StyleKey::Height), Some(&StyleValue::Auto));
    }

    #[test]
    fn test_unset_invalidates_slot() {
        let mut sheet = StyleSheet::new();
        sheet.set(StyleKey::Top, StyleValue::Px(3)).set(StyleKey::Left, StyleValue::Px(4));

        assert_eq!(sheet.unset(StyleKey::Top), Some(StyleValue::Px(3)));
        assert!(!sheet.is_valid(StyleKey::Top));
        assert_eq!(sheet.unset(StyleKey::Top), None);
        assert_eq!(sheet.valid_count(), 1);

        // An unset slot is open again for ADD-merge.
        let mut source = StyleSheet::new();
        source.set(StyleKey::Top, StyleValue::Px(9));
        sheet.merge(&source);
        assert_eq!(sheet.get(StyleKey::Top), Some(&StyleValue::Px(9)));
    }

    #[test]
    fn test_display() {
        let mut sheet = StyleSheet::new();
        sheet
            .set(StyleKey::Width, StyleValue::Scale(0.5))
            .set(StyleKey::Color, StyleValue::Color(Color::rgb(0x12, 0xab, 0xff)));
        assert_eq!(sheet.to_string(), "width: 50%;\ncolor: #12abff;\n");
    }
}
