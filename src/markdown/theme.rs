//! Visual styles for annotations
//!
//! Maps each [`StyleTag`] to concrete text attributes. Dimmed markers are
//! rendered with a tiny font and a faint colour so that they practically
//! vanish until the caret reaches them.

use crate::config::{ThemeConfig, ThemePreference};
use crate::markdown::syntax::StyleTag;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write as _;

/// An sRGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS hex notation, e.g. `#0066cc`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Style for rendering an annotated span
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub foreground: Option<Rgb>,
    pub background: Option<Rgb>,
    pub bold: bool,
    pub italic: bool,
    pub monospace: bool,
    /// Font size in points; `None` keeps the surrounding size
    pub font_size: Option<f32>,
}

/// Colour scheme for annotations
#[derive(Debug, Clone)]
pub struct StyleScheme {
    pub name: String,
    pub is_dark: bool,
    pub base_font_size: f32,
    pub code_font_family: String,
    pub styles: HashMap<StyleTag, TextStyle>,
}

struct Palette {
    text: Rgb,
    background: Rgb,
    faint: Rgb,
    heading: Rgb,
    quote: Rgb,
    code: Rgb,
    code_background: Rgb,
    requirement_id: Rgb,
}

const LIGHT: Palette = Palette {
    text: Rgb::new(0x24, 0x29, 0x2e),
    background: Rgb::new(0xff, 0xff, 0xff),
    faint: Rgb::new(0xc8, 0xc8, 0xc8),
    heading: Rgb::new(0x00, 0x00, 0x8c),
    quote: Rgb::new(0x66, 0x66, 0x66),
    code: Rgb::new(0x44, 0x44, 0x44),
    code_background: Rgb::new(0xf0, 0xf0, 0xf0),
    requirement_id: Rgb::new(0x00, 0x66, 0xcc),
};

const DARK: Palette = Palette {
    text: Rgb::new(0xc9, 0xd1, 0xd9),
    background: Rgb::new(0x0d, 0x11, 0x17),
    faint: Rgb::new(0x48, 0x4f, 0x58),
    heading: Rgb::new(0x79, 0xc0, 0xff),
    quote: Rgb::new(0x8b, 0x94, 0x9e),
    code: Rgb::new(0xd0, 0xd0, 0xd0),
    code_background: Rgb::new(0x16, 0x1b, 0x22),
    requirement_id: Rgb::new(0x58, 0xa6, 0xff),
};

impl StyleScheme {
    /// The default light scheme
    pub fn light() -> Self {
        Self::from_config(&ThemeConfig::default())
    }

    /// The default dark scheme
    pub fn dark() -> Self {
        Self::from_config(&ThemeConfig {
            theme: ThemePreference::Dark,
            ..ThemeConfig::default()
        })
    }

    /// Build a scheme from theme configuration
    pub fn from_config(config: &ThemeConfig) -> Self {
        let is_dark = config.theme.is_dark();
        let palette = if is_dark { &DARK } else { &LIGHT };
        let mut styles = HashMap::new();

        let dimmed = TextStyle {
            foreground: Some(palette.faint),
            font_size: Some(config.dim_font_size),
            ..Default::default()
        };
        for tag in [
            StyleTag::MarkerDim,
            StyleTag::ListMarkerDim,
            StyleTag::BlockquoteMarkerDim,
        ] {
            styles.insert(tag, dimmed.clone());
        }

        for (index, size) in config.heading_sizes.iter().enumerate() {
            styles.insert(
                StyleTag::HeadingContent {
                    level: index as u8 + 1,
                },
                TextStyle {
                    foreground: Some(palette.heading),
                    bold: true,
                    font_size: Some(*size),
                    ..Default::default()
                },
            );
        }

        styles.insert(StyleTag::Bold, TextStyle {
            bold: true,
            ..Default::default()
        });

        styles.insert(StyleTag::Italic, TextStyle {
            italic: true,
            ..Default::default()
        });

        let code = TextStyle {
            foreground: Some(palette.code),
            background: Some(palette.code_background),
            monospace: true,
            ..Default::default()
        };
        styles.insert(StyleTag::InlineCode, code.clone());
        styles.insert(StyleTag::FenceCodeLine, code);

        styles.insert(StyleTag::BlockquoteText, TextStyle {
            foreground: Some(palette.quote),
            italic: true,
            ..Default::default()
        });

        styles.insert(StyleTag::RequirementId, TextStyle {
            foreground: Some(palette.requirement_id),
            bold: true,
            ..Default::default()
        });

        Self {
            name: if is_dark { "Dark" } else { "Light" }.to_string(),
            is_dark,
            base_font_size: config.base_font_size,
            code_font_family: config.code_font_family.clone(),
            styles,
        }
    }

    /// Get the style for a tag
    pub fn get_style(&self, tag: StyleTag) -> TextStyle {
        self.styles.get(&tag).cloned().unwrap_or_default()
    }

    /// Stable CSS class name for a tag
    pub fn css_class(tag: StyleTag) -> String {
        match tag {
            StyleTag::MarkerDim => "md-marker".to_string(),
            StyleTag::Bold => "md-bold".to_string(),
            StyleTag::Italic => "md-italic".to_string(),
            StyleTag::InlineCode => "md-code".to_string(),
            StyleTag::HeadingContent { level } => format!("md-h{}", level),
            StyleTag::ListMarkerDim => "md-list-marker".to_string(),
            StyleTag::BlockquoteMarkerDim => "md-quote-marker".to_string(),
            StyleTag::BlockquoteText => "md-quote".to_string(),
            StyleTag::FenceCodeLine => "md-fence".to_string(),
            StyleTag::RequirementId => "md-req-id".to_string(),
        }
    }

    /// Stylesheet covering every tag of the scheme
    pub fn to_css(&self) -> String {
        let palette = if self.is_dark { &DARK } else { &LIGHT };
        let mut css = format!(
            "body {{ color: {}; background: {}; font-size: {}pt; }}\n\
             .md-line {{ white-space: pre-wrap; min-height: 1em; }}\n",
            palette.text.to_hex(),
            palette.background.to_hex(),
            self.base_font_size
        );

        let mut entries: Vec<(String, &TextStyle)> = self
            .styles
            .iter()
            .map(|(tag, style)| (Self::css_class(*tag), style))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        for (class, style) in entries {
            let _ = write!(css, ".{} {{", class);
            if let Some(color) = style.foreground {
                let _ = write!(css, " color: {};", color.to_hex());
            }
            if let Some(color) = style.background {
                let _ = write!(css, " background: {};", color.to_hex());
            }
            if style.bold {
                css.push_str(" font-weight: bold;");
            }
            if style.italic {
                css.push_str(" font-style: italic;");
            }
            if style.monospace {
                let _ = write!(css, " font-family: {}, monospace;", self.code_font_family);
            }
            if let Some(size) = style.font_size {
                let _ = write!(css, " font-size: {}pt;", size);
            }
            css.push_str(" }\n");
        }
        css
    }
}

impl Default for StyleScheme {
    fn default() -> Self {
        Self::light()
    }
}
