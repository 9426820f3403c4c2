//! French typographic fixes applied to text runs.

use serde::Deserialize;

const NBSP: char = '\u{a0}';
const NARROW_NBSP: char = '\u{202f}';

/// Post-processing applied to every text run of a document.
///
/// Implemented for any `Fn(&str) -> String`, so closures and plain functions
/// can be handed to a renderer directly.
pub trait TextTransform {
    fn transform(&self, text: &str) -> String;
}

impl<F> TextTransform for F
where
    F: Fn(&str) -> String,
{
    fn transform(&self, text: &str) -> String {
        self(text)
    }
}

/// Applies French typography rules to prose.
///
/// Only existing spaces are turned into no-break spaces; none are inserted,
/// so URLs and times written in running text are left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Typographer {
    /// `l'été` becomes `l’été`
    pub apostrophes: bool,
    /// `...` becomes `…`
    pub ellipsis: bool,
    /// Spaces before `;:!?»` and after `«` become no-break spaces
    pub nbsp: bool,
}

impl Default for Typographer {
    fn default() -> Self {
        Self {
            apostrophes: true,
            ellipsis: true,
            nbsp: true,
        }
    }
}

impl Typographer {
    pub fn apply(&self, text: &str) -> String {
        let text = if self.ellipsis {
            text.replace("...", "…")
        } else {
            text.to_string()
        };

        let chars: Vec<char> = text.chars().collect();
        let mut out = String::with_capacity(text.len());
        for (i, &ch) in chars.iter().enumerate() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            match ch {
                '\'' if self.apostrophes && prev.is_some_and(char::is_alphanumeric) => {
                    out.push('’');
                }
                ' ' if self.nbsp => match (prev, next) {
                    (_, Some(';' | '!' | '?')) => out.push(NARROW_NBSP),
                    (_, Some(':' | '»')) | (Some('«'), _) => out.push(NBSP),
                    _ => out.push(ch),
                },
                _ => out.push(ch),
            }
        }
        out
    }
}

impl TextTransform for Typographer {
    fn transform(&self, text: &str) -> String {
        self.apply(text)
    }
}
