use std::path::Path;
use std::sync::Arc;

use usvg::fontdb;

use crate::foundation::error::{BannerError, BannerResult};

/// An entry of the editor's font menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct FontChoice {
    pub name: &'static str,
    pub stack: &'static str,
}

/// Fonts offered for the text layer. The first entry is the default.
pub const FONT_CHOICES: [FontChoice; 5] = [
    FontChoice {
        name: "Inter",
        stack: "Inter, sans-serif",
    },
    FontChoice {
        name: "Serif",
        stack: "Georgia, serif",
    },
    FontChoice {
        name: "Mono",
        stack: "Courier New, monospace",
    },
    FontChoice {
        name: "Impact",
        stack: "Impact, sans-serif",
    },
    FontChoice {
        name: "Cursive",
        stack: "cursive",
    },
];

/// Expand a menu name (`"Serif"`) to its font stack. Anything else is already a stack.
pub fn font_stack_for(value: &str) -> &str {
    let name = value.trim();
    FONT_CHOICES
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
        .map_or(value, |c| c.stack)
}

/// Font face bytes picked for a text layer.
#[derive(Clone)]
pub struct ResolvedFont {
    pub data: Arc<Vec<u8>>,
    /// Face index inside a collection file.
    pub index: u32,
    pub family: String,
}

impl std::fmt::Debug for ResolvedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedFont")
            .field("data_len", &self.data.len())
            .field("index", &self.index)
            .field("family", &self.family)
            .finish()
    }
}

/// Fonts available to text layers, keyed by family name.
///
/// Family stacks use CSS syntax (`"Georgia, serif"`); generic names map to the database's
/// generic families and every query falls back to sans-serif, serif, monospace and finally any
/// face at all.
#[derive(Clone)]
pub struct FontBook {
    db: Arc<fontdb::Database>,
}

impl Default for FontBook {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("faces", &self.db.len())
            .finish()
    }
}

impl FontBook {
    pub fn empty() -> Self {
        Self {
            db: Arc::new(fontdb::Database::new()),
        }
    }

    /// Book populated from the platform's installed fonts.
    pub fn system() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts");
        Self { db: Arc::new(db) }
    }

    /// Load every `.ttf`/`.otf`/`.ttc` directly inside `dir`. Missing directories are ignored.
    pub fn load_dir(&mut self, dir: &Path) {
        load_fonts_from_dir(Arc::make_mut(&mut self.db), dir);
    }

    pub fn load_font_data(&mut self, bytes: Vec<u8>) {
        Arc::make_mut(&mut self.db).load_font_data(bytes);
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    pub fn len(&self) -> usize {
        self.db.len()
    }

    /// Pick a face for a CSS font stack or a [`FONT_CHOICES`] name.
    pub fn resolve(&self, stack: &str, bold: bool) -> BannerResult<ResolvedFont> {
        let stack = font_stack_for(stack);
        let requested = parse_font_stack(stack);
        let mut families: Vec<fontdb::Family<'_>> =
            requested.iter().map(|s| to_family(s)).collect();
        families.push(fontdb::Family::SansSerif);
        families.push(fontdb::Family::Serif);
        families.push(fontdb::Family::Monospace);

        let weight = if bold {
            fontdb::Weight::BOLD
        } else {
            fontdb::Weight::NORMAL
        };
        let query = fontdb::Query {
            families: &families,
            weight,
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        };

        let id = self
            .db
            .query(&query)
            .or_else(|| self.db.faces().next().map(|f| f.id))
            .ok_or_else(|| {
                BannerError::validation(format!("no font available for '{stack}'"))
            })?;

        let family = self
            .db
            .face(id)
            .and_then(|f| f.families.first().map(|(name, _)| name.clone()))
            .unwrap_or_else(|| "unknown".to_string());
        let (data, index) = self
            .db
            .with_face_data(id, |data, index| (data.to_vec(), index))
            .ok_or_else(|| BannerError::validation(format!("font data for '{family}' is unreadable")))?;

        tracing::debug!(stack, family = family.as_str(), bold, "resolved font");
        Ok(ResolvedFont {
            data: Arc::new(data),
            index,
            family,
        })
    }
}

/// Split a CSS `font-family` value into unquoted, trimmed entries.
pub(crate) fn parse_font_stack(stack: &str) -> Vec<String> {
    stack
        .split(',')
        .map(|s| s.trim().trim_matches(|c| c == '"' || c == '\'').trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn to_family(name: &str) -> fontdb::Family<'_> {
    match name.to_ascii_lowercase().as_str() {
        "serif" => fontdb::Family::Serif,
        "sans-serif" => fontdb::Family::SansSerif,
        "monospace" => fontdb::Family::Monospace,
        "cursive" => fontdb::Family::Cursive,
        "fantasy" => fontdb::Family::Fantasy,
        _ => fontdb::Family::Name(name),
    }
}

fn load_fonts_from_dir(db: &mut fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable font");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
