//! The tag vocabulary and the catalog of reference icons.
//!
//! A catalog is the intersection of a directory listing with a fixed
//! file-to-label table. Table entries whose file is absent are logged and
//! skipped; files not named in the table are ignored. Entries keep table
//! order, which is also the tie-break order of the ranking stage.

use crate::image::RasterImage;
use crate::template::Template;
use crate::trace::{trace_event, trace_warn};
use crate::util::{TagMatchError, TagMatchResult};
use std::borrow::Cow;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Every tag label the game can display.
pub const TAG_VOCABULARY: [&str; 29] = [
    "先鋒タイプ",
    "前衛タイプ",
    "狙撃タイプ",
    "重装タイプ",
    "医療タイプ",
    "補助タイプ",
    "術師タイプ",
    "特殊タイプ",
    "近距離",
    "遠距離",
    "火力",
    "防御",
    "COST回復",
    "範囲攻撃",
    "生存",
    "治療",
    "支援",
    "弱化",
    "減速",
    "強制移動",
    "牽制",
    "爆発力",
    "召喚",
    "高速再配置",
    "初期",
    "ロボット",
    "元素",
    "エリート",
    "上級エリート",
];

/// Icon file name to tag label.
pub const DEFAULT_CATALOG: [(&str, &str); 27] = [
    ("zenei.png", "前衛タイプ"),
    ("jyusou.png", "重装タイプ"),
    ("hojyo.png", "補助タイプ"),
    ("sogeki.png", "狙撃タイプ"),
    ("senpou.png", "先鋒タイプ"),
    ("iryo.png", "医療タイプ"),
    ("jyutushi.png", "術師タイプ"),
    ("enkyori.png", "遠距離"),
    ("kinkyori.png", "近距離"),
    ("cost.png", "COST回復"),
    ("bougyo.png", "防御"),
    ("shoki.png", "初期"),
    ("karyoku.png", "火力"),
    ("seizon.png", "生存"),
    ("hani.png", "範囲攻撃"),
    ("gensoku.png", "減速"),
    ("kyousei.png", "強制移動"),
    ("kensei.png", "牽制"),
    ("shoukan.png", "召喚"),
    ("kousoku.png", "高速再配置"),
    ("robot.png", "ロボット"),
    ("elite.png", "エリート"),
    ("tokusyu.png", "特殊タイプ"),
    ("chiryou.png", "治療"),
    ("shien.png", "支援"),
    ("bakuhatsu.png", "爆発力"),
    ("jyakuka.png", "弱化"),
];

/// Returns true if `tag` is a literal member of [`TAG_VOCABULARY`].
pub fn is_known_tag(tag: &str) -> bool {
    TAG_VOCABULARY.contains(&tag)
}

/// Where a catalog entry's icon comes from.
#[derive(Clone, Debug)]
pub enum TemplateSource {
    /// Loaded lazily from disk on each analysis pass.
    File(PathBuf),
    /// Already in memory.
    Memory(Template),
}

/// One tag label and its icon.
#[derive(Clone, Debug)]
pub struct CatalogEntry {
    tag: String,
    source: TemplateSource,
}

impl CatalogEntry {
    /// Entry whose icon is read from `path` when scored.
    pub fn from_file(tag: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            tag: tag.into(),
            source: TemplateSource::File(path.into()),
        }
    }

    /// In-memory entry labelled with the template's name.
    pub fn from_template(template: Template) -> Self {
        Self {
            tag: template.name().to_owned(),
            source: TemplateSource::Memory(template),
        }
    }

    /// Builds an in-memory entry, rejecting empty rasters.
    pub fn from_raster(tag: impl Into<String>, image: RasterImage) -> TagMatchResult<Self> {
        Template::new(tag, image).map(Self::from_template)
    }

    /// Returns the tag label.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns where the icon comes from.
    pub fn source(&self) -> &TemplateSource {
        &self.source
    }

    /// Returns the template, reading it from disk for file entries.
    pub fn template(&self) -> TagMatchResult<Cow<'_, Template>> {
        match &self.source {
            TemplateSource::File(path) => Template::load(self.tag.as_str(), path).map(Cow::Owned),
            TemplateSource::Memory(template) => Ok(Cow::Borrowed(template)),
        }
    }
}

/// Ordered collection of catalog entries.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Loads `dir` against [`DEFAULT_CATALOG`].
    pub fn load<P: AsRef<Path>>(dir: P) -> TagMatchResult<Self> {
        Self::load_with_table(dir, &DEFAULT_CATALOG)
    }

    /// Loads `dir` against an explicit file-to-label table.
    ///
    /// Only the directory listing is read here; icons are decoded when the
    /// catalog is scored.
    pub fn load_with_table<P: AsRef<Path>>(dir: P, table: &[(&str, &str)]) -> TagMatchResult<Self> {
        let dir = dir.as_ref();
        let catalog_err = |err: std::io::Error| TagMatchError::CatalogIo {
            path: dir.to_path_buf(),
            reason: err.to_string(),
        };

        let mut present = HashSet::new();
        for entry in fs::read_dir(dir).map_err(catalog_err)? {
            let entry = entry.map_err(catalog_err)?;
            if let Some(name) = entry.file_name().to_str() {
                present.insert(name.to_owned());
            }
        }

        let mut entries = Vec::with_capacity(table.len());
        for &(file, label) in table {
            if present.contains(file) {
                entries.push(CatalogEntry::from_file(label, dir.join(file)));
            } else {
                trace_warn!("catalog_entry_missing", file = file, tag = label);
            }
        }
        trace_event!("catalog_loaded", entries = entries.len(), listed = present.len());
        Ok(Self { entries })
    }

    /// Wraps entries, keeping their order.
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Builds an in-memory catalog, one entry per template.
    pub fn from_templates<I: IntoIterator<Item = Template>>(templates: I) -> Self {
        Self {
            entries: templates.into_iter().map(CatalogEntry::from_template).collect(),
        }
    }

    /// Appends an entry; it is scored after the existing ones.
    pub fn push(&mut self, entry: CatalogEntry) {
        self.entries.push(entry);
    }

    /// Returns the entries in scoring order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in scoring order.
    pub fn iter(&self) -> std::slice::Iter<'_, CatalogEntry> {
        self.entries.iter()
    }
}
