//! Old-key → new-key lookup table loaded from an auxiliary delimited file.

use crate::config::{Compression, KeyTransform};
use crate::delimited::{encoding_for, read_text, records};
use crate::error::TopError;
use ahash::AHashMap;

/// Result of a [`TransformTable::lookup`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lookup<'a> {
    Found(&'a str),
    Missing,
}

impl<'a> Lookup<'a> {
    /// Found value, or `default` on a miss.
    pub fn or(self, default: &'a str) -> &'a str {
        match self {
            Lookup::Found(v) => v,
            Lookup::Missing => default,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct TransformTable {
    map: AHashMap<String, String>,
}

impl TransformTable {
    /// Load every row of `cfg.path`. Repeated old keys: the last row wins.
    pub fn load(cfg: &KeyTransform) -> Result<Self, TopError> {
        let encoding = encoding_for(&cfg.encoding)?;
        let text = read_text(&cfg.path, encoding, Compression::None)?;
        let table = Self::from_rows(&text, &cfg.delimiter, cfg.old_column, cfg.new_column)?;
        tracing::debug!(path = %cfg.path.display(), keys = table.len(), "loaded key table");
        Ok(table)
    }

    /// Build from decoded text. Every row must reach both columns.
    pub fn from_rows(
        text: &str,
        delimiter: &str,
        old_column: usize,
        new_column: usize,
    ) -> Result<Self, TopError> {
        let mut map = AHashMap::new();
        for rec in records(text, delimiter) {
            rec.field(old_column.max(new_column))?;
            let old = rec.field(old_column)?;
            let new = rec.field(new_column)?;
            map.insert(old.to_string(), new.to_string());
        }
        Ok(Self { map })
    }

    pub fn lookup(&self, key: &str) -> Lookup<'_> {
        match self.map.get(key) {
            Some(v) => Lookup::Found(v.as_str()),
            None => Lookup::Missing,
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TransformTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { map: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}
