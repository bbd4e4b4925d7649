//! Language catalog: display names mapped to short alias codes.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CatalogError;
use crate::ui::Style;

/// Default location of the catalog, relative to the working directory.
pub const DEFAULT_CATALOG_PATH: &str = "languages.json";

/// An ordered, immutable mapping of display names to aliases.
///
/// Entries keep the order of the file they were loaded from, which is also
/// the order the selection prompt presents them in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageCatalog {
    entries: Vec<(String, String)>,
}

impl LanguageCatalog {
    /// Loads a catalog from a JSON object of `"Display name": "alias"` pairs.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        // Files saved by some editors start with a byte-order mark
        let contents = contents.strip_prefix('\u{feff}').unwrap_or(&contents);

        let catalog = serde_json::from_str(contents).map_err(|source| CatalogError::Format {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "loaded language catalog");
        Ok(catalog)
    }

    /// Builds a catalog from pairs, keeping the first occurrence of a name.
    pub fn from_pairs<I, N, A>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, A)>,
        N: Into<String>,
        A: Into<String>,
    {
        let mut entries: Vec<(String, String)> = Vec::new();
        for (name, alias) in pairs {
            let name = name.into();
            if !entries.iter().any(|(n, _)| *n == name) {
                entries.push((name, alias.into()));
            }
        }
        Self { entries }
    }

    /// Display names in file order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Returns the alias registered for a display name.
    pub fn alias_of(&self, name: &str) -> Result<&str, CatalogError> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, alias)| alias.as_str())
            .ok_or_else(|| CatalogError::UnknownLanguage(name.to_string()))
    }

    /// Resolves user input to a canonical display name.
    ///
    /// Accepts an exact display name, a case-insensitive display name, or an
    /// alias, in that order of preference.
    pub fn resolve(&self, input: &str) -> Result<&str, CatalogError> {
        let input = input.trim();
        self.entries
            .iter()
            .find(|(name, _)| name == input)
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(input))
            })
            .or_else(|| self.entries.iter().find(|(_, alias)| alias == input))
            .map(|(name, _)| name.as_str())
            .ok_or_else(|| CatalogError::UnknownLanguage(input.to_string()))
    }

    /// The language selected when the user has not chosen one.
    pub fn default_language(&self) -> Result<&str, CatalogError> {
        self.entries
            .first()
            .map(|(name, _)| name.as_str())
            .ok_or(CatalogError::Empty)
    }

    /// Iterates over `(name, alias)` pairs in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, alias)| (name.as_str(), alias.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for LanguageCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, alias) in &self.entries {
            map.serialize_entry(name, alias)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for LanguageCatalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = LanguageCatalog;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of language names to aliases")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, String)> =
                    Vec::with_capacity(map.size_hint().unwrap_or(0));

                while let Some((name, alias)) = map.next_entry::<String, String>()? {
                    if entries.iter().any(|(n, _)| *n == name) {
                        return Err(de::Error::custom(format!(
                            "duplicate language name '{name}'"
                        )));
                    }
                    entries.push((name, alias));
                }

                Ok(LanguageCatalog { entries })
            }
        }

        deserializer.deserialize_map(CatalogVisitor)
    }
}

/// Prints every catalog entry to stdout.
pub fn print_languages(catalog: &LanguageCatalog) {
    if catalog.is_empty() {
        println!("No languages configured.");
        return;
    }

    println!("{}", Style::header("Available languages"));
    let width = catalog.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, alias) in catalog.iter() {
        println!("  {name:width$}  {}", Style::code(alias));
    }
}
