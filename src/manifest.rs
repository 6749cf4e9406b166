//! Package manifest loading.
//!
//! A manifest is a YAML mapping of category → subcategory → package list.
//! Each category may also carry an `other_packages` list that is always
//! installed with the category.
//!
//! ```yaml
//! base:
//!   editors: [vim, nano]
//!   network: [curl, wget]
//!   other_packages: [linux_headers, build-essential]
//! ```

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// Default manifest path, relative to the working directory
pub const DEFAULT_MANIFEST_PATH: &str = "packages.yaml";

/// Reserved key holding the packages installed with every selection of a category
pub const OTHER_PACKAGES_KEY: &str = "other_packages";

/// On-disk shape. `null` is accepted wherever a list or mapping is expected.
type RawManifest = BTreeMap<String, Option<RawCategory>>;

#[derive(Debug, Default)]
struct RawCategory {
    other_packages: Option<Vec<String>>,
    subcategories: BTreeMap<String, Option<Vec<String>>>,
}

// Each list is read straight from the YAML scalars so unquoted entries such
// as `2048` or `0xffff` keep their literal text in every key.
impl<'de> Deserialize<'de> for RawCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CategoryVisitor;

        impl<'de> Visitor<'de> for CategoryVisitor {
            type Value = RawCategory;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping of subcategory names to package lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RawCategory, A::Error> {
                let mut category = RawCategory::default();
                while let Some(key) = map.next_key::<String>()? {
                    let packages = map.next_value::<Option<Vec<String>>>()?;
                    if key == OTHER_PACKAGES_KEY {
                        category.other_packages = packages;
                    } else {
                        category.subcategories.insert(key, packages);
                    }
                }
                Ok(category)
            }
        }

        deserializer.deserialize_map(CategoryVisitor)
    }
}

/// A parsed package manifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    categories: BTreeMap<String, Category>,
}

/// One top-level category of a manifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Category {
    /// Named package lists; each list keeps its manifest order
    pub subcategories: BTreeMap<String, Vec<String>>,
    /// Packages installed whenever this category is selected
    pub other_packages: Vec<String>,
}

impl Category {
    /// Packages of a subcategory, or `None` if the category has no such key
    pub fn subcategory(&self, name: &str) -> Option<&[String]> {
        self.subcategories.get(name).map(Vec::as_slice)
    }
}

impl RawCategory {
    fn into_category(self) -> Category {
        Category {
            subcategories: self
                .subcategories
                .into_iter()
                .map(|(name, packages)| (name, packages.unwrap_or_default()))
                .collect(),
            other_packages: self.other_packages.unwrap_or_default(),
        }
    }
}

impl Manifest {
    /// Load and validate a manifest from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let manifest = Self::parse(&content, path)?;
        tracing::debug!(
            "Loaded manifest {} with {} categories",
            path.display(),
            manifest.categories.len()
        );
        Ok(manifest)
    }

    /// Parse a manifest from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, Path::new("<memory>"))
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let raw: Option<RawManifest> =
            serde_yaml_ng::from_str(content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let raw = raw.ok_or_else(|| ConfigError::Malformed {
            path: path.to_path_buf(),
            reason: "manifest is empty".to_string(),
        })?;

        let categories = raw
            .into_iter()
            .map(|(name, raw)| (name, raw.unwrap_or_default().into_category()))
            .collect();

        Ok(Self { categories })
    }

    /// Look up a category by name
    pub fn category(&self, name: &str) -> Result<&Category, ConfigError> {
        self.categories
            .get(name)
            .ok_or_else(|| ConfigError::CategoryNotFound {
                category: name.to_string(),
                available: self.category_names().map(str::to_string).collect(),
            })
    }

    /// Category names, sorted
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }
}
