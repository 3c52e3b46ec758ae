use serde::{ser::SerializeMap, Serialize, Serializer};

/// Catalog column holding the intended gender (e.g. "Men", "Women", "Unisex")
pub const GENDER_FIELD: &str = "Gender";
/// Catalog column holding the occasions a perfume suits
pub const OCCASION_FIELD: &str = "Occasion";
/// Catalog column holding personality and mood descriptors
pub const MOOD_FIELD: &str = "Personality / Mood";
/// Catalog column holding the scent notes
pub const SCENT_PROFILE_FIELD: &str = "Scent Profile";

/// One catalog row as an ordered list of column name / value pairs
///
/// Columns not used for scoring (name, brand, price, ...) are carried through
/// untouched so they reach the client as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerfumeRecord {
    fields: Vec<(String, String)>,
}

impl PerfumeRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field, keeping column order
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Value of a column, if the row has it
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Value of a column trimmed and lower-cased; missing columns read as empty
    pub fn normalized(&self, name: &str) -> String {
        self.field(name)
            .map(|v| v.trim().to_lowercase())
            .unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PerfumeRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Serialize for PerfumeRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in self.fields() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
