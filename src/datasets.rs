//! Legacy dataset detection for nominal-capacity resolution.
//!
//! Some published cycling datasets omit `nominal_capacity_in_Ah` from the
//! record metadata; for those the rated capacity is keyed off the file-name
//! prefix. New dataset prefixes are added to the table without touching the
//! SOH builder.

/// Lookup table mapping file-name prefixes of known legacy datasets to the
/// rated capacity of their cells.
#[derive(Debug, Clone)]
pub struct NominalCapacityTable {
    entries: Vec<(String, f64)>,
}

impl Default for NominalCapacityTable {
    fn default() -> Self {
        NominalCapacityTable {
            entries: vec![
                ("RWTH".to_string(), 1.85),
                ("SNL_18650_NCA_25C_20-80".to_string(), 3.2),
            ],
        }
    }
}

impl NominalCapacityTable {
    /// Empty table, for callers that supply every entry themselves.
    pub fn empty() -> Self {
        NominalCapacityTable { entries: Vec::new() }
    }

    /// Register a prefix. Longer prefixes win over shorter ones regardless of
    /// insertion order, so `SNL_18650_NCA_25C_20-80` is matched before a
    /// hypothetical `SNL` entry.
    pub fn with_entry(mut self, prefix: impl Into<String>, capacity_ah: f64) -> Self {
        self.entries.push((prefix.into(), capacity_ah));
        self
    }

    /// Rated capacity for a file name, by longest matching prefix.
    pub fn lookup(&self, file_name: &str) -> Option<f64> {
        self.entries
            .iter()
            .filter(|(prefix, _)| file_name.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, capacity)| *capacity)
    }
}
