//! Major list and picker state
//!
//! The list itself is read-only reference data; the picker layers an
//! open/closed flag and a search query over it. Selection only accepts an
//! exact entry from the list.

use std::path::Path;

use crate::error::{Error, Result};

/// Built-in list, used when no majors file is configured
pub const DEFAULT_MAJORS: &[&str] = &[
    "none",
    "Department of Korean Language and Literature",
    "Department of English Language and Literature",
    "Department of Philosophy",
    "Department of History",
    "Department of Economics",
    "Department of Statistics",
    "Department of Mathematics",
    "Department of Physics",
    "Department of Chemistry",
    "Department of Biological Sciences",
    "School of Business",
    "Department of Psychology",
    "School of Mechanical Engineering",
    "School of Chemical Engineering",
    "Department of Civil, Architectural and Environmental System Engineering",
    "Department of Systems Management Engineering",
    "School of Electronic and Electrical Engineering",
    "Department of Semiconductor Systems Engineering",
    "Department of Computer Science and Engineering",
    "Department of Computer Education",
    "College of Software",
    "Department of Applied Artificial Intelligence",
    "Department of Data Science",
    "Department of Intelligent Software",
    "Department of Interaction Science",
    "School of Pharmacy",
    "School of Medicine",
    "Department of Sport Science",
    "Department of Fashion Design",
];

/// Ordered list of selectable majors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MajorList {
    majors: Vec<String>,
}

impl Default for MajorList {
    fn default() -> Self {
        Self::new(DEFAULT_MAJORS.iter().map(|m| m.to_string()).collect())
    }
}

impl MajorList {
    pub fn new(majors: Vec<String>) -> Self {
        Self { majors }
    }

    /// Load a list from a JSON array of strings
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let majors: Vec<String> = serde_json::from_str(&content)?;
        if majors.is_empty() {
            return Err(Error::config(format!(
                "Majors file {} contains no entries",
                path.display()
            )));
        }
        log::debug!("[signup:majors] Loaded {} majors from {}", majors.len(), path.display());
        Ok(Self::new(majors))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.majors
    }

    pub fn len(&self) -> usize {
        self.majors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.majors.is_empty()
    }

    pub fn contains(&self, major: &str) -> bool {
        self.majors.iter().any(|m| m == major)
    }

    /// Case-insensitive substring search; an empty query returns everything
    pub fn search(&self, query: &str) -> Vec<&str> {
        let needle = query.trim().to_lowercase();
        self.majors
            .iter()
            .filter(|m| needle.is_empty() || m.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }
}

/// Picker overlay state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MajorPicker {
    open: bool,
    query: String,
}

impl MajorPicker {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Closing keeps nothing of the search
    pub fn close(&mut self) {
        self.open = false;
        self.query.clear();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn filtered<'a>(&self, list: &'a MajorList) -> Vec<&'a str> {
        list.search(&self.query)
    }

    /// Pick an entry by exact value and close the picker
    pub fn select(&mut self, list: &MajorList, value: &str) -> Result<String> {
        if !list.contains(value) {
            return Err(Error::validation(format!("Unknown major: {}", value)));
        }
        self.close();
        Ok(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_list_is_not_empty() {
        let list = MajorList::default();
        assert!(!list.is_empty());
        assert!(list.contains("College of Software"));
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let list = MajorList::default();
        let hits = list.search("COMPUTER");
        assert_eq!(
            hits,
            vec![
                "Department of Computer Science and Engineering",
                "Department of Computer Education"
            ]
        );
        assert_eq!(list.search("").len(), list.len());
        assert!(list.search("astrology").is_empty());
    }

    #[test]
    fn test_picker_select_exact_only() {
        let list = MajorList::default();
        let mut picker = MajorPicker::default();
        picker.open();
        picker.set_query("software");
        assert!(picker.select(&list, "software").is_err());
        assert!(picker.is_open());

        let major = picker.select(&list, "College of Software").unwrap();
        assert_eq!(major, "College of Software");
        assert!(!picker.is_open());
        assert_eq!(picker.query(), "");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"["Physics", "Chemistry"]"#).unwrap();

        let list = MajorList::from_file(file.path()).unwrap();
        assert_eq!(list.as_slice(), &["Physics".to_string(), "Chemistry".to_string()]);
    }

    #[test]
    fn test_from_file_rejects_empty_list() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[]").unwrap();
        assert!(matches!(MajorList::from_file(file.path()), Err(Error::Config(_))));
    }
}
