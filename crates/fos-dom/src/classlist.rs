//! Class List
//!
//! Ordered, duplicate-free set of class names backing an element's
//! `class` attribute.

/// Classes of one element, in first-added order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    classes: Vec<String>,
}

impl ClassList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split a `class` attribute value on whitespace
    pub fn parse(value: &str) -> Self {
        let mut list = Self::new();
        for class in value.split_whitespace() {
            list.insert(class);
        }
        list
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Add a class at the end; returns false if empty or already present
    pub fn insert(&mut self, class: &str) -> bool {
        if class.is_empty() || self.contains(class) {
            return false;
        }
        self.classes.push(class.to_string());
        true
    }

    /// Returns whether the class was present
    pub fn remove(&mut self, class: &str) -> bool {
        let before = self.classes.len();
        self.classes.retain(|c| c != class);
        self.classes.len() < before
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }
}

impl std::fmt::Display for ClassList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.classes.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_drops_duplicates() {
        let list = ClassList::parse("  modal dialog\tmodal ");
        assert_eq!(list.len(), 2);
        assert_eq!(list.to_string(), "modal dialog");
    }

    #[test]
    fn test_insert_remove() {
        let mut list = ClassList::new();
        assert!(list.insert("open"));
        assert!(!list.insert("open"));
        assert!(!list.insert(""));
        assert!(list.remove("open"));
        assert!(!list.remove("open"));
        assert!(list.is_empty());
    }
}
