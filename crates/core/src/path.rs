//! Path addressing into an [`AppState`](crate::state::AppState) tree.

use std::fmt;

/// One step into a nested value: a mapping key or a sequence index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Key(String),
    Index(usize),
}

/// Ordered key sequence addressing a single node. The empty path addresses
/// the root.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path(Vec<Step>);

impl Path {
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    pub fn from_steps(steps: Vec<Step>) -> Self {
        Self(steps)
    }

    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Extend with a mapping key.
    pub fn child_key(&self, key: &str) -> Self {
        let mut steps = self.0.clone();
        steps.push(Step::Key(key.to_string()));
        Self(steps)
    }

    /// Extend with a sequence index.
    pub fn child_index(&self, index: usize) -> Self {
        let mut steps = self.0.clone();
        steps.push(Step::Index(index));
        Self(steps)
    }

    /// Parse a pointer such as `/b/0`. A token of digits is taken as a
    /// sequence index, anything else as a mapping key. `/` and the empty
    /// string address the root.
    pub fn parse_pointer(text: &str) -> Self {
        let trimmed = text.trim().trim_start_matches('/');
        if trimmed.is_empty() {
            return Self::root();
        }
        let steps = trimmed
            .split('/')
            .map(|token| match token.parse::<usize>() {
                Ok(index) => Step::Index(index),
                Err(_) => Step::Key(token.to_string()),
            })
            .collect();
        Self(steps)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for step in &self.0 {
            match step {
                Step::Key(key) => write!(f, "/{key}")?,
                Step::Index(index) => write!(f, "/{index}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_parsing_distinguishes_indices_from_keys() {
        let path = Path::parse_pointer("/b/0/name");
        assert_eq!(
            path.steps(),
            [
                Step::Key("b".to_string()),
                Step::Index(0),
                Step::Key("name".to_string())
            ]
        );
    }

    #[test]
    fn root_forms_parse_and_display() {
        assert!(Path::parse_pointer("").is_root());
        assert!(Path::parse_pointer("/").is_root());
        assert_eq!(Path::root().to_string(), "/");
        assert_eq!(Path::root().child_key("b").child_index(2).to_string(), "/b/2");
    }
}
