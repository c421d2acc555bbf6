//! Key paths: where in the input tree the walk currently is.

use core::fmt;

/// A single step in a key path.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyStep {
    /// An object field.
    Field(String),
    /// An array index.
    Index(usize),
}

impl KeyStep {
    /// A field step.
    pub fn field(name: impl Into<String>) -> KeyStep {
        KeyStep::Field(name.into())
    }

    /// An index step.
    pub fn index(i: usize) -> KeyStep {
        KeyStep::Index(i)
    }
}

impl fmt::Display for KeyStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyStep::Field(name) => write!(f, ".{name}"),
            KeyStep::Index(i) => write!(f, "[{i}]"),
        }
    }
}

/// An ordered sequence of [`KeyStep`]s locating a position in the input.
///
/// The engine pushes a step when it descends and pops it when it ascends, so
/// at any point a leaf handler observes it, the path mirrors the recursion
/// depth exactly.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct KeyPath(Vec<KeyStep>);

impl KeyPath {
    /// The empty (root) path.
    pub fn new() -> KeyPath {
        KeyPath(Vec::new())
    }

    /// Push a step.
    pub fn push(&mut self, step: KeyStep) {
        self.0.push(step);
    }

    /// Pop the last step.
    pub fn pop(&mut self) -> Option<KeyStep> {
        self.0.pop()
    }

    /// Drop every step.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// True at the root.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Current depth.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The steps, outermost first.
    pub fn steps(&self) -> &[KeyStep] {
        &self.0
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<root>");
        }
        for step in &self.0 {
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

impl FromIterator<KeyStep> for KeyPath {
    fn from_iter<I: IntoIterator<Item = KeyStep>>(iter: I) -> Self {
        KeyPath(iter.into_iter().collect())
    }
}

impl From<Vec<KeyStep>> for KeyPath {
    fn from(steps: Vec<KeyStep>) -> Self {
        KeyPath(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let mut path = KeyPath::new();
        assert_eq!(path.to_string(), "<root>");
        path.push(KeyStep::field("name"));
        path.push(KeyStep::index(3));
        assert_eq!(path.to_string(), ".name[3]");
        path.pop();
        assert_eq!(path.to_string(), ".name");
    }

    #[test]
    fn collects_from_iter() {
        let path: KeyPath = [KeyStep::field("a"), KeyStep::index(0)].into_iter().collect();
        assert_eq!(path.len(), 2);
        assert_eq!(path.steps()[1], KeyStep::Index(0));
    }
}
