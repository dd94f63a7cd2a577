//! Class assignability.
//!
//! The builder decides the collection type of a plural attribute from the
//! declared container of the property, by asking whether that container is
//! assignable to one of the standard collection interfaces. The standard
//! interfaces and their usual implementations are known up front; mapping
//! documents may declare further supertypes for custom containers.

use crate::class::ClassName;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet, VecDeque};

/// Root collection interface.
pub const COLLECTION: &str = "Collection";
/// Ordered collection interface.
pub const LIST: &str = "List";
/// Set interface.
pub const SET: &str = "Set";
/// Map interface.
pub const MAP: &str = "Map";

/// Supertypes of the standard collection classes.
const STANDARD_SUPERTYPES: &[(&str, &[&str])] = &[
    (LIST, &[COLLECTION]),
    (SET, &[COLLECTION]),
    ("Queue", &[COLLECTION]),
    ("Deque", &["Queue"]),
    ("SortedSet", &[SET]),
    ("NavigableSet", &["SortedSet"]),
    ("SortedMap", &[MAP]),
    ("NavigableMap", &["SortedMap"]),
    ("ArrayList", &[LIST]),
    ("LinkedList", &[LIST, "Deque"]),
    ("Vector", &[LIST]),
    ("HashSet", &[SET]),
    ("LinkedHashSet", &["HashSet"]),
    ("TreeSet", &["NavigableSet"]),
    ("HashMap", &[MAP]),
    ("LinkedHashMap", &["HashMap"]),
    ("TreeMap", &["NavigableMap"]),
];

/// Declared supertypes of classes, on top of the standard collection classes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassHierarchy {
    supertypes: BTreeMap<ClassName, Vec<ClassName>>,
}

impl ClassHierarchy {
    /// Create a hierarchy that knows only the standard collection classes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that `class` directly extends or implements `supertype`.
    pub fn with_supertype(mut self, class: impl Into<ClassName>, supertype: impl Into<ClassName>) -> Self {
        self.declare(class, supertype);
        self
    }

    /// Declare a direct supertype in place.
    pub fn declare(&mut self, class: impl Into<ClassName>, supertype: impl Into<ClassName>) {
        let supertype = supertype.into();
        let entry = self.supertypes.entry(class.into()).or_default();
        if !entry.contains(&supertype) {
            entry.push(supertype);
        }
    }

    /// Direct supertypes of `class`, standard ones first.
    pub fn direct_supertypes(&self, class: &str) -> Vec<&str> {
        let mut supers: Vec<&str> = STANDARD_SUPERTYPES
            .iter()
            .filter(|(name, _)| *name == class)
            .flat_map(|(_, standard)| standard.iter().copied())
            .collect();
        if let Some(declared) = self.supertypes.get(class) {
            supers.extend(declared.iter().map(ClassName::as_str));
        }
        supers
    }

    /// Whether a value of class `from` can be assigned to `to`.
    ///
    /// Every class is assignable to itself.
    pub fn is_assignable(&self, from: &str, to: &str) -> bool {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([from]);
        while let Some(current) = queue.pop_front() {
            if current == to {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            queue.extend(self.direct_supertypes(current));
        }
        false
    }

    /// Number of classes with declared (non-standard) supertypes.
    pub fn len(&self) -> usize {
        self.supertypes.len()
    }

    /// Whether no supertypes were declared.
    pub fn is_empty(&self) -> bool {
        self.supertypes.is_empty()
    }
}
