//! Bounded pre-order traversal over builder layout trees.
//!
//! Layouts nest sections, rows, columns and modules under a conventional
//! child key. The walker visits every mapping node, asks the caller whether
//! it is a match, and descends through the child keys. Nodes of unexpected
//! shape are skipped. Traversal is iterative, so nesting depth is limited by
//! the ceiling only, never by the call stack.

use formscan_core::types::{FormId, FxHashSet, SmallVec4};
use serde_json::{Map, Value};

/// Default child collection keys.
pub const DEFAULT_CHILD_KEYS: [&str; 2] = ["elements", "children"];

/// Result of one walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkOutcome {
    /// Ids in visit order, duplicates kept.
    pub ids: Vec<FormId>,
    /// Mapping nodes handed to the matcher.
    pub visited: usize,
    /// Whether some subtree lay beyond the depth ceiling.
    pub truncated: bool,
}

impl WalkOutcome {
    pub fn merge(&mut self, other: WalkOutcome) {
        self.ids.extend(other.ids);
        self.visited += other.visited;
        self.truncated |= other.truncated;
    }
}

#[derive(Debug, Clone)]
pub struct WidgetWalker {
    child_keys: Vec<String>,
    max_depth: usize,
}

impl WidgetWalker {
    pub fn new(max_depth: usize) -> Self {
        Self {
            child_keys: DEFAULT_CHILD_KEYS.iter().map(|k| k.to_string()).collect(),
            max_depth,
        }
    }

    pub fn with_child_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.child_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Walk `root` in pre-order, collecting whatever `matcher` extracts.
    ///
    /// Every node is visited at most once (by address), and nodes deeper than
    /// the ceiling are not visited at all.
    pub fn walk<F>(&self, root: &Value, mut matcher: F) -> WalkOutcome
    where
        F: FnMut(&Map<String, Value>) -> SmallVec4<FormId>,
    {
        let mut outcome = WalkOutcome::default();
        let mut seen: FxHashSet<usize> = FxHashSet::default();
        let mut stack: Vec<(&Value, usize)> = vec![(root, 0)];

        while let Some((node, depth)) = stack.pop() {
            if depth > self.max_depth {
                outcome.truncated = true;
                continue;
            }
            if !seen.insert(node as *const Value as usize) {
                continue;
            }

            match node {
                Value::Array(items) => {
                    stack.extend(items.iter().rev().map(|item| (item, depth + 1)));
                }
                Value::Object(map) => {
                    outcome.visited += 1;
                    outcome.ids.extend(matcher(map));
                    for key in self.child_keys.iter().rev() {
                        if let Some(children) = map.get(key) {
                            stack.push((children, depth + 1));
                        }
                    }
                }
                _ => {}
            }
        }

        outcome
    }
}

impl Default for WidgetWalker {
    fn default() -> Self {
        Self::new(formscan_core::config::ScanConfig::DEFAULT_MAX_DEPTH)
    }
}
