//! Namespace nodes (branches of the tree)

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::constants::{DELIMITER, WILDCARD};
use crate::entry::Entry;
use crate::error::{Error, Result};

/// Child slot of a namespace node
#[derive(Debug)]
pub enum Child {
    Branch(Node),
    Entry(Arc<Entry>),
}

/// Internal tree node mapping segment names to children
///
/// Keys are kept in a `BTreeMap` so both group resolution and listing see
/// names in lexicographic order. A wildcard key only ever holds an entry.
#[derive(Debug, Default)]
pub struct Node {
    children: BTreeMap<String, Child>,
}

impl Node {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk down `segments`, creating missing namespaces along the way
    pub(crate) fn branch_mut(&mut self, segments: &[String]) -> Result<&mut Node> {
        let mut node = self;
        for (depth, segment) in segments.iter().enumerate() {
            if segment == WILDCARD {
                return Err(Error::invalid_path(
                    segments.join(DELIMITER),
                    format!("{WILDCARD} must not be used for branch names"),
                ));
            }
            let child = node
                .children
                .entry(segment.clone())
                .or_insert_with(|| Child::Branch(Node::new()));
            node = match child {
                Child::Branch(branch) => branch,
                Child::Entry(_) => {
                    return Err(Error::not_a_namespace(
                        segments[..=depth].join(DELIMITER),
                    ));
                }
            };
        }
        Ok(node)
    }

    /// Walk down `segments` without creating anything
    ///
    /// Fails with `BranchNotFound` naming the first missing namespace.
    pub(crate) fn branch(&self, segments: &[String]) -> Result<&Node> {
        let mut node = self;
        for (depth, segment) in segments.iter().enumerate() {
            node = match node.children.get(segment) {
                Some(Child::Branch(branch)) => branch,
                Some(Child::Entry(_)) => {
                    return Err(Error::not_a_namespace(
                        segments[..=depth].join(DELIMITER),
                    ));
                }
                None => {
                    return Err(Error::branch_not_found(
                        segments[..=depth].join(DELIMITER),
                    ));
                }
            };
        }
        Ok(node)
    }

    /// Entry stored directly under `name`
    pub fn entry(&self, name: &str) -> Option<&Arc<Entry>> {
        match self.children.get(name) {
            Some(Child::Entry(entry)) => Some(entry),
            _ => None,
        }
    }

    /// The wildcard template of this namespace, if any
    pub fn template(&self) -> Option<&Arc<Entry>> {
        self.entry(WILDCARD)
    }

    /// Concrete entries directly under this node, ordered by name
    pub fn entries(&self) -> Vec<(String, Arc<Entry>)> {
        self.children
            .iter()
            .filter(|(name, _)| name.as_str() != WILDCARD)
            .filter_map(|(name, child)| match child {
                Child::Entry(entry) => Some((name.clone(), Arc::clone(entry))),
                Child::Branch(_) => None,
            })
            .collect()
    }

    /// Store `entry` under `name`
    ///
    /// Returns the replaced entry when `override_existing` allowed a swap.
    /// A namespace is never replaced by an entry.
    pub(crate) fn insert_entry(
        &mut self,
        name: &str,
        entry: Arc<Entry>,
        override_existing: bool,
        provides: &str,
    ) -> Result<Option<Arc<Entry>>> {
        match self.children.get(name) {
            Some(Child::Branch(_)) => Err(Error::already_provided(provides)),
            Some(Child::Entry(_)) if !override_existing => Err(Error::already_provided(provides)),
            _ => {
                let previous = self.children.insert(name.to_owned(), Child::Entry(entry));
                Ok(match previous {
                    Some(Child::Entry(previous)) => Some(previous),
                    _ => None,
                })
            }
        }
    }

    /// Child stored under `name`
    pub fn child(&self, name: &str) -> Option<&Child> {
        self.children.get(name)
    }

    /// Cache a materialized entry under a name that holds no child yet
    pub(crate) fn materialize(&mut self, name: &str, entry: Entry) -> Arc<Entry> {
        let entry = Arc::new(entry);
        self.children
            .insert(name.to_owned(), Child::Entry(Arc::clone(&entry)));
        entry
    }

    /// Depth-first walk collecting every entry with its full path
    pub(crate) fn walk(&self, prefix: &mut Vec<String>, out: &mut Vec<(String, Arc<Entry>)>) {
        for (name, child) in &self.children {
            prefix.push(name.clone());
            match child {
                Child::Branch(branch) => branch.walk(prefix, out),
                Child::Entry(entry) => out.push((prefix.join(DELIMITER), Arc::clone(entry))),
            }
            prefix.pop();
        }
    }

    /// Number of entries in this subtree, templates included
    pub fn len(&self) -> usize {
        self.children
            .values()
            .map(|child| match child {
                Child::Branch(branch) => branch.len(),
                Child::Entry(_) => 1,
            })
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
