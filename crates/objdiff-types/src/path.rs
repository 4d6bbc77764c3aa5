//! Node paths: root-relative sequences of element selectors.
//!
//! The root path is the empty sequence. Paths are immutable once built; use
//! [`NodePathBuilder`] (via [`NodePath::start_building`] or
//! [`NodePath::start_building_from`]) to derive new ones.
//!
//! # Rendering
//!
//! The root renders as `/`. Property selectors become `/name` segments,
//! while map keys and indexed items are appended as `{key}` and `[i]`.
//! Inside names and keys, `/ [ ] { }` and `\` are escaped with a
//! backslash:
//!
//! ```
//! use objdiff_types::NodePath;
//!
//! let path = NodePath::start_building()
//!     .property_name("addresses")
//!     .array_index(0)
//!     .property_name("street")
//!     .build();
//! assert_eq!(path.to_string(), "/addresses[0]/street");
//! assert_eq!("/addresses[0]/street".parse::<NodePath>().unwrap(), path);
//!
//! let odd = NodePath::start_building().property_name("a/b").build();
//! assert_eq!(odd.to_string(), r"/a\/b");
//! ```

use std::fmt::{self, Write as _};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TypeError;
use crate::selector::ElementSelector;

/// An ordered sequence of [`ElementSelector`]s leading from the root to a node.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodePath {
    elements: Vec<ElementSelector>,
}

impl NodePath {
    /// The root path.
    pub fn root() -> Self {
        Self::default()
    }

    /// Start building a path from the root.
    pub fn start_building() -> NodePathBuilder {
        NodePathBuilder::default()
    }

    /// Start building a path that extends `base`.
    pub fn start_building_from(base: &NodePath) -> NodePathBuilder {
        NodePathBuilder {
            elements: base.elements.clone(),
        }
    }

    /// Returns `true` if this is the root path.
    pub fn is_root(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of selectors in the path.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` for the root path.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The selectors, from the root downward.
    pub fn elements(&self) -> &[ElementSelector] {
        &self.elements
    }

    /// The selector of the node this path points at, or `None` for the root.
    pub fn last_element(&self) -> Option<&ElementSelector> {
        self.elements.last()
    }

    /// The path of the parent node, or `None` for the root.
    pub fn parent(&self) -> Option<NodePath> {
        let (_, init) = self.elements.split_last()?;
        Some(Self {
            elements: init.to_vec(),
        })
    }

    /// Returns `true` if both paths consist of the same selectors.
    pub fn matches(&self, other: &NodePath) -> bool {
        self == other
    }

    /// Returns `true` if `other` lies strictly below this path.
    pub fn is_parent_of(&self, other: &NodePath) -> bool {
        other.elements.len() > self.elements.len() && other.elements.starts_with(&self.elements)
    }

    /// Returns `true` if this path lies strictly below `other`.
    pub fn is_child_of(&self, other: &NodePath) -> bool {
        other.is_parent_of(self)
    }
}

impl fmt::Debug for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodePath({self})")
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("/")?;
        for (i, element) in self.elements.iter().enumerate() {
            match element {
                ElementSelector::Property(name) => {
                    if i > 0 {
                        f.write_str("/")?;
                    }
                    write_escaped(f, name)?;
                }
                ElementSelector::MapKey(key) => {
                    f.write_char('{')?;
                    write_escaped(f, key)?;
                    f.write_char('}')?;
                }
                other => write!(f, "{other}")?,
            }
        }
        Ok(())
    }
}

const DELIMITERS: [char; 6] = ['/', '[', ']', '{', '}', '\\'];

fn write_escaped(f: &mut fmt::Formatter<'_>, raw: &str) -> fmt::Result {
    for c in raw.chars() {
        if DELIMITERS.contains(&c) {
            f.write_char('\\')?;
        }
        f.write_char(c)?;
    }
    Ok(())
}

/// Split `input` at its first unescaped terminator, unescaping the head.
///
/// The returned rest starts at the terminator, or is empty if none was found.
fn take_escaped<'s>(
    input: &'s str,
    terminators: &[char],
) -> Result<(String, &'s str), &'static str> {
    let mut head = String::new();
    let mut chars = input.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, escaped)) => head.push(escaped),
                None => return Err("dangling '\\' at end of path"),
            },
            c if terminators.contains(&c) => return Ok((head, &input[i..])),
            c => head.push(c),
        }
    }
    Ok((head, ""))
}

impl FromStr for NodePath {
    type Err = TypeError;

    /// Parse the rendering produced by `Display`.
    ///
    /// Property, map key and array index segments are recognised. Collection
    /// items cannot be told apart from array indices in the rendered form and
    /// are therefore not parsed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| TypeError::InvalidPath {
            path: s.to_string(),
            reason: reason.to_string(),
        };

        let mut rest = s.strip_prefix('/').ok_or_else(|| invalid("must start with '/'"))?;
        let mut elements = Vec::new();

        while !rest.is_empty() {
            if let Some(tail) = rest.strip_prefix('[') {
                let end = tail.find(']').ok_or_else(|| invalid("unclosed '['"))?;
                let index = tail[..end]
                    .parse::<usize>()
                    .map_err(|_| invalid("array index must be a non-negative integer"))?;
                elements.push(ElementSelector::ArrayIndex(index));
                rest = &tail[end + 1..];
            } else if let Some(tail) = rest.strip_prefix('{') {
                let (key, after) = take_escaped(tail, &['}']).map_err(|reason| invalid(reason))?;
                rest = after.strip_prefix('}').ok_or_else(|| invalid("unclosed '{'"))?;
                elements.push(ElementSelector::MapKey(key));
            } else {
                if !elements.is_empty() {
                    rest = rest
                        .strip_prefix('/')
                        .ok_or_else(|| invalid("expected '/' before property name"))?;
                }
                let (name, after) =
                    take_escaped(rest, &['/', '[', '{']).map_err(|reason| invalid(reason))?;
                if name.is_empty() {
                    return Err(invalid("empty property name"));
                }
                elements.push(ElementSelector::Property(name));
                rest = after;
            }
        }

        Ok(Self { elements })
    }
}

impl From<Vec<ElementSelector>> for NodePath {
    fn from(elements: Vec<ElementSelector>) -> Self {
        elements.into_iter().collect()
    }
}

impl FromIterator<ElementSelector> for NodePath {
    fn from_iter<I: IntoIterator<Item = ElementSelector>>(iter: I) -> Self {
        iter.into_iter()
            .fold(NodePath::start_building(), NodePathBuilder::element)
            .build()
    }
}

/// Append-only builder for [`NodePath`].
///
/// Root selectors are dropped on the way in, so a built path never contains
/// one.
#[derive(Clone, Debug, Default)]
pub struct NodePathBuilder {
    elements: Vec<ElementSelector>,
}

impl NodePathBuilder {
    /// Append an arbitrary selector.
    pub fn element(mut self, selector: ElementSelector) -> Self {
        if !selector.is_root() {
            self.elements.push(selector);
        }
        self
    }

    /// Append a property selector.
    pub fn property_name(self, name: impl Into<String>) -> Self {
        self.element(ElementSelector::property(name))
    }

    /// Append several property selectors in order.
    pub fn property_names<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().fold(self, |builder, name| builder.property_name(name))
    }

    /// Append a map key selector.
    pub fn map_key(self, key: impl Into<String>) -> Self {
        self.element(ElementSelector::map_key(key))
    }

    /// Append a collection item selector.
    pub fn collection_item(self, item: &Value) -> Self {
        self.element(ElementSelector::collection_item(item))
    }

    /// Append an array index selector.
    pub fn array_index(self, index: usize) -> Self {
        self.element(ElementSelector::array_index(index))
    }

    /// Finish the path.
    pub fn build(self) -> NodePath {
        NodePath {
            elements: self.elements,
        }
    }
}
