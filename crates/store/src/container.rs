// standard library
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// internal modules
use crate::error::Error;

// external crates
use serde::{Deserialize, Serialize};

/// Storage used for every nested container of a store
///
/// Accepts `"map"` (or the alias `"dict"`) and `"list"` when parsed from a
/// string or deserialised.
///
/// ```rust
/// # use endftools_store::ArrayType;
/// assert_eq!("dict".parse::<ArrayType>().unwrap(), ArrayType::Map);
/// assert_eq!("list".parse::<ArrayType>().unwrap(), ArrayType::List);
/// assert!("tuple".parse::<ArrayType>().is_err());
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrayType {
    /// Ordered mapping from integer key to child
    #[default]
    #[serde(alias = "dict")]
    Map,
    /// Dense sequence of children
    List,
}

impl FromStr for ArrayType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "map" | "dict" => Ok(Self::Map),
            "list" => Ok(Self::List),
            _ => Err(Error::UnknownArrayType(s.to_string())),
        }
    }
}

impl fmt::Display for ArrayType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Map => write!(f, "map"),
            Self::List => write!(f, "list"),
        }
    }
}

/// Single node in the tree of a stored variable
///
/// Serialises to plain JSON, i.e. a value, an object keyed by the integer
/// index, or an array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node<V> {
    /// Terminal value
    Value(V),
    /// Children keyed by shifted index
    Map(BTreeMap<i64, Node<V>>),
    /// Children stored densely from index 0
    List(Vec<Node<V>>),
}

impl<V> Node<V> {
    /// Empty container of the requested type
    pub fn container(array_type: ArrayType) -> Self {
        match array_type {
            ArrayType::Map => Self::Map(BTreeMap::new()),
            ArrayType::List => Self::List(Vec::new()),
        }
    }

    /// Reference to the terminal value, if this node is one
    pub fn as_value(&self) -> Option<&V> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Mutable reference to the terminal value, if this node is one
    pub fn as_value_mut(&mut self) -> Option<&mut V> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    /// True for both map and list nodes
    pub fn is_container(&self) -> bool {
        !matches!(self, Self::Value(_))
    }

    /// Number of direct children, zero for a value
    pub fn len(&self) -> usize {
        match self {
            Self::Value(_) => 0,
            Self::Map(map) => map.len(),
            Self::List(list) => list.len(),
        }
    }

    /// True if there are no direct children
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Child at a shifted index, if present
    pub fn child(&self, key: i64) -> Option<&Node<V>> {
        match self {
            Self::Value(_) => None,
            Self::Map(map) => map.get(&key),
            Self::List(list) => usize::try_from(key).ok().and_then(|i| list.get(i)),
        }
    }

    /// Terminal values in storage order, descending depth first
    pub fn values(&self) -> Vec<&V> {
        match self {
            Self::Value(v) => vec![v],
            Self::Map(map) => map.values().flat_map(|n| n.values()).collect(),
            Self::List(list) => list.iter().flat_map(|n| n.values()).collect(),
        }
    }

    /// Child at a shifted index, inserting `fill` if missing
    ///
    /// Lists only ever grow by appending at the end. Callers are expected to
    /// have rejected any other out of range key beforehand.
    pub(crate) fn child_mut(&mut self, key: i64, fill: Option<Node<V>>) -> Option<&mut Node<V>> {
        match self {
            Self::Value(_) => None,
            Self::Map(map) => match fill {
                Some(fill) => Some(map.entry(key).or_insert(fill)),
                None => map.get_mut(&key),
            },
            Self::List(list) => {
                let index = usize::try_from(key).ok()?;
                if index == list.len() {
                    list.extend(fill);
                }
                list.get_mut(index)
            }
        }
    }
}

#[cfg(test)]
mod node_tests {
    use super::*;

    #[test]
    fn array_type_serde() {
        let t: ArrayType = serde_json::from_str("\"dict\"").unwrap();
        assert_eq!(t, ArrayType::Map);
        let t: ArrayType = serde_json::from_str("\"list\"").unwrap();
        assert_eq!(t, ArrayType::List);
        assert_eq!(serde_json::to_string(&ArrayType::Map).unwrap(), "\"map\"");
        assert!(serde_json::from_str::<ArrayType>("\"tuple\"").is_err());
    }

    #[test]
    fn list_appends_only_at_end() {
        let mut node: Node<i32> = Node::container(ArrayType::List);
        assert!(node.child_mut(0, Some(Node::Value(1))).is_some());
        assert!(node.child_mut(1, Some(Node::Value(2))).is_some());
        assert!(node.child_mut(3, Some(Node::Value(4))).is_none());
        assert!(node.child_mut(-1, Some(Node::Value(4))).is_none());
        assert_eq!(node.len(), 2);
        assert_eq!(node.values(), vec![&1, &2]);
    }

    #[test]
    fn map_keeps_existing() {
        let mut node: Node<i32> = Node::container(ArrayType::Map);
        node.child_mut(-5, Some(Node::Value(1)));
        node.child_mut(-5, Some(Node::Value(2)));
        assert_eq!(node.child(-5).and_then(Node::as_value), Some(&1));
        assert!(node.child_mut(7, None).is_none());
    }

    #[test]
    fn serialise_plain_json() {
        let mut node: Node<f64> = Node::container(ArrayType::Map);
        node.child_mut(2, Some(Node::Value(1.5)));
        assert_eq!(serde_json::to_string(&node).unwrap(), r#"{"2":1.5}"#);

        let mut node: Node<f64> = Node::container(ArrayType::List);
        node.child_mut(0, Some(Node::Value(1.5)));
        assert_eq!(serde_json::to_string(&node).unwrap(), "[1.5]");
    }
}
