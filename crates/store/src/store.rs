// standard library
use std::collections::BTreeMap;

// internal modules
use crate::container::{ArrayType, Node};
use crate::error::{Error, Result};
use crate::shift::ShiftTree;

// external crates
use log::trace;
use serde::Serialize;

/// Named variables, each a tree of index-shifted containers
///
/// Every nesting level of every variable remembers the first index it was
/// accessed with, and all later indices at that level are made relative to
/// it. Different branches of the same variable shift independently.
///
/// In [ArrayType::List] mode a shifted index must land inside the list or
/// exactly one past its end, so the following fails on the third access:
///
/// ```rust
/// # use endftools_store::{ArrayType, IndexedStore};
/// let mut store = IndexedStore::new(ArrayType::List);
/// store.set("x", &[12], 1).unwrap();
/// store.set("x", &[13], 2).unwrap();
/// assert!(store.set("x", &[10], 3).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct IndexedStore<V> {
    array_type: ArrayType,
    variables: BTreeMap<String, Node<V>>,
    roots: BTreeMap<String, usize>,
    shifts: ShiftTree,
}

impl<V> Default for IndexedStore<V> {
    fn default() -> Self {
        Self::new(ArrayType::default())
    }
}

impl<V> IndexedStore<V> {
    /// Empty store using the given container type for every variable
    pub fn new(array_type: ArrayType) -> Self {
        Self {
            array_type,
            variables: BTreeMap::new(),
            roots: BTreeMap::new(),
            shifts: ShiftTree::default(),
        }
    }

    /// Container type used for all nested levels
    pub fn array_type(&self) -> ArrayType {
        self.array_type
    }

    /// All variables by name
    pub fn variables(&self) -> &BTreeMap<String, Node<V>> {
        &self.variables
    }

    /// Consume the store, keeping only the stored variables
    pub fn into_variables(self) -> BTreeMap<String, Node<V>> {
        self.variables
    }

    /// True if a variable of this name has been created
    pub fn contains(&self, varname: &str) -> bool {
        self.variables.contains_key(varname)
    }

    /// Navigate to the node at `indices`, creating it if a default is given
    ///
    /// With no indices this refers to the variable itself. Without a default
    /// nothing is created and `Ok(None)` is returned for anything missing.
    /// With a default, any missing intermediate containers are created and the
    /// default is inserted at the final index if nothing is there yet.
    ///
    /// Start indices are fixed for every level this walks through, whether
    /// or not anything ends up being found.
    ///
    /// ```rust
    /// # use endftools_store::{ArrayType, IndexedStore};
    /// let mut store = IndexedStore::new(ArrayType::Map);
    ///
    /// assert!(store.get_or_create("xs", &[3, 1], None).unwrap().is_none());
    ///
    /// let node = store.get_or_create("xs", &[3, 1], Some(2.5)).unwrap().unwrap();
    /// assert_eq!(node.as_value(), Some(&2.5));
    ///
    /// // an existing value is never replaced by the default
    /// let node = store.get_or_create("xs", &[3, 1], Some(9.9)).unwrap().unwrap();
    /// assert_eq!(node.as_value(), Some(&2.5));
    /// ```
    pub fn get_or_create(
        &mut self,
        varname: &str,
        indices: &[i64],
        default: Option<V>,
    ) -> Result<Option<&mut Node<V>>> {
        let mut default = default;

        if !self.variables.contains_key(varname) {
            let Some(value) = default.take() else {
                return Ok(None);
            };
            trace!("Creating variable `{varname}`");
            if indices.is_empty() {
                let node = self
                    .variables
                    .entry(varname.to_string())
                    .or_insert(Node::Value(value));
                return Ok(Some(node));
            }
            self.variables
                .insert(varname.to_string(), Node::container(self.array_type));
            default = Some(value);
        }

        let Self {
            array_type,
            variables,
            roots,
            shifts,
        } = self;

        let Some(mut node) = variables.get_mut(varname) else {
            return Ok(None);
        };

        if indices.is_empty() {
            return Ok(Some(node));
        }

        let mut level = *roots
            .entry(varname.to_string())
            .or_insert_with(|| shifts.add());

        for (depth, &index) in indices.iter().enumerate() {
            let key = shifts.shift(level, index);
            let is_last = depth + 1 == indices.len();

            match &*node {
                Node::Value(_) => {
                    return Err(Error::NotAContainer {
                        varname: varname.to_string(),
                    })
                }
                Node::List(list) => {
                    let beyond = usize::try_from(key).map_or(true, |i| i > list.len());
                    if key < 0 || (beyond && default.is_some()) {
                        return Err(Error::IndexRange {
                            varname: varname.to_string(),
                            index,
                            effective: key,
                        });
                    }
                }
                Node::Map(_) => (),
            }

            let fill = match (&default, is_last) {
                (None, _) => None,
                (Some(_), true) => default.take().map(Node::Value),
                (Some(_), false) => Some(Node::container(*array_type)),
            };

            let Some(child) = node.child_mut(key, fill) else {
                return Ok(None);
            };
            node = child;

            if !is_last {
                level = shifts.child(level, key);
            }
        }

        Ok(Some(node))
    }

    /// Read-only lookup of the node at `indices`
    ///
    /// Uses the start indices fixed by earlier calls to
    /// [get_or_create()](IndexedStore::get_or_create) and never fixes new ones.
    /// Anything that was never accessed is reported as missing.
    pub fn get(&self, varname: &str, indices: &[i64]) -> Result<Option<&Node<V>>> {
        let Some(mut node) = self.variables.get(varname) else {
            return Ok(None);
        };

        if indices.is_empty() {
            return Ok(Some(node));
        }

        let Some(mut level) = self.roots.get(varname).copied() else {
            return Ok(None);
        };

        for (depth, &index) in indices.iter().enumerate() {
            let Some(key) = self.shifts.peek(level, index) else {
                return Ok(None);
            };

            if !node.is_container() {
                return Err(Error::NotAContainer {
                    varname: varname.to_string(),
                });
            }
            if matches!(node, Node::List(_)) && key < 0 {
                return Err(Error::IndexRange {
                    varname: varname.to_string(),
                    index,
                    effective: key,
                });
            }

            let Some(child) = node.child(key) else {
                return Ok(None);
            };
            node = child;

            if depth + 1 < indices.len() {
                let Some(next) = self.shifts.peek_child(level, key) else {
                    return Ok(None);
                };
                level = next;
            }
        }

        Ok(Some(node))
    }

    /// Store a value at `indices`, replacing whatever was there
    pub fn set(&mut self, varname: &str, indices: &[i64], value: V) -> Result<()>
    where
        V: Clone,
    {
        if let Some(node) = self.get_or_create(varname, indices, Some(value.clone()))? {
            match node.as_value_mut() {
                Some(current) => *current = value,
                None => *node = Node::Value(value),
            }
        }
        Ok(())
    }
}

impl<V: Serialize> IndexedStore<V> {
    /// Serialise all variables to a JSON object
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.variables)?)
    }
}

#[cfg(test)]
mod store_tests {
    use super::*;

    #[test]
    fn missing_without_default() {
        let mut store: IndexedStore<f64> = IndexedStore::new(ArrayType::List);
        assert!(store.get_or_create("x", &[], None).unwrap().is_none());
        assert!(store.get_or_create("x", &[1, 2], None).unwrap().is_none());
        assert!(!store.contains("x"));
    }

    #[test]
    fn scalar_variable() {
        let mut store = IndexedStore::new(ArrayType::List);
        let node = store.get_or_create("awr", &[], Some(233.0)).unwrap().unwrap();
        assert_eq!(node.as_value(), Some(&233.0));
        let err = store.get_or_create("awr", &[1], Some(1.0)).unwrap_err();
        assert!(matches!(err, Error::NotAContainer { .. }));
    }

    #[test]
    fn nested_levels_shift_independently() {
        let mut store = IndexedStore::new(ArrayType::List);
        store.set("b", &[1, 5], 10).unwrap();
        store.set("b", &[1, 6], 11).unwrap();
        store.set("b", &[2, 3], 20).unwrap();
        store.set("b", &[2, 4], 21).unwrap();

        let b = store.get("b", &[]).unwrap().unwrap();
        assert_eq!(b.len(), 2);
        assert_eq!(b.values(), vec![&10, &11, &20, &21]);
        assert_eq!(store.get("b", &[2, 4]).unwrap().unwrap().as_value(), Some(&21));
        assert!(store.get("b", &[3, 1]).unwrap().is_none());
    }

    #[test]
    fn get_does_not_fix_start() {
        let mut store = IndexedStore::new(ArrayType::List);
        store.set("e", &[2, 1], 1).unwrap();

        // second level below index 3 never accessed
        assert!(store.get("e", &[3, 7]).unwrap().is_none());

        // so its start index is still free to be fixed here
        store.set("e", &[3, 9], 2).unwrap();
        assert_eq!(store.get("e", &[3, 9]).unwrap().unwrap().as_value(), Some(&2));
        assert!(store.get("e", &[3, 7]).is_err());
    }

    #[test]
    fn overwrite_value() {
        let mut store = IndexedStore::new(ArrayType::Map);
        store.set("q", &[4], 1).unwrap();
        store.set("q", &[4], 2).unwrap();

        let variables = store.into_variables();
        let q = &variables["q"];
        assert!(q.is_container());
        assert!(!q.child(0).unwrap().is_container());
        assert_eq!(q.values(), vec![&2]);
    }

    #[test]
    fn get_through_value() {
        let mut store = IndexedStore::new(ArrayType::List);
        store.set("x", &[1, 1], 1.0).unwrap();
        // replaces the whole second level
        store.set("x", &[1], 2.0).unwrap();
        assert!(matches!(
            store.get("x", &[1, 1]),
            Err(Error::NotAContainer { .. })
        ));
    }

    #[test]
    fn json_output() {
        let mut store = IndexedStore::new(ArrayType::List);
        store.set("a", &[1], 0.5).unwrap();
        store.set("a", &[2], 0.25).unwrap();
        store.set("z", &[], 1.0).unwrap();
        assert_eq!(store.to_json().unwrap(), r#"{"a":[0.5,0.25],"z":1.0}"#);
    }
}
