//! Index-shifted nested containers for assembling ENDF array data
//!
//! Array quantities in ENDF recipes are addressed by indices that are natural
//! to the physics rather than to storage, e.g. Legendre orders starting at 1 or
//! energy points counted from some arbitrary offset. The [IndexedStore] keeps a
//! tree of nested containers per variable and transparently maps the supplied
//! indices onto dense storage.
//!
//! At every nesting level the first index ever seen becomes the start index
//! of that level, and all later accesses are shifted by it:
//!
//! ```rust
//! # use endftools_store::{ArrayType, IndexedStore};
//! let mut store = IndexedStore::new(ArrayType::List);
//!
//! // Legendre coefficients counted from 1
//! store.set("a", &[1], 0.5).unwrap();
//! store.set("a", &[2], 0.25).unwrap();
//!
//! // Stored densely from 0
//! let a = store.get("a", &[]).unwrap().unwrap();
//! assert_eq!(a.len(), 2);
//! assert_eq!(store.get("a", &[2]).unwrap().unwrap().as_value(), Some(&0.25));
//! ```
//!
//! The container type is chosen once per store by [ArrayType]:
//!
//! | Array type | Storage            | Shifted index                   |
//! | ---------- | ------------------ | ------------------------------- |
//! | `Map`      | ordered key/value  | any integer key                 |
//! | `List`     | dense sequence     | must be in `0..=len`, no gaps   |

mod container;
mod error;
mod shift;
mod store;

#[doc(inline)]
pub use container::{ArrayType, Node};

#[doc(inline)]
pub use store::IndexedStore;

#[doc(inline)]
pub use error::{Error, Result};
