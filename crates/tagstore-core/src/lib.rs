//! # tagstore-core
//!
//! Typed tag trees persisted in flat, dotted-path configuration stores.
//!
//! A tag tree is a [`Compound`] of named [`TaggedValue`]s, each either a
//! scalar of a fixed width (`string`, `int`, `long`, `short`, `byte`, `float`,
//! `double`), a nested compound, or an ordered [`List`]. The [`codec`] module
//! explodes such a tree into a [`FlatStore`] (every node becomes a
//! discriminator key plus a payload key) and reassembles it losslessly,
//! including scalar widths and list order.
//!
//! ## Quick start
//!
//! ```rust
//! use tagstore_core::{decode_compound, encode_compound, Compound, List, YamlDocument};
//!
//! let mut drops = List::new();
//! drops.push("bone");
//! drops.push(3i8);
//!
//! let tree = Compound::new()
//!     .with("name", "Skeleton King").unwrap()
//!     .with("health", 250i32).unwrap()
//!     .with("drops", drops).unwrap();
//!
//! let mut store = YamlDocument::new();
//! encode_compound(&tree, &mut store, "mobs.boss").unwrap();
//! assert_eq!(decode_compound(&store, "mobs.boss").unwrap(), tree);
//! ```
//!
//! ## Modules
//!
//! - [`types`]: `TaggedValue`, `Compound`, `List`, `TagKind`
//! - [`codec`]: tree ⇄ flat store encode/decode
//! - [`store`]: the `FlatStore` trait and its `Leaf` scalars
//! - [`document`]: `YamlDocument`, an in-memory YAML-backed `FlatStore`
//! - [`settings`]: file-backed YAML settings with fallbacks and defaults
//! - [`path`]: dotted path construction
//! - [`error`]: error types

pub mod codec;
pub mod document;
pub mod error;
pub mod path;
pub mod settings;
pub mod store;
pub mod types;

pub use codec::{decode_compound, decode_list, encode_compound, encode_list};
pub use document::YamlDocument;
pub use error::TagStoreError;
pub use settings::Settings;
pub use store::{FlatStore, Leaf};
pub use types::{Compound, List, TagKind, TaggedValue};
