//! xmlq: CSS-style selector queries over XML trees.
//!
//! A [`Context`] wraps a parsed document and a current node set, and
//! exposes chainable query operations in the manner of jQuery:
//!
//! ```
//! use xmlq::{Context, SimpleNode};
//!
//! let q: Context<SimpleNode> =
//!     Context::parse_str(r#"<doc><items><item id="1"/><item id="2"/></items></doc>"#)?;
//!
//! let items = q.find("items > item")?;
//! assert_eq!(items.len(), 2);
//! assert_eq!(items.first().attr("id").as_deref(), Some("1"));
//! # Ok::<(), xmlq::Error>(())
//! ```
//!
//! Selectors support descendant search (`a b`), child (`a > b`) and
//! adjacent sibling (`a + b`) combinators, the `*` wildcard, attribute
//! equality tests (`a[id="1"]`) and namespace prefixes (`ns:a`)
//! resolved through prefixes registered with
//! [`Context::add_namespace`].
//!
//! The engine is tree-agnostic: it navigates any type implementing
//! [`XmlNode`]. [`SimpleNode`] is the bundled Arc-backed adapter with
//! its own small XML reader; embedders can wrap an existing DOM
//! instead.

pub mod axes;
pub mod context;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod model;
pub mod namespace;
pub mod nodelist;
pub mod parser;
pub mod selector;
pub mod serialize;
pub mod simple_node;

pub use context::Context;
pub use error::{Error, Result};
pub use model::{DocumentParser, NodeKind, QName, XmlNode};
pub use namespace::NamespaceTable;
pub use nodelist::NodeList;
pub use parser::compile;
pub use selector::{CompileMode, NameTest, NsSpec, Selector, StepOp};
pub use simple_node::SimpleNode;
