//! Structural elements module

mod component;
mod element;
mod node;
mod section;
mod support;

pub use component::{AssemblyKind, ComponentAssembly};
pub use element::{Element, ElementKind};
pub use node::Node;
pub use section::Section;
pub use support::{ElasticSupport, FixedSupport, Support};
