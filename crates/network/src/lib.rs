//! AuthorMaps network core
//!
//! Resolves the co-authors of a PubMed author, counts the publications
//! each co-author pair shares and assembles the weighted co-author graph.

pub mod aggregator;
pub mod export;
pub mod graph;
pub mod name;
pub mod pipeline;
pub mod render;
pub mod resolver;

pub use aggregator::{PairwiseAggregator, SharedWork};
pub use export::NodeLinkData;
pub use graph::{AuthorNode, CoauthorGraph, Collaboration};
pub use name::AuthorName;
pub use pipeline::{build_author_map, resolve_and_build_graph, AuthorMap, Stage};
pub use render::{render_svg, write_image, RenderOptions};
pub use resolver::{CoauthorResolver, Resolution, ResolutionStatus};
