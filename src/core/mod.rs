pub mod color;
pub mod cube;
pub mod dimension;
pub mod domain;
pub mod types;

pub use color::{Color, Palette};
pub use cube::{Cell, CellKey, Cube, CubeBuilder};
pub use dimension::{
    CategoryKind, CategorySpec, ColorRule, Dimension, DimensionSpec, DimensionSpecs, GroupSpec,
    OpacityRule, OrderPolicy, RangeScope, ScopePolicy, StackMode, ValueSpec,
};
pub use domain::{DomainResolver, FacetDomain, GroupEntry, ResolvedDomains, ScrollDomain, ValueRange};
pub use types::{Record, Scalar, ScalarKey};
