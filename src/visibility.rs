// Visibilidade linha a linha: quem enxerga quais obras e registros
// ligados a elas dentro do tenant.

pub mod filter;
pub mod policy;
pub mod resolver;

pub use filter::RowFilter;
pub use policy::{ProjectAccess, Relations, ResourceKind};
pub use resolver::VisibilityResolver;
