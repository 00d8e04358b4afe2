// Résumé core: mapping a form document into the normalized schema, deriving
// the main/sidebar column split, and the derived visibility predicate.
// Everything here except `handlers` is synchronous and pure.

pub mod columns;
pub mod handlers;
pub mod mapper;
pub mod normalized;
pub mod visibility;
