pub mod field;
pub mod schema;
pub mod value;

// Re-export key types for easier access from other stackwork modules (and lib.rs)
pub use field::{Coercer, DefaultValue, FieldSpec};
pub use schema::Schema;
pub use value::{options, Options, Value};
