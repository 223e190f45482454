//! Accessors binding typed values to targets

mod list;
mod value;

pub use list::ListAccessor;
pub use value::ValueAccessor;
