// Wed Mar 11 2026 - Alex

pub mod driver;
pub mod error;
pub mod layout;
pub mod names;
pub mod resolve;
pub mod vtable;

pub use driver::{ImportStats, Importer};
pub use error::ImportError;
pub use layout::LayoutMode;
pub use names::{unaligned_struct_name, vtable_struct_name};
pub use resolve::fundamental_type;
