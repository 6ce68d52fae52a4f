// Internal support shared across the library.

pub mod error;
