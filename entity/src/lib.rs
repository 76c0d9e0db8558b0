//! sea-orm entities for the RH suite schema.

pub mod employees;
