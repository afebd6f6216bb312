//! API-facing helpers shared by REST modules.

pub mod problem;
