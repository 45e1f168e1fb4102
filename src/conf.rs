//! Layered client settings.

pub use formflow_conf::*;
