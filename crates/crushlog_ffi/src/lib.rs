//! Flutter-facing FFI crate for CrushLog.

pub mod api;
