//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `crushlog_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    // Why: keep a tiny CLI probe to validate core crate wiring independently
    // from Flutter/FFI runtime setup.
    println!("crushlog_core ping={}", crushlog_core::ping());
    println!("crushlog_core version={}", crushlog_core::core_version());
    println!(
        "crushlog_core sanitize_demo={:?}",
        crushlog_core::sanitize("  Test\u{2122}\u{0}  ")
    );
}
