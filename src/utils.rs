// ============================================================================
// Debug logging
//
// In the browser, messages go to `console.debug`. Native builds print to
// stderr only with the `debug` feature, so tests and release binaries stay
// quiet.
// ============================================================================

/// Whether `debug_log!` does anything in this build.
#[inline(always)]
pub const fn logging_enabled() -> bool {
    cfg!(any(target_arch = "wasm32", feature = "debug"))
}

#[cfg(target_arch = "wasm32")]
pub fn log_debug(msg: &str) {
    web_sys::console::debug_1(&wasm_bindgen::JsValue::from_str(msg));
}

#[cfg(not(target_arch = "wasm32"))]
pub fn log_debug(msg: &str) {
    if logging_enabled() {
        eprintln!("{msg}");
    }
}

/// `format!`-style debug logging. Arguments are not formatted at all when
/// logging is disabled.
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        if $crate::utils::logging_enabled() {
            $crate::utils::log_debug(&format!($($arg)*));
        }
    };
}
