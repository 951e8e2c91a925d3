//! Evaluation Parameters Module
//!
//! Tunable evaluation constants. In a normal build these are compile-time
//! constants; with the `eval_tuning` feature they are read from a global
//! struct that can be replaced at runtime from JSON.

#[cfg(feature = "eval_tuning")]
use once_cell::sync::Lazy;
#[cfg(feature = "eval_tuning")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "eval_tuning")]
use std::sync::RwLock;

use super::base::Value;

// ============================================================================
// DEFAULT VALUES
// ============================================================================

// Game phase interpolation bounds, in combined non-pawn material
pub const DEFAULT_MIDGAME_LIMIT: Value = 9000;
pub const DEFAULT_ENDGAME_LIMIT: Value = 2400;

// Material hash table slots per worker (rounded down to a power of two)
pub const DEFAULT_MATERIAL_TABLE_ENTRIES: usize = 8192;

// ============================================================================
// FEATURE-GATED RUNTIME CONFIGURATION
// ============================================================================

#[cfg(feature = "eval_tuning")]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalParams {
    pub midgame_limit: Value,
    pub endgame_limit: Value,
    pub material_table_entries: usize,
}

#[cfg(feature = "eval_tuning")]
impl Default for EvalParams {
    fn default() -> Self {
        Self {
            midgame_limit: DEFAULT_MIDGAME_LIMIT,
            endgame_limit: DEFAULT_ENDGAME_LIMIT,
            material_table_entries: DEFAULT_MATERIAL_TABLE_ENTRIES,
        }
    }
}

#[cfg(feature = "eval_tuning")]
impl EvalParams {
    fn is_valid(&self) -> bool {
        self.endgame_limit >= 0
            && self.endgame_limit < self.midgame_limit
            && self.material_table_entries > 0
    }
}

#[cfg(feature = "eval_tuning")]
pub static EVAL_PARAMS: Lazy<RwLock<EvalParams>> =
    Lazy::new(|| RwLock::new(EvalParams::default()));

/// Set evaluation parameters from a JSON string. Returns true on success.
/// Rejected input leaves the current parameters untouched.
#[cfg(feature = "eval_tuning")]
pub fn set_eval_params_from_json(json: &str) -> bool {
    match serde_json::from_str::<EvalParams>(json) {
        Ok(params) if params.is_valid() => {
            if let Ok(mut guard) = EVAL_PARAMS.write() {
                *guard = params;
                true
            } else {
                false
            }
        }
        Ok(params) => {
            crate::debug_log!("eval params rejected: {:?}", params);
            false
        }
        Err(e) => {
            crate::debug_log!("eval params rejected: {}", e);
            false
        }
    }
}

/// Get current evaluation parameters as a JSON string.
#[cfg(feature = "eval_tuning")]
pub fn get_eval_params_as_json() -> String {
    if let Ok(guard) = EVAL_PARAMS.read() {
        serde_json::to_string(&*guard).unwrap_or_else(|_| "{}".to_string())
    } else {
        "{}".to_string()
    }
}

// ============================================================================
// ACCESSORS
//
// With `eval_tuning` these read the global struct (falling back to the
// default if the lock is poisoned); without it they are constants.
// ============================================================================

#[cfg(feature = "eval_tuning")]
macro_rules! param {
    ($field:ident, $default:expr) => {{
        EVAL_PARAMS
            .read()
            .map(|params| params.$field)
            .unwrap_or($default)
    }};
}

#[cfg(feature = "eval_tuning")]
#[inline]
pub fn midgame_limit() -> Value {
    param!(midgame_limit, DEFAULT_MIDGAME_LIMIT)
}
#[cfg(not(feature = "eval_tuning"))]
#[inline]
pub const fn midgame_limit() -> Value {
    DEFAULT_MIDGAME_LIMIT
}

#[cfg(feature = "eval_tuning")]
#[inline]
pub fn endgame_limit() -> Value {
    param!(endgame_limit, DEFAULT_ENDGAME_LIMIT)
}
#[cfg(not(feature = "eval_tuning"))]
#[inline]
pub const fn endgame_limit() -> Value {
    DEFAULT_ENDGAME_LIMIT
}

#[cfg(feature = "eval_tuning")]
#[inline]
pub fn material_table_entries() -> usize {
    param!(material_table_entries, DEFAULT_MATERIAL_TABLE_ENTRIES)
}
#[cfg(not(feature = "eval_tuning"))]
#[inline]
pub const fn material_table_entries() -> usize {
    DEFAULT_MATERIAL_TABLE_ENTRIES
}
