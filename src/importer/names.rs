// Wed Mar 11 2026 - Alex

use std::borrow::Cow;

/// Prefix for the tail-padding-reusable variant of a record.
pub const UNALIGNED_PREFIX: &str = "$$";

/// The registry dislikes names starting with a parenthesis (lambdas,
/// anonymous types); prefix them for compatibility.
pub fn escape_name(name: &str) -> Cow<'_, str> {
    if name.starts_with('(') {
        Cow::Owned(format!("__{}", name))
    } else {
        Cow::Borrowed(name)
    }
}

/// Name of the unaligned variant registered alongside every record.
pub fn unaligned_struct_name(name: &str) -> String {
    format!("{}{}", UNALIGNED_PREFIX, name)
}

/// Name of the vtable layout struct for a record.
pub fn vtable_struct_name(name: &str) -> String {
    let base = name.strip_prefix(UNALIGNED_PREFIX).unwrap_or(name);
    format!("{}_vtbl", base)
}

/// Hexadecimal this-adjustment suffix for thunk slot names; the sign is
/// spelled `m` so the result stays a valid identifier.
pub fn format_this_adjustment(adjustment: i64) -> String {
    if adjustment < 0 {
        format!("m0x{:x}", adjustment.unsigned_abs())
    } else {
        format!("0x{:x}", adjustment)
    }
}
