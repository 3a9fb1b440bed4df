//! Foreign Function Interface (FFI) for C/C++ interoperability
//!
//! A context handle owns precision, the function table and the power-of-ten cache.
//! Every evaluation returns an [`MpResult`] by value, so nothing has to be freed per
//! call.
//!
//! # Example Usage
//!
//! ```c
//! MpContext* ctx = mp_context_new();
//! mp_context_set_precision(ctx, 5);
//!
//! MpResult r = mp_eval(ctx, "1 / 3.0");
//! if (r.status == 0) {
//!     printf("%s\n", r.text);           // .33333
//! } else {
//!     fprintf(stderr, "%s\n", r.text);  // the error message
//! }
//!
//! const char* args[] = { "255", "2.5" };
//! r = mp_format(ctx, "%x %.2f", args, 2);  // "0xff 2.50"
//!
//! mp_context_free(ctx);
//! ```

use crate::context::EvalContext;
use crate::engine::eval;
use crate::error::ExprError;
use crate::format::{OutputSink, format_numbers};
use crate::{Box, String, ToString, Vec};
use core::ffi::{CStr, c_char};

/// Size of the text buffer of an [`MpResult`], terminator included.
pub const MP_RESULT_BUFFER_SIZE: usize = 256;

/// FFI error codes (negative to distinguish from ExprError codes)
pub const FFI_ERROR_NULL_POINTER: i32 = -1;
pub const FFI_ERROR_INVALID_UTF8: i32 = -2;

/// Result structure for FFI operations
#[repr(C)]
pub struct MpResult {
    /// 0 for success, positive for an ExprError, negative for FFI errors
    pub status: i32,
    /// Kind of a successful result: 0 integer, 1 rational, 2 string
    pub kind: i32,
    /// Length of the full text, which is truncated when it does not fit `text`
    pub length: usize,
    /// Rendered result, or the error message, NUL terminated
    pub text: [c_char; MP_RESULT_BUFFER_SIZE],
}

impl MpResult {
    fn with_text(status: i32, kind: i32, msg: &str) -> Self {
        let mut text = [0 as c_char; MP_RESULT_BUFFER_SIZE];
        let bytes = msg.as_bytes();
        let copy_len = core::cmp::min(bytes.len(), MP_RESULT_BUFFER_SIZE - 1);
        for (slot, byte) in text.iter_mut().zip(&bytes[..copy_len]) {
            *slot = *byte as c_char;
        }
        MpResult {
            status,
            kind,
            length: bytes.len(),
            text,
        }
    }

    fn success(kind: i32, text: &str) -> Self {
        Self::with_text(0, kind, text)
    }

    fn from_expr_error(err: ExprError) -> Self {
        Self::with_text(err.error_code(), -1, &err.to_string())
    }

    fn from_ffi_error(code: i32, msg: &str) -> Self {
        Self::with_text(code, -1, msg)
    }

    /// The text as a Rust string, up to the terminator.
    pub fn text(&self) -> String {
        let bytes: Vec<u8> = self
            .text
            .iter()
            .take_while(|c| **c != 0)
            .map(|c| *c as u8)
            .collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

/// Opaque type for evaluation context
#[repr(C)]
pub struct MpContext {
    _private: [u8; 0],
}

/// # Safety
/// `ptr` must be NULL or a valid NUL-terminated string.
unsafe fn c_str<'a>(ptr: *const c_char) -> Result<&'a str, MpResult> {
    if ptr.is_null() {
        return Err(MpResult::from_ffi_error(FFI_ERROR_NULL_POINTER, "null pointer"));
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|_| MpResult::from_ffi_error(FFI_ERROR_INVALID_UTF8, "invalid UTF-8"))
}

/// # Safety
/// `ctx` must be NULL or a pointer returned by [`mp_context_new`] and not yet freed.
unsafe fn context<'a>(ctx: *const MpContext) -> Option<&'a EvalContext> {
    if ctx.is_null() {
        None
    } else {
        Some(unsafe { &*(ctx as *const EvalContext) })
    }
}

/// Create a new evaluation context with default precision and all built-in functions.
///
/// # Safety
/// The returned pointer must be freed with mp_context_free()
#[unsafe(no_mangle)]
pub extern "C" fn mp_context_new() -> *mut MpContext {
    Box::into_raw(Box::new(EvalContext::new())) as *mut MpContext
}

/// Free an evaluation context
///
/// # Safety
/// - The pointer must have been created by mp_context_new()
/// - The pointer must not be used after calling this function
#[unsafe(no_mangle)]
pub extern "C" fn mp_context_free(ctx: *mut MpContext) {
    if ctx.is_null() {
        return;
    }
    unsafe {
        drop(Box::from_raw(ctx as *mut EvalContext));
    }
}

/// Set the number of decimal places. Returns 0, an ExprError code when the value is
/// out of range, or FFI_ERROR_NULL_POINTER.
#[unsafe(no_mangle)]
pub extern "C" fn mp_context_set_precision(ctx: *mut MpContext, precision: u32) -> i32 {
    if ctx.is_null() {
        return FFI_ERROR_NULL_POINTER;
    }
    let ctx = unsafe { &mut *(ctx as *mut EvalContext) };
    match ctx.set_precision(precision) {
        Ok(()) => 0,
        Err(err) => err.error_code(),
    }
}

/// Current number of decimal places, or FFI_ERROR_NULL_POINTER.
#[unsafe(no_mangle)]
pub extern "C" fn mp_context_get_precision(ctx: *const MpContext) -> i64 {
    match unsafe { context(ctx) } {
        Some(ctx) => ctx.precision() as i64,
        None => FFI_ERROR_NULL_POINTER as i64,
    }
}

/// Evaluate an expression and render its value.
///
/// # Safety
/// `ctx` must come from mp_context_new() and `expr` must be a NUL-terminated string.
#[unsafe(no_mangle)]
pub extern "C" fn mp_eval(ctx: *const MpContext, expr: *const c_char) -> MpResult {
    let Some(ctx) = (unsafe { context(ctx) }) else {
        return MpResult::from_ffi_error(FFI_ERROR_NULL_POINTER, "null context");
    };
    let expr = match unsafe { c_str(expr) } {
        Ok(expr) => expr,
        Err(result) => return result,
    };
    let rendered = eval(expr, ctx).and_then(|value| {
        let precision = ctx.precision() as usize;
        let text = ctx.with_ten_powers(|cache| value.render(precision, cache))?;
        Ok((value.kind().code(), text))
    });
    match rendered {
        Ok((kind, text)) => MpResult::success(kind, &text),
        Err(err) => MpResult::from_expr_error(err),
    }
}

/// printf-style formatting of numbers given as text. The result kind is always 2.
///
/// # Safety
/// `fmt` must be a NUL-terminated string and `args` must point to `n_args` of them
/// (it may be NULL when `n_args` is 0).
#[unsafe(no_mangle)]
pub extern "C" fn mp_format(
    ctx: *const MpContext,
    fmt: *const c_char,
    args: *const *const c_char,
    n_args: usize,
) -> MpResult {
    let Some(ctx) = (unsafe { context(ctx) }) else {
        return MpResult::from_ffi_error(FFI_ERROR_NULL_POINTER, "null context");
    };
    let fmt = match unsafe { c_str(fmt) } {
        Ok(fmt) => fmt,
        Err(result) => return result,
    };
    if args.is_null() && n_args > 0 {
        return MpResult::from_ffi_error(FFI_ERROR_NULL_POINTER, "null argument list");
    }
    let mut texts = Vec::with_capacity(n_args);
    for i in 0..n_args {
        match unsafe { c_str(*args.add(i)) } {
            Ok(text) => texts.push(text),
            Err(result) => return result,
        }
    }
    let mut sink = OutputSink::new();
    sink.divert();
    match format_numbers(&mut sink, fmt, &texts, ctx) {
        Ok(()) => MpResult::success(2, &sink.undivert().unwrap_or_default()),
        Err(err) => MpResult::from_expr_error(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    #[test]
    fn test_eval_roundtrip() {
        let ctx = mp_context_new();
        assert_eq!(mp_context_set_precision(ctx, 5), 0);
        assert_eq!(mp_context_get_precision(ctx), 5);

        let expr = CString::new("1 / 3.0").unwrap();
        let result = mp_eval(ctx, expr.as_ptr());
        assert_eq!(result.status, 0);
        assert_eq!(result.kind, 1);
        assert_eq!(result.text(), ".33333");

        let expr = CString::new("fact(20)").unwrap();
        let result = mp_eval(ctx, expr.as_ptr());
        assert_eq!(result.kind, 0);
        assert_eq!(result.text(), "2432902008176640000");

        mp_context_free(ctx);
    }

    #[test]
    fn test_errors() {
        let ctx = mp_context_new();
        let expr = CString::new("1 / 0").unwrap();
        let result = mp_eval(ctx, expr.as_ptr());
        assert_eq!(result.status, ExprError::DivideByZero.error_code());
        assert_eq!(result.text(), "divide by zero");

        assert_eq!(mp_context_set_precision(ctx, 20_000), 13);
        assert_eq!(mp_context_get_precision(ctx), 17);

        let result = mp_eval(ctx, core::ptr::null());
        assert_eq!(result.status, FFI_ERROR_NULL_POINTER);
        let result = mp_eval(core::ptr::null(), expr.as_ptr());
        assert_eq!(result.status, FFI_ERROR_NULL_POINTER);
        assert_eq!(mp_context_get_precision(core::ptr::null()), -1);

        let bad = [0xffu8, 0];
        let result = mp_eval(ctx, bad.as_ptr() as *const c_char);
        assert_eq!(result.status, FFI_ERROR_INVALID_UTF8);
        mp_context_free(ctx);
    }

    #[test]
    fn test_long_results_are_truncated() {
        let ctx = mp_context_new();
        let expr = CString::new("fact(200)").unwrap();
        let result = mp_eval(ctx, expr.as_ptr());
        assert_eq!(result.status, 0);
        assert_eq!(result.length, 375);
        assert_eq!(result.text().len(), MP_RESULT_BUFFER_SIZE - 1);
        mp_context_free(ctx);
    }

    #[test]
    fn test_format() {
        let ctx = mp_context_new();
        let fmt = CString::new("%x %.2f").unwrap();
        let a = CString::new("255").unwrap();
        let b = CString::new("2.5").unwrap();
        let args = [a.as_ptr(), b.as_ptr()];
        let result = mp_format(ctx, fmt.as_ptr(), args.as_ptr(), args.len());
        assert_eq!(result.status, 0);
        assert_eq!(result.text(), "0xff 2.50");
        mp_context_free(ctx);
    }
}
