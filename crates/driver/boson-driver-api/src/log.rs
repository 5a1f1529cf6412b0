//! Driver logging facade.
//!
//! Drivers log through a single process-wide print function installed by the
//! host environment. The default is a no-op, so a freestanding build with no
//! console attached pays nothing. The function pointer lives in an
//! `AtomicPtr` so installation is safe from any context and visible to all
//! subsequent logging calls.

use core::fmt;
use core::sync::atomic::{AtomicPtr, Ordering};

/// The signature of the global print function.
pub type PrintFn = fn(fmt::Arguments<'_>);

fn null_print(_args: fmt::Arguments<'_>) {}

static PRINT_FN: AtomicPtr<()> = AtomicPtr::new(null_print as *mut ());

/// Installs the global print function.
///
/// May be called more than once; later installations replace earlier ones.
/// Uses `Release` ordering so subsequent loads see the new function.
///
/// # Safety
///
/// The provided function must be safe to call from any context the drivers
/// log from, including interrupt context.
pub unsafe fn set_print_fn(f: PrintFn) {
    PRINT_FN.store(f as *mut (), Ordering::Release);
}

/// Loads the current print function from the atomic pointer.
#[inline]
fn load_print_fn() -> PrintFn {
    let ptr = PRINT_FN.load(Ordering::Acquire);
    // SAFETY: Only valid `PrintFn` pointers (or the initial `null_print`)
    // are ever stored into PRINT_FN.
    unsafe { core::mem::transmute::<*mut (), PrintFn>(ptr) }
}

/// Implementation detail for [`dprint!`] / [`dprintln!`]. Not public API.
#[doc(hidden)]
pub fn _print(args: fmt::Arguments<'_>) {
    load_print_fn()(args);
}

/// Prints to the installed driver log sink.
#[macro_export]
macro_rules! dprint {
    ($($arg:tt)*) => { $crate::log::_print(format_args!($($arg)*)) };
}

/// Prints to the installed driver log sink with a trailing newline.
#[macro_export]
macro_rules! dprintln {
    () => { $crate::dprint!("\n") };
    ($($arg:tt)*) => { $crate::dprint!("{}\n", format_args!($($arg)*)) };
}
