//! Running async generation from synchronous callers.

use std::future::Future;
use std::io;

use tokio::runtime::{Builder, Handle, RuntimeFlavor};

/// Drive `future` to completion on a tokio runtime, blocking the caller.
///
/// Inside a multi-threaded runtime the current worker is handed over with
/// `block_in_place`; outside any runtime a current-thread runtime is built
/// for the call. A current-thread runtime cannot be blocked on from within.
pub(crate) fn block_on<F: Future>(future: F) -> io::Result<F::Output> {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::CurrentThread => Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "cannot block inside a current-thread tokio runtime",
        )),
        Ok(handle) => Ok(tokio::task::block_in_place(|| handle.block_on(future))),
        Err(_) => {
            let runtime = Builder::new_current_thread().enable_all().build()?;
            Ok(runtime.block_on(future))
        }
    }
}
