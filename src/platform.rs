//! Process-level checks and signal handling.

use tracing::debug;

/// True when the process runs with superuser privileges.
#[cfg(unix)]
pub fn running_as_root() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
pub fn running_as_root() -> bool {
    false
}

/// Exit immediately on interrupt, quit and terminate; ignore hangup and the
/// user signals. Settings are written on every change, so nothing is flushed
/// here.
#[cfg(unix)]
pub fn install_signal_handlers() {
    extern "C" fn exit_on_signal(_signal: libc::c_int) {
        const NOTICE: &[u8] = b"\nInterrupt received. Exiting.\n";
        // SAFETY: write and _exit are async-signal-safe.
        unsafe {
            libc::write(libc::STDERR_FILENO, NOTICE.as_ptr().cast(), NOTICE.len());
            libc::_exit(0);
        }
    }

    // SAFETY: the handler only calls async-signal-safe functions.
    unsafe {
        for signal in [libc::SIGINT, libc::SIGQUIT, libc::SIGTERM] {
            libc::signal(signal, exit_on_signal as libc::sighandler_t);
        }
        for signal in [libc::SIGHUP, libc::SIGUSR1, libc::SIGUSR2] {
            libc::signal(signal, libc::SIG_IGN);
        }
    }
    debug!("signal handlers installed");
}

/// Ctrl+C already terminates the process on this platform.
#[cfg(not(unix))]
pub fn install_signal_handlers() {
    debug!("using default signal handling");
}
