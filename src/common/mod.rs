pub mod io;

/// Get the plain tool name by stripping the 'f' prefix.
/// e.g., "fabcalc" -> "abcalc"
#[inline]
pub fn tool_name(binary_name: &str) -> &str {
    binary_name.strip_prefix('f').unwrap_or(binary_name)
}

/// Reset SIGPIPE to default behavior (SIG_DFL).
/// Rust sets SIGPIPE to SIG_IGN by default, but a filter feeding a closed
/// pipe (e.g. `fabcalc -i big.vcf | head`) should be killed by SIGPIPE
/// instead of erroring out. This must be called at the start of main().
#[inline]
pub fn reset_sigpipe() {
    #[cfg(unix)]
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}

/// Format an IO error message without the "(os error N)" suffix.
/// Diagnostics print e.g. "No such file or directory" while Rust's
/// Display impl adds " (os error 2)". This strips the suffix.
pub fn io_error_msg(e: &std::io::Error) -> String {
    if let Some(raw) = e.raw_os_error() {
        let os_err = std::io::Error::from_raw_os_error(raw);
        let msg = format!("{}", os_err);
        msg.replace(&format!(" (os error {})", raw), "")
    } else {
        format!("{}", e)
    }
}
