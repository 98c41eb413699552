/*!
Macros for internal use across the assembler.
!*/

/// Fails with [`crate::Error::Argument`] unless `$val` lies within `$lo..=$hi`.
macro_rules! ensure_range {
    ($val:expr, $lo:expr, $hi:expr, $what:expr) => {
        if $val < $lo || $val > $hi {
            arg_bail!(
                "{} must be in {}..={}, got {}",
                $what,
                $lo,
                $hi,
                $val
            );
        }
    };
}
