//! Macros for reporting unrecoverable errors.
//!
//! Errors in the library are propagated as `io::Result` values. The command
//! line program uses these macros to print them and exit with a non-zero code.
//! With the `for-testing` feature enabled they panic instead, so that failures
//! show up in test output.

/// Prints the given message to standard error and terminates the program.
#[cfg(not(feature = "for-testing"))]
#[macro_export]
macro_rules! exit_with_error {
    ($($print_arg:tt)*) => {{
        eprintln!($($print_arg)*);
        quit::with_code(1);
    }};
}

#[cfg(feature = "for-testing")]
#[macro_export]
macro_rules! exit_with_error {
    ($($print_arg:tt)*) => {{
        panic!($($print_arg)*);
    }};
}

/// Unwraps the given result, or exits with the given message
/// where the last `{}` is substituted with the error.
#[macro_export]
macro_rules! exit_on_error {
    ($result:expr, $($print_arg:tt)*) => {
        match $result {
            Ok(value) => value,
            Err(err) => {
                $crate::exit_with_error!($($print_arg)*, err)
            }
        }
    };
}

/// Exits with the given message unless the given condition holds.
#[macro_export]
macro_rules! exit_on_false {
    ($logic:expr, $($print_arg:tt)*) => {
        if $logic {
            true
        } else {
            $crate::exit_with_error!($($print_arg)*)
        }
    };
}

/// Unwraps the given option, or exits with the given message.
#[macro_export]
macro_rules! exit_on_none {
    ($option:expr, $($print_arg:tt)*) => {
        $option.unwrap_or_else(|| $crate::exit_with_error!($($print_arg)*))
    };
}
