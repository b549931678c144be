/// Creates a new [`Error`](crate::Error) from a format string.
///
/// The arguments are interpreted as by [`format!()`](std::format). Besides
/// the file and line, the error records the enclosing function, determined
/// at compile time.
///
/// When the format string has no arguments the message is not copied.
///
/// # Examples
///
/// ```
/// use whence::error;
///
/// fn parse_port(s: &str) -> whence::Error {
///     error!("invalid port {s:?}")
/// }
///
/// let error = parse_port("http");
/// assert_eq!(error.to_string(), "invalid port \"http\"");
/// assert!(error.call_site().function().ends_with("::parse_port"));
/// ```
#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => {
        $crate::__private::new_error(
            $crate::__private::format_args!($($arg)+),
            $crate::__private::function_path!(),
        )
    };
}

/// Wraps a cause in a new [`Error`](crate::Error) with a formatted message.
///
/// The first argument is the cause, any value accepted by
/// [`IntoCause`](crate::IntoCause). The rest is a format string with its
/// arguments.
///
/// ```
/// use whence::wrap;
///
/// let io_error = std::io::Error::other("permission denied");
/// let error = wrap!(io_error, "cannot open {}", "/etc/shadow");
/// assert_eq!(format!("{error:+}"), "cannot open /etc/shadow because permission denied");
/// ```
#[macro_export]
macro_rules! wrap {
    ($cause:expr, $($arg:tt)+) => {
        $crate::__private::wrap_error(
            $cause,
            $crate::__private::format_args!($($arg)+),
            $crate::__private::function_path!(),
        )
    };
}

/// Creates a new [`Error`](crate::Error) with a formatted message, decorated
/// with an error code.
///
/// ```
/// use whence::coded;
///
/// let user = "ada";
/// let error = coded!(404, "no user named {user}");
/// assert_eq!(error.code(), Some(404));
/// assert_eq!(error.to_string(), "no user named ada");
/// ```
#[macro_export]
macro_rules! coded {
    ($code:expr, $($arg:tt)+) => {
        $crate::__private::coded_error(
            $code,
            $crate::__private::format_args!($($arg)+),
            $crate::__private::function_path!(),
        )
    };
}

/// Creates a new [`Error`](crate::Error) with a formatted message that may
/// be retried once the given [`Duration`](std::time::Duration) has passed.
///
/// ```
/// use std::time::Duration;
///
/// use whence::retry;
///
/// let error = retry!(Duration::from_secs(30), "rate limited on shard {}", 4);
/// assert!(error.is_retryable());
/// assert_eq!(error.to_string(), "rate limited on shard 4");
/// ```
#[macro_export]
macro_rules! retry {
    ($wait:expr, $($arg:tt)+) => {
        $crate::__private::retry_error(
            $wait,
            $crate::__private::format_args!($($arg)+),
            $crate::__private::function_path!(),
        )
    };
}

/// Return early with an error.
///
/// Constructs a new error using the same arguments as the [`error!`] macro,
/// and then returns early from the function with that error wrapped in an
/// `Err`.
///
/// This is equivalent to writing `return Err(error!(...).into());`
///
/// # Examples
///
/// ```
/// use whence::prelude::*;
///
/// fn check_age(age: i32) -> whence::Result<u8> {
///     if !(0..=150).contains(&age) {
///         bail!("age {age} is out of range");
///     }
///     Ok(age as u8)
/// }
///
/// assert_eq!(check_age(-1).unwrap_err().to_string(), "age -1 is out of range");
/// ```
#[macro_export]
macro_rules! bail {
    ($($args:tt)+) => {
        return $crate::__private::Err($crate::error!($($args)+).into())
    };
}
