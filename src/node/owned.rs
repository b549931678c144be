use std::{borrow::Cow, error::Error as StdError, fmt, time::Duration};

use triomphe::Arc;
use whence_internals::CallSite;

use crate::{
    Cause, IntoCause,
    capability::{self, Capability},
    hooks,
    node::{
        frame::{Frame, Message},
        iter::Chain,
    },
    render::{self, Directive, Rendered, Verb},
};

/// An error that remembers where it was raised.
///
/// An `Error` is a node in a singly-linked chain: it holds a message, the
/// [`CallSite`] where it was created, and optionally the [`Cause`] it wraps.
/// Nodes are immutable; "adding" information to an error always creates a new
/// node wrapping the old one.
///
/// Two kinds of node exist:
///
/// - **Message nodes**, created by [`Error::new`], [`Error::wrap`] and the
///   [`error!`](crate::error!) / [`wrap!`](crate::wrap!) macros.
/// - **Capability decorators**, created by [`Error::with_code`] and
///   [`Error::with_retry`]. A decorator adds one queryable attribute and is
///   otherwise invisible: its message, call site and rendering are those of
///   the error it wraps.
///
/// `Error` is a cheap handle: cloning it shares the node. Equality compares
/// node identity, so two separately created errors with the same message are
/// not equal.
///
/// # Formatting
///
/// | Format     | Output                                   |
/// |------------|------------------------------------------|
/// | `{}`       | `message`                                |
/// | `{:?}`     | `file.rs(12):message`                    |
/// | `{:#?}`    | `crate::module/file.rs(12):message`      |
/// | `{:+?}`    | `file.rs(12):outer because file.rs(7):inner` |
/// | `{:-?}`    | one node per line                        |
/// | `{:>20?}`  | location padded to 20 characters         |
///
/// See [`render`](crate::render) for the full rendering rules.
///
/// # Examples
///
/// ```rust
/// use whence::Error;
///
/// let not_found = Error::new("not found");
/// let error = Error::wrap(not_found, "lookup failed");
///
/// assert_eq!(format!("{error}"), "lookup failed");
/// assert_eq!(format!("{error:+}"), "lookup failed because not found");
/// ```
#[derive(Clone)]
pub struct Error(Arc<Node>);

enum Node {
    Message {
        message: Cow<'static, str>,
        call_site: CallSite,
        cause: Option<Cause>,
    },
    Decorated {
        capability: Capability,
        call_site: CallSite,
        delegate: Cause,
    },
}

impl Error {
    /// Creates a chain root with the given message at the caller's location.
    ///
    /// ```rust
    /// let error = whence::Error::new("missing name");
    /// assert!(error.cause().is_none());
    /// ```
    #[track_caller]
    #[must_use]
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self::from_message(message.into(), None, hooks::collect_call_site(None))
    }

    /// Wraps `cause` in a new node with the given message, recorded at the
    /// caller's location.
    ///
    /// The whole chain below `cause` is preserved. To wrap an error that may
    /// be absent, use [`whence::wrap`](crate::wrap()) or
    /// [`OptionExt::wrap`](crate::OptionExt::wrap).
    ///
    /// ```rust
    /// use whence::Error;
    ///
    /// let io_error = std::io::Error::other("connection reset");
    /// let error = Error::wrap(io_error, "cannot load users");
    /// assert_eq!(format!("{error:+}"), "cannot load users because connection reset");
    /// ```
    #[track_caller]
    #[must_use]
    pub fn wrap(cause: impl IntoCause, message: impl Into<Cow<'static, str>>) -> Self {
        Self::from_message(
            message.into(),
            Some(cause.into_cause()),
            hooks::collect_call_site(None),
        )
    }

    /// Decorates `cause` with an error code.
    ///
    /// The code can be found from any error that wraps the result, see
    /// [`whence::code`](crate::code).
    #[track_caller]
    #[must_use]
    pub fn with_code(cause: impl IntoCause, code: i64) -> Self {
        Self::decorate(
            Capability::Code(code),
            cause.into_cause(),
            hooks::collect_call_site(None),
        )
    }

    /// Decorates `cause` as retryable once `wait` has passed.
    ///
    /// The retry instant is fixed now, at construction; it is not re-evaluated
    /// when queried.
    #[track_caller]
    #[must_use]
    pub fn with_retry(cause: impl IntoCause, wait: Duration) -> Self {
        Self::decorate(
            Capability::RetryAfter(capability::deadline(wait)),
            cause.into_cause(),
            hooks::collect_call_site(None),
        )
    }

    /// Creates a new chain root carrying an error code.
    ///
    /// Unwrapping the result yields the plain message node.
    ///
    /// ```rust
    /// let error = whence::Error::coded(404, "user not found");
    /// assert_eq!(error.code(), Some(404));
    /// assert_eq!(error.to_string(), "user not found");
    /// ```
    #[track_caller]
    #[must_use]
    pub fn coded(code: i64, message: impl Into<Cow<'static, str>>) -> Self {
        let call_site = hooks::collect_call_site(None);
        let root = Self::from_message(message.into(), None, call_site.clone());
        Self::decorate(Capability::Code(code), Cause::Chain(root), call_site)
    }

    /// Creates a new chain root that may be retried once `wait` has passed.
    #[track_caller]
    #[must_use]
    pub fn retryable(wait: Duration, message: impl Into<Cow<'static, str>>) -> Self {
        let call_site = hooks::collect_call_site(None);
        let root = Self::from_message(message.into(), None, call_site.clone());
        Self::decorate(
            Capability::RetryAfter(capability::deadline(wait)),
            Cause::Chain(root),
            call_site,
        )
    }

    pub(crate) fn from_message(
        message: Cow<'static, str>,
        cause: Option<Cause>,
        call_site: CallSite,
    ) -> Self {
        Self::from_node(Node::Message {
            message,
            call_site,
            cause,
        })
    }

    pub(crate) fn decorate(capability: Capability, delegate: Cause, call_site: CallSite) -> Self {
        Self::from_node(Node::Decorated {
            capability,
            call_site,
            delegate,
        })
    }

    fn from_node(node: Node) -> Self {
        let error = Self(Arc::new(node));
        hooks::run_creation_hooks(&error);
        error
    }

    /// The message of this node, without any of its causes.
    ///
    /// A decorator returns the message of the error it wraps.
    pub fn message(&self) -> Cow<'_, str> {
        match self.frame().message {
            Message::Text(text) => Cow::Borrowed(text),
            Message::Foreign(error) => Cow::Owned(error.to_string()),
        }
    }

    /// Where this node was created.
    ///
    /// A decorator returns the call site of the node it wraps; only when it
    /// wraps a foreign error does it return its own.
    pub fn call_site(&self) -> &CallSite {
        self.frame().call_site
    }

    /// The immediate cause, or `None` at a chain root.
    ///
    /// For a decorator this is the error it decorates.
    pub fn cause(&self) -> Option<&Cause> {
        match &*self.0 {
            Node::Message { cause, .. } => cause.as_ref(),
            Node::Decorated { delegate, .. } => Some(delegate),
        }
    }

    /// The capability this node adds, if it is a decorator.
    ///
    /// Only this node is inspected. Use [`code`](Self::code) or
    /// [`retry_after`](Self::retry_after) to search the whole chain.
    pub fn capability(&self) -> Option<&Capability> {
        match &*self.0 {
            Node::Message { .. } => None,
            Node::Decorated { capability, .. } => Some(capability),
        }
    }

    /// Follows [`cause`](Self::cause) until it ends and returns the last
    /// error.
    ///
    /// A foreign error is treated as a root of its own: its
    /// [`source`](StdError::source) is not followed.
    pub fn root_cause(&self) -> &(dyn StdError + 'static) {
        let mut current = self;
        loop {
            match current.cause() {
                None => return current,
                Some(Cause::Chain(next)) => current = next,
                Some(Cause::Foreign(foreign)) => return &**foreign,
            }
        }
    }

    /// Iterates over this error and everything reachable through
    /// [`source`](StdError::source), starting with `self`.
    pub fn chain(&self) -> Chain<'_> {
        Chain::new(self)
    }

    /// The number of nodes in this chain, counting foreign causes but not
    /// their own sources.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut current = self;
        while let Some(cause) = current.cause() {
            depth += 1;
            match cause {
                Cause::Chain(next) => current = next,
                Cause::Foreign(_) => break,
            }
        }
        depth
    }

    /// The first error code found in this chain.
    pub fn code(&self) -> Option<i64> {
        capability::code(self)
    }

    /// Returns `true` if some node of this chain carries an error code.
    pub fn has_code(&self) -> bool {
        capability::has_code(self)
    }

    /// The first retry instant found in this chain.
    pub fn retry_after(&self) -> Option<std::time::SystemTime> {
        capability::retryable_at(self)
    }

    /// Returns `true` if some node of this chain is retryable.
    pub fn is_retryable(&self) -> bool {
        capability::is_retryable(self)
    }

    /// The time left until the first retry instant in this chain, or zero once
    /// it has passed.
    pub fn retry_wait(&self) -> Option<Duration> {
        capability::retry_wait(self)
    }

    /// Renders this error according to `directive`.
    pub fn render(&self, directive: &Directive) -> String {
        render::render(self, directive)
    }

    /// The default description: short location and message, no causes.
    ///
    /// Equivalent to `format!("{self:?}")`.
    pub fn describe(&self) -> String {
        self.render(&Directive::DEFAULT)
    }

    /// Returns a value that displays this error with the given verb, taking
    /// the recursion flags, width and precision from the format string.
    ///
    /// ```rust
    /// use whence::{Error, Verb};
    ///
    /// fn find_user() -> Error {
    ///     whence::error!("no such user")
    /// }
    ///
    /// let error = find_user();
    /// assert!(format!("{}", error.display(Verb::Function)).starts_with("find_user("));
    /// ```
    pub fn display(&self, verb: Verb) -> Rendered<'_> {
        Rendered::new(self, verb)
    }

    /// Returns `true` if both handles point to the same node.
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.0, &other.0)
    }

    pub(crate) fn frame(&self) -> Frame<'_> {
        let mut node = &*self.0;
        loop {
            match node {
                Node::Message {
                    message,
                    call_site,
                    cause,
                } => {
                    return Frame {
                        message: Message::Text(message),
                        call_site,
                        cause: cause.as_ref(),
                    };
                }
                Node::Decorated {
                    delegate: Cause::Chain(inner),
                    ..
                } => node = &*inner.0,
                Node::Decorated {
                    delegate: Cause::Foreign(foreign),
                    call_site,
                    ..
                } => {
                    return Frame {
                        message: Message::Foreign(&**foreign),
                        call_site,
                        cause: None,
                    };
                }
            }
        }
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other)
    }
}

impl Eq for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let directive = Directive::from_formatter(Verb::Message, f);
        render::write_error(f, self, &directive)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if f.alternate() {
            Verb::Module
        } else {
            Verb::Short
        };
        let directive = Directive::from_formatter(verb, f);
        render::write_error(f, self, &directive)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause().map(|cause| cause.as_dyn() as &(dyn StdError + 'static))
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use super::*;

    static_assertions::assert_impl_all!(Error: Send, Sync, Clone, Unpin);
    static_assertions::assert_eq_size!(Error, usize);

    #[derive(Debug, thiserror::Error)]
    #[error("permission denied")]
    struct Denied;

    #[test]
    fn test_new_is_a_root() {
        let line = line!() + 1;
        let error = Error::new("not found");
        assert!(error.cause().is_none());
        assert!(error.source().is_none());
        assert_eq!(error.message(), "not found");
        assert_eq!(error.call_site().line(), Some(line));
        assert_eq!(error.call_site().file_name(), "owned.rs");
        assert_eq!(error.depth(), 1);
    }

    #[test]
    fn test_empty_message_is_kept() {
        let error = Error::new("");
        assert_eq!(error.message(), "");
        assert_eq!(error.to_string(), "");
    }

    #[test]
    fn test_wrap_records_its_own_location() {
        let inner = Error::new("not found");
        let line = line!() + 1;
        let outer = Error::wrap(inner.clone(), "lookup failed");
        assert_eq!(outer.call_site().line(), Some(line));
        assert_ne!(outer.call_site().line(), inner.call_site().line());
        assert_eq!(outer.cause().and_then(Cause::as_chain), Some(&inner));
        assert_eq!(outer.depth(), 2);
    }

    #[test]
    fn test_root_cause_of_chain() {
        let root = Error::new("a");
        let chain = Error::wrap(Error::wrap(root.clone(), "b"), "c");
        let found = chain.root_cause().downcast_ref::<Error>();
        assert_eq!(found, Some(&root));
        assert_eq!(found.map(Error::call_site), Some(root.call_site()));
    }

    #[test]
    fn test_root_cause_stops_at_foreign() {
        let chain = Error::wrap(Error::wrap(Denied, "b"), "c");
        assert!(chain.root_cause().downcast_ref::<Denied>().is_some());
        assert_eq!(chain.depth(), 3);
    }

    #[test]
    fn test_decorator_is_transparent() {
        let inner = Error::new("busy");
        let coded = Error::with_code(inner.clone(), 503);
        assert_eq!(coded.message(), "busy");
        assert_eq!(coded.call_site(), inner.call_site());
        assert_eq!(coded.capability(), Some(&Capability::Code(503)));
        assert_eq!(inner.capability(), None);
        assert_eq!(coded.cause().and_then(Cause::as_chain), Some(&inner));
        assert_eq!(coded.root_cause().downcast_ref::<Error>(), Some(&inner));
    }

    #[test]
    fn test_decorator_over_foreign_uses_own_location() {
        let line = line!() + 1;
        let coded = Error::with_code(Denied, 13);
        assert_eq!(coded.message(), "permission denied");
        assert_eq!(coded.call_site().line(), Some(line));
        assert!(coded.cause().is_some_and(Cause::is_foreign));
    }

    #[test]
    fn test_coded_and_retryable_roots() {
        let coded = Error::coded(404, "missing");
        assert_eq!(coded.code(), Some(404));
        let inner = coded.cause().and_then(Cause::as_chain);
        assert!(inner.is_some_and(|inner| inner.code().is_none()));
        assert_eq!(inner.map(Error::call_site), Some(coded.call_site()));

        let before = SystemTime::now();
        let retryable = Error::retryable(Duration::from_secs(60), "busy");
        let at = retryable.retry_after();
        assert!(at.is_some_and(|at| at >= before + Duration::from_secs(60)));
        assert_eq!(retryable.to_string(), "busy");
    }

    #[test]
    fn test_equality_is_identity() {
        let a = Error::new("same");
        let b = Error::new("same");
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert!(Error::ptr_eq(&a, &a.clone()));
    }

    #[test]
    fn test_source_chain() {
        let chain = Error::wrap(Error::wrap(Denied, "b"), "c");
        let messages: Vec<String> = chain.chain().map(ToString::to_string).collect();
        assert_eq!(messages, ["c", "b", "permission denied"]);
    }

    #[test]
    fn test_describe_is_debug() {
        let error = Error::wrap(Error::new("inner"), "outer");
        assert_eq!(error.describe(), format!("{error:?}"));
        assert!(error.describe().ends_with(":outer"));
    }
}
