use std::{error::Error as StdError, fmt};

use whence_internals::CallSite;

use crate::Cause;

/// One node of a chain as the renderer sees it, with capability decorators
/// already looked through.
pub(crate) struct Frame<'a> {
    pub(crate) message: Message<'a>,
    pub(crate) call_site: &'a CallSite,
    pub(crate) cause: Option<&'a Cause>,
}

#[derive(Copy, Clone)]
pub(crate) enum Message<'a> {
    Text(&'a str),
    Foreign(&'a (dyn StdError + Send + Sync + 'static)),
}

impl fmt::Display for Message<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Text(text) => f.write_str(text),
            Message::Foreign(error) => write!(f, "{error}"),
        }
    }
}
