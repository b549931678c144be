//! Process-wide configuration of error construction.
//!
//! # Quick Start
//!
//! ```rust
//! use whence::hooks::{CallSiteMode, Hooks};
//!
//! // Skip stack walks: record file and line only
//! Hooks::new()
//!     .call_site_mode(CallSiteMode::Location)
//!     .install()
//!     .expect("failed to install hooks");
//! ```
//!
//! **Most programs don't need hooks.** Without any installed, errors record
//! their file and line, and the enclosing function when the `backtrace`
//! feature is enabled. Use hooks to:
//!
//! - Trade function names for cheaper construction ([`CallSiteMode`])
//! - Observe every created error, for example to log it
//!   ([`creation`])
//!
//! # Environment
//!
//! When no hooks are installed, `WHENCE_CALLSITE=location` or
//! `WHENCE_CALLSITE=symbolized` selects the call-site mode. The variable is
//! read once, the first time an error is created.

pub mod creation;
mod hook_slot;

use core::{fmt, panic::Location};
use std::sync::OnceLock;

use whence_internals::CallSite;

pub use self::creation::CreationHook;
use self::hook_slot::HookSlot;
use crate::Error;

static HOOKS: HookSlot<HookData> = HookSlot::new();

/// How the function of a call site is found.
///
/// File and line always come from `#[track_caller]`. Errors created through
/// the macros ([`error!`](crate::error!), [`wrap!`](crate::wrap!), ...) know
/// their function at compile time and ignore this setting.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CallSiteMode {
    /// Record file and line only.
    Location,
    /// Also walk the stack to find the function name. Falls back to
    /// [`Location`](Self::Location) without the `backtrace` feature.
    Symbolized,
}

impl CallSiteMode {
    /// The mode used when no hooks are installed: taken from
    /// `WHENCE_CALLSITE`, otherwise [`Symbolized`](Self::Symbolized) with the
    /// `backtrace` feature and [`Location`](Self::Location) without.
    pub fn from_env() -> Self {
        static MODE: OnceLock<CallSiteMode> = OnceLock::new();

        *MODE.get_or_init(|| {
            let default = if cfg!(feature = "backtrace") {
                CallSiteMode::Symbolized
            } else {
                CallSiteMode::Location
            };
            match std::env::var_os("WHENCE_CALLSITE") {
                Some(var) if var.eq_ignore_ascii_case("location") => CallSiteMode::Location,
                Some(var) if var.eq_ignore_ascii_case("symbolized") => CallSiteMode::Symbolized,
                _ => default,
            }
        })
    }
}

/// Builder for configuring and installing hooks globally.
///
/// # Examples
///
/// ```rust
/// use whence::{Error, hooks::Hooks};
///
/// Hooks::new()
///     .creation_hook(|error: &Error| eprintln!("created: {error:?}"))
///     .install()
///     .expect("failed to install hooks");
/// ```
pub struct Hooks(Box<HookData>);

struct HookData {
    call_site_mode: CallSiteMode,
    creation: Vec<Box<dyn CreationHook>>,
    created_at: &'static Location<'static>,
}

impl Default for Hooks {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("call_site_mode", &self.0.call_site_mode)
            .field("creation_hooks", &self.0.creation.len())
            .field("created_at", &self.0.created_at)
            .finish()
    }
}

/// Error returned when attempting to install hooks when they're already
/// installed.
///
/// Contains the hooks that were attempted to be installed, allowing you to
/// recover them if needed, and names where the installed ones were built.
pub struct HooksAlreadyInstalledError {
    /// The hooks that were not installed.
    pub hooks: Hooks,
    installed_at: &'static Location<'static>,
}

impl HooksAlreadyInstalledError {
    /// Where [`Hooks::new`] was called for the hooks that are installed.
    pub fn installed_at(&self) -> &'static Location<'static> {
        self.installed_at
    }
}

impl fmt::Debug for HooksAlreadyInstalledError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HooksAlreadyInstalledError")
            .field("installed_at", &self.installed_at)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for HooksAlreadyInstalledError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hooks are already installed globally, built at {}:{}",
            self.installed_at.file(),
            self.installed_at.line()
        )
    }
}

impl core::error::Error for HooksAlreadyInstalledError {}

impl Hooks {
    /// Creates a builder with the default call-site mode (see
    /// [`CallSiteMode::from_env`]) and no creation hooks.
    #[track_caller]
    pub fn new() -> Self {
        Self(Box::new(HookData {
            call_site_mode: CallSiteMode::from_env(),
            creation: Vec::new(),
            created_at: Location::caller(),
        }))
    }

    /// Sets how call sites are collected.
    pub fn call_site_mode(mut self, mode: CallSiteMode) -> Self {
        self.0.call_site_mode = mode;
        self
    }

    /// Registers a hook that runs for every created error.
    ///
    /// Hooks run in registration order, on the thread that creates the
    /// error, while the hook set is locked for reading. Installing or
    /// replacing hooks from inside a hook deadlocks.
    pub fn creation_hook<H>(mut self, hook: H) -> Self
    where
        H: CreationHook,
    {
        self.0.creation.push(Box::new(hook));
        self
    }

    /// Installs the hooks globally.
    ///
    /// If hooks are already installed, returns an error
    /// [`HooksAlreadyInstalledError`], containing the hooks that were attempted
    /// to be installed.
    ///
    /// See also [`replace`](Self::replace) which will replace any existing
    /// hooks without erroring.
    ///
    /// ```rust
    /// use whence::hooks::Hooks;
    ///
    /// Hooks::new().install().expect("failed to install hooks");
    ///
    /// // Second installation fails
    /// Hooks::new().install().unwrap_err();
    /// ```
    pub fn install(self) -> Result<(), HooksAlreadyInstalledError> {
        HOOKS.fill(*self.0, |rejected, installed| HooksAlreadyInstalledError {
            hooks: Hooks(Box::new(rejected)),
            installed_at: installed.created_at,
        })
    }

    /// Replaces the currently installed hooks with `self`, returning the
    /// previous ones, if any.
    pub fn replace(self) -> Option<Hooks> {
        HOOKS
            .swap(*self.0)
            .map(|previous| Hooks(Box::new(previous)))
    }
}

/// Builds the call site for an error created at the caller's location.
///
/// `function` is the enclosing function when the caller knows it at compile
/// time.
#[track_caller]
pub(crate) fn collect_call_site(function: Option<&'static str>) -> CallSite {
    let location = Location::caller();
    if let Some(function) = function {
        return CallSite::with_function(location, function);
    }
    let mode = HOOKS.with(|hooks| {
        hooks.map_or_else(CallSiteMode::from_env, |hooks| hooks.call_site_mode)
    });
    match mode {
        CallSiteMode::Location => CallSite::from_location(location),
        CallSiteMode::Symbolized => CallSite::symbolize(location),
    }
}

pub(crate) fn run_creation_hooks(error: &Error) {
    HOOKS.with(|hooks| {
        if let Some(hooks) = hooks {
            creation::run(&hooks.creation, error);
        }
    });
}
