use std::collections::BTreeMap;
use std::io::Write as _;
use std::panic::Location;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use serde_json::Value;

use crate::error::{BlameError, Result};
use crate::model::{Call, Member, Method};
use crate::render::template;

use super::Target;

static GLOBAL: OnceLock<Console> = OnceLock::new();

/// Methods the standard console writes to stdout; the rest go to stderr.
const STDOUT_METHODS: &[&str] = &["log", "info", "debug"];
const STDERR_METHODS: &[&str] = &["warn", "error"];

/// A console-like object: a shared table of named members.
#[derive(Clone, Default)]
pub struct Console {
    members: Arc<RwLock<BTreeMap<String, Member>>>,
}

impl Console {
    /// An empty console.
    pub fn new() -> Self {
        Self::default()
    }

    /// A console with `log`, `info`, `debug` (stdout) and `warn`, `error`
    /// (stderr). Arguments are rendered printf-style.
    pub fn standard() -> Self {
        let console = Self::new();
        for name in STDOUT_METHODS {
            console.define(
                name,
                Method::new(|args| {
                    writeln!(std::io::stdout().lock(), "{}", template::format_values(args))?;
                    Ok(())
                }),
            );
        }
        for name in STDERR_METHODS {
            console.define(
                name,
                Method::new(|args| {
                    writeln!(std::io::stderr().lock(), "{}", template::format_values(args))?;
                    Ok(())
                }),
            );
        }
        console
    }

    /// The process-wide console, created on first use.
    pub fn global() -> Console {
        GLOBAL.get_or_init(Console::standard).clone()
    }

    /// Builder form of [`Console::define`].
    pub fn with(self, name: &str, member: impl Into<Member>) -> Self {
        self.define(name, member);
        self
    }

    pub fn define(&self, name: &str, member: impl Into<Member>) -> &Self {
        self.set_member(name, member.into());
        self
    }

    /// True when both handles point at the same console.
    pub fn same_as(&self, other: &Console) -> bool {
        Arc::ptr_eq(&self.members, &other.members)
    }

    /// Invoke member `name`, recording the caller's location.
    #[track_caller]
    pub fn call(&self, name: &str, args: &[Value]) -> Result<()> {
        let origin = Location::caller();
        // The lock is released before invoking so the method may touch this console.
        let method = self
            .member(name)
            .and_then(|m| m.as_method().cloned())
            .ok_or_else(|| BlameError::NotCallable(name.to_string()))?;
        method.invoke(&Call::new(origin, args))
    }

    #[track_caller]
    pub fn log(&self, args: &[Value]) -> Result<()> {
        self.call("log", args)
    }

    #[track_caller]
    pub fn info(&self, args: &[Value]) -> Result<()> {
        self.call("info", args)
    }

    #[track_caller]
    pub fn debug(&self, args: &[Value]) -> Result<()> {
        self.call("debug", args)
    }

    #[track_caller]
    pub fn warn(&self, args: &[Value]) -> Result<()> {
        self.call("warn", args)
    }

    #[track_caller]
    pub fn error(&self, args: &[Value]) -> Result<()> {
        self.call("error", args)
    }
}

impl Target for Console {
    fn member(&self, name: &str) -> Option<Member> {
        self.members
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    fn set_member(&self, name: &str, member: Member) {
        self.members
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), member);
    }

    fn member_names(&self) -> Vec<String> {
        self.members
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("members", &self.member_names())
            .finish()
    }
}
