use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;

/// One invocation of a console member: who called it and with what.
#[derive(Debug, Clone, Copy)]
pub struct Call<'a> {
    /// Source location of the code that invoked the member.
    pub origin: &'static Location<'static>,
    pub args: &'a [Value],
}

impl<'a> Call<'a> {
    pub fn new(origin: &'static Location<'static>, args: &'a [Value]) -> Self {
        Self { origin, args }
    }

    /// Same origin, different arguments.
    pub fn with_args<'b>(&self, args: &'b [Value]) -> Call<'b> {
        Call {
            origin: self.origin,
            args,
        }
    }
}

type MethodFn = dyn Fn(&Call<'_>) -> Result<()> + Send + Sync;

/// A callable console member.
///
/// Cloning shares the underlying function, so two clones compare equal
/// under [`Method::ptr_eq`]. Wrappers produced by the interceptor hold the
/// method they replaced; [`Method::is_generated`] and [`Method::original`]
/// expose it.
#[derive(Clone)]
pub struct Method {
    func: Arc<MethodFn>,
    original: Option<Arc<Method>>,
}

impl Method {
    /// A method that only cares about its arguments.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<()> + Send + Sync + 'static,
    {
        Self::with_call(move |call: &Call<'_>| func(call.args))
    }

    /// A method that also sees the invoking location.
    pub fn with_call<F>(func: F) -> Self
    where
        F: Fn(&Call<'_>) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            original: None,
        }
    }

    /// A wrapper around `original`. Only the interceptor should need this.
    pub fn generated<F>(original: Method, func: F) -> Self
    where
        F: Fn(&Call<'_>) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            original: Some(Arc::new(original)),
        }
    }

    pub fn is_generated(&self) -> bool {
        self.original.is_some()
    }

    /// The method a generated wrapper replaced. `None` for plain methods.
    pub fn original(&self) -> Option<&Method> {
        self.original.as_deref()
    }

    pub fn invoke(&self, call: &Call<'_>) -> Result<()> {
        (self.func)(call)
    }

    /// Reference equality: true when both handles share one function.
    pub fn ptr_eq(&self, other: &Method) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("func", &Arc::as_ptr(&self.func).cast::<()>())
            .field("generated", &self.is_generated())
            .finish()
    }
}

/// A named slot on a console: either something callable or plain data.
#[derive(Debug, Clone)]
pub enum Member {
    Method(Method),
    Value(Value),
}

impl Member {
    pub fn as_method(&self) -> Option<&Method> {
        match self {
            Member::Method(method) => Some(method),
            Member::Value(_) => None,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Member::Method(_))
    }
}

impl From<Method> for Member {
    fn from(method: Method) -> Self {
        Member::Method(method)
    }
}

impl From<Value> for Member {
    fn from(value: Value) -> Self {
        Member::Value(value)
    }
}
