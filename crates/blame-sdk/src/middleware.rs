use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use blame_core::{BlameError, Frame, Result};
use serde_json::Value;

/// Payload of the `console` chain: the arguments of the intercepted call.
pub type Args = Vec<Value>;

/// Which concern a stage observes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainKey {
    /// The call's arguments; terminal action invokes the original method.
    Console,
    /// The caller frame; terminal action prints the location line.
    File,
    /// The caller frame; terminal action prints the source window.
    Code,
}

impl ChainKey {
    pub const ALL: [ChainKey; 3] = [ChainKey::Console, ChainKey::File, ChainKey::Code];

    pub fn as_str(self) -> &'static str {
        match self {
            ChainKey::Console => "console",
            ChainKey::File => "file",
            ChainKey::Code => "code",
        }
    }
}

impl fmt::Display for ChainKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChainKey {
    type Err = BlameError;

    fn from_str(s: &str) -> Result<Self> {
        ChainKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| BlameError::Config(format!("unknown chain key: {s}")))
    }
}

/// One interception stage.
///
/// A stage decides whether, when and how often to call `next`. Not calling it
/// skips every later stage and the terminal action.
pub trait Stage<P>: Send + Sync {
    fn call(&self, next: Next<'_, P>, payload: &P) -> Result<()>;
}

impl<P, F> Stage<P> for F
where
    F: Fn(Next<'_, P>, &P) -> Result<()> + Send + Sync,
{
    fn call(&self, next: Next<'_, P>, payload: &P) -> Result<()> {
        self(next, payload)
    }
}

/// The rest of a chain, as seen from inside a stage.
pub struct Next<'a, P> {
    stages: &'a [Arc<dyn Stage<P>>],
    terminal: &'a dyn Fn(&P) -> Result<()>,
    payload: &'a P,
}

impl<P> Clone for Next<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for Next<'_, P> {}

impl<P> Next<'_, P> {
    /// Continue with the payload this stage received.
    pub fn run(&self) -> Result<()> {
        dispatch(self.stages, self.terminal, self.payload)
    }

    /// Continue with a different payload. Its shape is not checked.
    pub fn run_with(&self, payload: &P) -> Result<()> {
        dispatch(self.stages, self.terminal, payload)
    }

    pub fn payload(&self) -> &P {
        self.payload
    }
}

fn dispatch<P>(
    stages: &[Arc<dyn Stage<P>>],
    terminal: &dyn Fn(&P) -> Result<()>,
    payload: &P,
) -> Result<()> {
    match stages.split_first() {
        Some((stage, rest)) => stage.call(
            Next {
                stages: rest,
                terminal,
                payload,
            },
            payload,
        ),
        None => terminal(payload),
    }
}

/// An ordered list of stages. The first one pushed runs outermost.
pub struct Chain<P> {
    stages: Vec<Arc<dyn Stage<P>>>,
}

impl<P> Default for Chain<P> {
    fn default() -> Self {
        Self { stages: Vec::new() }
    }
}

impl<P> Clone for Chain<P> {
    fn clone(&self) -> Self {
        Self {
            stages: self.stages.clone(),
        }
    }
}

impl<P> Chain<P> {
    pub fn push(&mut self, stage: Arc<dyn Stage<P>>) {
        self.stages.push(stage);
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every stage around `terminal`, starting with `payload`.
    pub fn dispatch(&self, payload: &P, terminal: &dyn Fn(&P) -> Result<()>) -> Result<()> {
        dispatch(&self.stages, terminal, payload)
    }
}

/// A stage tagged with the chain it belongs to.
#[derive(Clone)]
pub enum Middleware {
    Console(Arc<dyn Stage<Args>>),
    File(Arc<dyn Stage<Frame>>),
    Code(Arc<dyn Stage<Frame>>),
}

impl Middleware {
    pub fn console<F>(stage: F) -> Self
    where
        F: Fn(Next<'_, Args>, &Args) -> Result<()> + Send + Sync + 'static,
    {
        Middleware::Console(Arc::new(stage))
    }

    pub fn file<F>(stage: F) -> Self
    where
        F: Fn(Next<'_, Frame>, &Frame) -> Result<()> + Send + Sync + 'static,
    {
        Middleware::File(Arc::new(stage))
    }

    pub fn code<F>(stage: F) -> Self
    where
        F: Fn(Next<'_, Frame>, &Frame) -> Result<()> + Send + Sync + 'static,
    {
        Middleware::Code(Arc::new(stage))
    }

    pub fn key(&self) -> ChainKey {
        match self {
            Middleware::Console(_) => ChainKey::Console,
            Middleware::File(_) => ChainKey::File,
            Middleware::Code(_) => ChainKey::Code,
        }
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Middleware({})", self.key())
    }
}

/// Stages for all three chains.
#[derive(Clone, Default)]
pub struct MiddlewareRegistry {
    pub console: Chain<Args>,
    pub file: Chain<Frame>,
    pub code: Chain<Frame>,
}

impl MiddlewareRegistry {
    pub fn add(&mut self, middleware: Middleware) {
        match middleware {
            Middleware::Console(stage) => self.console.push(stage),
            Middleware::File(stage) => self.file.push(stage),
            Middleware::Code(stage) => self.code.push(stage),
        }
    }

    pub fn len(&self, key: ChainKey) -> usize {
        match key {
            ChainKey::Console => self.console.len(),
            ChainKey::File => self.file.len(),
            ChainKey::Code => self.code.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    type Log = Arc<Mutex<Vec<String>>>;

    fn wrapping_stage(log: &Log, name: &'static str) -> Middleware {
        let log = log.clone();
        Middleware::console(move |next, _args| {
            log.lock().unwrap().push(format!("{name}-before"));
            next.run()?;
            log.lock().unwrap().push(format!("{name}-after"));
            Ok(())
        })
    }

    fn registry(stages: impl IntoIterator<Item = Middleware>) -> MiddlewareRegistry {
        let mut registry = MiddlewareRegistry::default();
        for stage in stages {
            registry.add(stage);
        }
        registry
    }

    fn recording_terminal(log: &Log) -> impl Fn(&Args) -> Result<()> + '_ {
        move |args: &Args| {
            log.lock().unwrap().push(format!("terminal {}", json!(args)));
            Ok(())
        }
    }

    #[test]
    fn test_first_registered_runs_outermost() {
        let log: Log = Arc::default();
        let registry = registry([wrapping_stage(&log, "S1"), wrapping_stage(&log, "S2")]);

        registry
            .console
            .dispatch(&vec![json!(1)], &recording_terminal(&log))
            .unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["S1-before", "S2-before", "terminal [1]", "S2-after", "S1-after"]
        );
    }

    #[test]
    fn test_no_stages_runs_terminal_directly() {
        let log: Log = Arc::default();
        let chain: Chain<Args> = Chain::default();
        assert!(chain.is_empty());

        chain
            .dispatch(&vec![json!("a"), json!("b")], &recording_terminal(&log))
            .unwrap();
        assert_eq!(*log.lock().unwrap(), vec![r#"terminal ["a","b"]"#]);
    }

    #[test]
    fn test_stage_without_next_short_circuits() {
        let log: Log = Arc::default();
        let blocker = Middleware::console(|_next, _args| Ok(()));
        let registry = registry([blocker, wrapping_stage(&log, "S2")]);

        registry
            .console
            .dispatch(&vec![json!(1)], &recording_terminal(&log))
            .unwrap();
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_next_can_run_twice() {
        let log: Log = Arc::default();
        let twice = Middleware::console(|next, _args| {
            next.run()?;
            next.run()
        });
        let registry = registry([twice]);

        registry
            .console
            .dispatch(&vec![json!(7)], &recording_terminal(&log))
            .unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["terminal [7]", "terminal [7]"]);
    }

    #[test]
    fn test_override_is_seen_downstream() {
        let log: Log = Arc::default();
        let replace = Middleware::console(|next, _args| next.run_with(&vec![json!("swapped")]));
        let observe = {
            let log = log.clone();
            Middleware::console(move |next, args: &Args| {
                log.lock().unwrap().push(format!("saw {}", json!(args)));
                next.run()
            })
        };
        let registry = registry([replace, observe]);

        registry
            .console
            .dispatch(&vec![json!(1), json!(2)], &recording_terminal(&log))
            .unwrap();
        assert_eq!(
            *log.lock().unwrap(),
            vec![r#"saw ["swapped"]"#, r#"terminal ["swapped"]"#]
        );
    }

    #[test]
    fn test_override_shape_is_not_checked() {
        let log: Log = Arc::default();
        let widen = Middleware::console(|next, args: &Args| {
            let mut wider = args.clone();
            wider.push(json!({"extra": true}));
            next.run_with(&wider)
        });
        let registry = registry([widen]);

        registry
            .console
            .dispatch(&vec![], &recording_terminal(&log))
            .unwrap();
        assert_eq!(*log.lock().unwrap(), vec![r#"terminal [{"extra":true}]"#]);
    }

    #[test]
    fn test_stage_error_passes_through() {
        let log: Log = Arc::default();
        let failing = Middleware::console(|_next, _args| Err(BlameError::Stage("boom".into())));
        let registry = registry([wrapping_stage(&log, "S1"), failing]);

        let err = registry
            .console
            .dispatch(&vec![], &recording_terminal(&log))
            .unwrap_err();
        assert!(matches!(err, BlameError::Stage(msg) if msg == "boom"));
        assert_eq!(*log.lock().unwrap(), vec!["S1-before"]);
    }

    #[test]
    fn test_registry_routes_by_key() {
        let file = Middleware::file(|next, _frame| next.run());
        let code = Middleware::code(|next, _frame| next.run());
        assert_eq!(file.key(), ChainKey::File);

        let registry = registry([file, code.clone(), code]);
        assert_eq!(registry.len(ChainKey::Console), 0);
        assert_eq!(registry.len(ChainKey::File), 1);
        assert_eq!(registry.len(ChainKey::Code), 2);
    }

    #[test]
    fn test_chain_key_parse() {
        assert_eq!("code".parse::<ChainKey>().unwrap(), ChainKey::Code);
        assert_eq!(ChainKey::File.to_string(), "file");
        assert!("stdout".parse::<ChainKey>().is_err());
    }

    #[test]
    fn test_custom_stage_type() {
        struct Counter(Mutex<usize>);

        impl Stage<Frame> for Counter {
            fn call(&self, next: Next<'_, Frame>, _frame: &Frame) -> Result<()> {
                *self.0.lock().unwrap() += 1;
                next.run()
            }
        }

        let counter = Arc::new(Counter(Mutex::new(0)));
        let mut registry = MiddlewareRegistry::default();
        registry.add(Middleware::File(counter.clone()));

        let frame = Frame::new("a.rs", 1, 1);
        registry.file.dispatch(&frame, &|_f: &Frame| Ok(())).unwrap();
        registry.file.dispatch(&frame, &|_f: &Frame| Ok(())).unwrap();
        assert_eq!(*counter.0.lock().unwrap(), 2);
    }
}
