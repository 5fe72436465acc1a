use std::collections::BTreeMap;

use blame_core::{Member, Method, Target};

/// Tracks which members of one target are trapped, and what they replaced.
///
/// A name present in the map means the target currently holds a generated
/// wrapper under that name (unless someone else reassigned it since).
pub struct Interceptor<T: Target> {
    target: T,
    originals: BTreeMap<String, Method>,
}

impl<T: Target> Interceptor<T> {
    pub fn new(target: T) -> Self {
        Self {
            target,
            originals: BTreeMap::new(),
        }
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    /// Wrap each named member with `wrap(name, original)`.
    ///
    /// Absent members, non-callable members and members that already hold a
    /// generated wrapper are skipped. Returns how many members were wrapped.
    pub fn install<I, S>(&mut self, names: I, wrap: impl Fn(&str, Method) -> Method) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter(|name| self.install_one(name.as_ref(), &wrap))
            .count()
    }

    /// Wrap every member that is currently callable.
    pub fn install_all(&mut self, wrap: impl Fn(&str, Method) -> Method) -> usize {
        let names = self.target.method_names();
        self.install(names, wrap)
    }

    fn install_one(&mut self, name: &str, wrap: &dyn Fn(&str, Method) -> Method) -> bool {
        let original = match self.target.member(name) {
            Some(Member::Method(method)) => method,
            Some(Member::Value(_)) => {
                tracing::debug!("Skipping `{name}`: not callable");
                return false;
            }
            None => {
                tracing::debug!("Skipping `{name}`: no such member");
                return false;
            }
        };
        if original.is_generated() {
            tracing::debug!("Skipping `{name}`: already trapped");
            return false;
        }

        let wrapper = wrap(name, original.clone());
        self.target.set_member(name, Member::Method(wrapper));
        self.originals.insert(name.to_string(), original);
        tracing::debug!("Trapped `{name}`");
        true
    }

    /// Put back every captured original, then unwrap any generated wrapper
    /// still on the target (e.g. one left by a dropped interceptor).
    /// Returns how many members were restored.
    pub fn restore(&mut self) -> usize {
        let originals = std::mem::take(&mut self.originals);
        let mut count = originals.len();
        for (name, original) in originals {
            self.target.set_member(&name, Member::Method(original));
            tracing::debug!("Restored `{name}`");
        }
        for name in self.target.method_names() {
            if self.unwrap_member(&name) {
                count += 1;
            }
        }
        count
    }

    /// Put back a single original. False when `name` holds no wrapper.
    pub fn restore_one(&mut self, name: &str) -> bool {
        match self.originals.remove(name) {
            Some(original) => {
                self.target.set_member(name, Member::Method(original));
                tracing::debug!("Restored `{name}`");
                true
            }
            None => self.unwrap_member(name),
        }
    }

    fn unwrap_member(&self, name: &str) -> bool {
        let original = self
            .target
            .member(name)
            .and_then(|member| member.as_method().and_then(Method::original).cloned());
        match original {
            Some(original) => {
                self.target.set_member(name, Member::Method(original));
                tracing::debug!("Restored `{name}` from a foreign wrapper");
                true
            }
            None => false,
        }
    }

    pub fn is_trapped(&self, name: &str) -> bool {
        self.originals.contains_key(name)
    }

    /// Trapped names in sorted order.
    pub fn trapped(&self) -> impl Iterator<Item = &str> {
        self.originals.keys().map(String::as_str)
    }

    pub fn original(&self, name: &str) -> Option<&Method> {
        self.originals.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blame_core::Console;
    use serde_json::Value;

    fn noop() -> Method {
        Method::new(|_| Ok(()))
    }

    fn passthrough(_name: &str, original: Method) -> Method {
        Method::generated(original.clone(), move |call| original.invoke(call))
    }

    fn method(console: &Console, name: &str) -> Method {
        console
            .member(name)
            .and_then(|m| m.as_method().cloned())
            .unwrap()
    }

    fn console() -> Console {
        Console::new()
            .with("log", noop())
            .with("error", noop())
            .with("level", Value::from("info"))
    }

    #[test]
    fn test_install_wraps_and_tags() {
        let console = console();
        let mut interceptor = Interceptor::new(console.clone());

        assert_eq!(interceptor.install(["log"], passthrough), 1);
        assert!(method(&console, "log").is_generated());
        assert!(interceptor.is_trapped("log"));
    }

    #[test]
    fn test_install_twice_keeps_first_wrapper() {
        let console = console();
        let mut interceptor = Interceptor::new(console.clone());

        interceptor.install(["log"], passthrough);
        let first = method(&console, "log");
        assert_eq!(interceptor.install(["log"], passthrough), 0);

        assert!(method(&console, "log").ptr_eq(&first));
        assert!(!interceptor.original("log").unwrap().is_generated());
    }

    #[test]
    fn test_second_interceptor_does_not_double_wrap() {
        let console = console();
        let mut first = Interceptor::new(console.clone());
        let mut second = Interceptor::new(console.clone());

        first.install(["log"], passthrough);
        assert_eq!(second.install(["log"], passthrough), 0);
        assert!(!second.is_trapped("log"));
    }

    #[test]
    fn test_restore_is_reference_equal() {
        let console = console();
        let before = method(&console, "log");
        let mut interceptor = Interceptor::new(console.clone());

        interceptor.install(["log"], passthrough);
        assert!(!method(&console, "log").ptr_eq(&before));

        assert_eq!(interceptor.restore(), 1);
        assert!(method(&console, "log").ptr_eq(&before));
        assert!(!interceptor.is_trapped("log"));

        // Second restore is a no-op.
        assert_eq!(interceptor.restore(), 0);
        assert!(method(&console, "log").ptr_eq(&before));
    }

    #[test]
    fn test_selective_trapping() {
        let console = console();
        let error = method(&console, "error");
        let mut interceptor = Interceptor::new(console.clone());

        interceptor.install(["log"], passthrough);
        assert!(method(&console, "error").ptr_eq(&error));
        assert!(!method(&console, "error").is_generated());
    }

    #[test]
    fn test_skips_values_and_missing_members() {
        let console = console();
        let mut interceptor = Interceptor::new(console.clone());

        assert_eq!(interceptor.install(["level", "table", "log"], passthrough), 1);
        assert!(console.member("level").is_some_and(|m| !m.is_callable()));
        assert!(console.member("table").is_none());
        assert_eq!(interceptor.trapped().collect::<Vec<_>>(), vec!["log"]);
    }

    #[test]
    fn test_install_all_only_takes_methods() {
        let console = console();
        let mut interceptor = Interceptor::new(console.clone());

        assert_eq!(interceptor.install_all(passthrough), 2);
        assert_eq!(interceptor.trapped().collect::<Vec<_>>(), vec!["error", "log"]);
    }

    #[test]
    fn test_restore_one() {
        let console = console();
        let log = method(&console, "log");
        let mut interceptor = Interceptor::new(console.clone());

        interceptor.install_all(passthrough);
        assert!(interceptor.restore_one("log"));
        assert!(!interceptor.restore_one("log"));
        assert!(!interceptor.restore_one("level"));

        assert!(method(&console, "log").ptr_eq(&log));
        assert!(method(&console, "error").is_generated());
    }

    #[test]
    fn test_retrap_after_restore() {
        let console = console();
        let mut interceptor = Interceptor::new(console.clone());

        interceptor.install(["log"], passthrough);
        interceptor.restore();
        assert_eq!(interceptor.install(["log"], passthrough), 1);
        assert!(method(&console, "log").is_generated());
    }

    #[test]
    fn test_restore_after_trapping_interceptor_is_dropped() {
        let console = console();
        let log = method(&console, "log");
        let error = method(&console, "error");

        Interceptor::new(console.clone()).install_all(passthrough);
        assert!(method(&console, "log").is_generated());

        let mut fresh = Interceptor::new(console.clone());
        assert_eq!(fresh.install(["log"], passthrough), 0);
        assert!(fresh.restore_one("error"));
        assert!(method(&console, "error").ptr_eq(&error));

        assert_eq!(fresh.restore(), 1);
        assert!(method(&console, "log").ptr_eq(&log));
        assert!(!method(&console, "log").is_generated());
        assert_eq!(fresh.restore(), 0);
    }
}
