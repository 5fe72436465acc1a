pub mod console;

pub use console::Console;

use crate::model::Member;

/// Something with named members that the interceptor can inspect and swap.
///
/// Handles are shared: setting a member through one handle is visible through
/// every other handle to the same target.
pub trait Target: Send + Sync {
    fn member(&self, name: &str) -> Option<Member>;

    fn set_member(&self, name: &str, member: Member);

    /// Every member name, callable or not.
    fn member_names(&self) -> Vec<String>;

    /// Names of the members that are currently callable.
    fn method_names(&self) -> Vec<String> {
        self.member_names()
            .into_iter()
            .filter(|name| self.member(name).is_some_and(|m| m.is_callable()))
            .collect()
    }
}
