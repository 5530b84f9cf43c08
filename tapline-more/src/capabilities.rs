/// Structural interface a type implements to declare which named operations it supports.
///
/// Used by [`Tester::can_ok`](crate::Tester::can_ok) in place of runtime introspection.
pub trait Capabilities {
    /// Returns the names of the operations this value supports.
    fn capabilities(&self) -> &[&'static str];

    /// Returns whether the named operation is supported.
    fn supports(&self, name: &str) -> bool {
        self.capabilities().iter().any(|c| *c == name)
    }
}
