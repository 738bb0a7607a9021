use crate::carousel::NavReport;
use crate::layout::Transform;
use std::time::Duration;

/// Creates and destroys renderable cards for items of type `T`.
pub trait CardFactory<T> {
    type Handle;

    /// Called once per item per slice lifetime, in ascending list order.
    fn materialize(&mut self, item: &T, index: usize) -> Self::Handle;

    fn destroy(&mut self, handle: Self::Handle);

    /// The active list is empty.
    fn show_placeholder(&mut self) {}
}

/// Moves a materialized card to its target transform.
pub trait TransformApplier<H> {
    fn apply_immediate(&mut self, handle: &H, transform: &Transform);

    /// Retargets any transition still in flight for `handle`.
    fn apply_eased(&mut self, handle: &H, transform: &Transform, duration: Duration);
}

/// Optional hook notified after every navigation that changed something.
pub trait NavigationObserver {
    fn navigated(&mut self, report: &NavReport);
}

impl<F> NavigationObserver for F
where
    F: FnMut(&NavReport),
{
    fn navigated(&mut self, report: &NavReport) {
        self(report)
    }
}
