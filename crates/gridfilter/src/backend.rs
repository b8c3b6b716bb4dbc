use crate::filter::Filter;

/// Where the combined filter goes.
///
/// The coordinator hands over the current combined expression after every
/// change that alters it. `None` means "show everything". Publishing is
/// fire-and-forget: the backend reports nothing back.
pub trait QueryBackend {
    fn set_filter(&mut self, filter: Option<&Filter>);
}

impl<B: QueryBackend + ?Sized> QueryBackend for &mut B {
    fn set_filter(&mut self, filter: Option<&Filter>) {
        (**self).set_filter(filter)
    }
}

/// A headless backend that keeps every published filter, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingBackend {
    published: Vec<Option<Filter>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent publish. Outer `None` when nothing was published yet.
    pub fn last(&self) -> Option<Option<&Filter>> {
        self.published.last().map(Option::as_ref)
    }

    pub fn publish_count(&self) -> usize {
        self.published.len()
    }

    pub fn history(&self) -> &[Option<Filter>] {
        &self.published
    }
}

impl QueryBackend for RecordingBackend {
    fn set_filter(&mut self, filter: Option<&Filter>) {
        self.published.push(filter.cloned());
    }
}
