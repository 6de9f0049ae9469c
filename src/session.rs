use indexmap::IndexSet;
use log::trace;

/// Mutable state of one generation run: the buffer of deferred composite declarations
/// and the set of names already synthesized.
#[derive(Debug, Default)]
pub struct Session {
    deferred: String,
    synthesized: IndexSet<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `name` as synthesized. Returns `false` if it already was.
    pub fn claim(&mut self, name: &str) -> bool {
        if self.synthesized.contains(name) {
            trace!("{name} already declared");
            return false;
        }
        self.synthesized.insert(name.to_string());
        true
    }

    pub fn defer(&mut self, declaration: &str) {
        self.deferred.push_str(declaration);
    }

    pub fn deferred(&self) -> &str {
        &self.deferred
    }

    pub fn synthesized(&self) -> impl Iterator<Item = &str> {
        self.synthesized.iter().map(String::as_str)
    }

    /// Consumes the session, returning the deferred declarations and the synthesized
    /// names in claim order.
    pub fn finish(self) -> (String, Vec<String>) {
        (self.deferred, self.synthesized.into_iter().collect())
    }
}
