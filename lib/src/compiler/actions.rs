use crate::re::dfa::ActionSet;

/// Registry of action source fragments.
///
/// Fragments are opaque to the compiler. They are registered in the order in
/// which the parser finds them and are referenced only by their index. The
/// registry also holds the verbatim header lines of a rule file, which the
/// code generator splits between the generated header and body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Actions {
    fragments: Vec<String>,
    header: Vec<String>,
}

impl Actions {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a fragment and returns its index.
    pub fn add(&mut self, text: &str) -> u32 {
        let idx = self.fragments.len() as u32;
        self.fragments.push(text.to_string());
        idx
    }

    /// Returns the fragment with the given index.
    pub fn get(&self, idx: u32) -> Option<&str> {
        self.fragments.get(idx as usize).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Returns the concatenated text of every action in `set`, in ascending
    /// index order.
    pub fn text(&self, set: &ActionSet) -> String {
        set.iter().filter_map(|idx| self.get(*idx)).collect()
    }

    /// Sets the verbatim header lines.
    pub fn set_header<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.header = lines.into_iter().map(|s| s.into()).collect();
    }

    /// Header lines that contain an `#include` directive. These go to the
    /// generated header.
    pub fn header_includes(&self) -> impl Iterator<Item = &str> {
        self.header
            .iter()
            .map(|s| s.as_str())
            .filter(|line| line.contains("#include"))
    }

    /// Every other header line. These go to the generated body.
    pub fn header_body(&self) -> impl Iterator<Item = &str> {
        self.header
            .iter()
            .map(|s| s.as_str())
            .filter(|line| !line.contains("#include"))
    }
}
