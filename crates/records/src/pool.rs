use serde::Serialize;

/// Items of one kind, split three ways.
///
/// `remaining`, `chosen` and `discarded` always partition the pool the
/// match was opened with: every operation moves exactly one item between
/// two of them. Banned and vetoed items are discarded and never return.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Pool {
    remaining: Vec<String>,
    chosen: Vec<String>,
    discarded: Vec<String>,
}

impl Pool {
    pub fn new(items: Vec<String>) -> Self {
        Self {
            remaining: items,
            chosen: Vec::new(),
            discarded: Vec::new(),
        }
    }
    pub fn restore(remaining: Vec<String>, chosen: Vec<String>, discarded: Vec<String>) -> Self {
        Self {
            remaining,
            chosen,
            discarded,
        }
    }
    pub fn remaining(&self) -> &[String] {
        &self.remaining
    }
    pub fn chosen(&self) -> &[String] {
        &self.chosen
    }
    pub fn discarded(&self) -> &[String] {
        &self.discarded
    }
    /// Size of the pool the match was opened with.
    pub fn total(&self) -> usize {
        self.remaining.len() + self.chosen.len() + self.discarded.len()
    }
    /// Moves `remaining[index]` to the end of `chosen`.
    /// Order of the remaining items is otherwise preserved.
    pub fn pick(&mut self, index: usize) -> Option<String> {
        (index < self.remaining.len()).then(|| {
            let item = self.remaining.remove(index);
            self.chosen.push(item.clone());
            item
        })
    }
    /// Moves `remaining[index]` to `discarded`.
    pub fn ban(&mut self, index: usize) -> Option<String> {
        (index < self.remaining.len()).then(|| {
            let item = self.remaining.remove(index);
            self.discarded.push(item.clone());
            item
        })
    }
    /// Moves the most recently chosen item to `discarded`.
    pub fn unpick(&mut self) -> Option<String> {
        self.chosen.pop().inspect(|item| self.discarded.push(item.clone()))
    }
}
