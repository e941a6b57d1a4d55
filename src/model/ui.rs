//! UI state - presentation state separate from the matrix document

/// Pane that currently receives key events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Components,
    SortingKeys,
    Matrix,
}

impl Focus {
    pub fn all() -> [Focus; 3] {
        [Focus::Components, Focus::SortingKeys, Focus::Matrix]
    }

    pub fn name(&self) -> &str {
        match self {
            Focus::Components => "Components",
            Focus::SortingKeys => "Sorting Keys",
            Focus::Matrix => "Matrix",
        }
    }

    pub fn next(self) -> Focus {
        let all = Self::all();
        let index = all.iter().position(|f| *f == self).unwrap_or(0);
        all[(index + 1) % all.len()]
    }

    pub fn prev(self) -> Focus {
        let all = Self::all();
        let index = all.iter().position(|f| *f == self).unwrap_or(0);
        all[(index + all.len() - 1) % all.len()]
    }
}
