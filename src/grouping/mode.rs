//! Active multi-seat selection method

/// How a single gesture can select several seats
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionMethod {
    /// A click expands to every seat of the named group
    Group(String),
    /// Seats are picked with a lasso; panning is off meanwhile
    Drag,
}

/// At most one selection method is active at a time
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionMode {
    active: Option<SelectionMethod>,
}

impl SelectionMode {
    pub fn active(&self) -> Option<&SelectionMethod> {
        self.active.as_ref()
    }

    pub fn active_group(&self) -> Option<&str> {
        match &self.active {
            Some(SelectionMethod::Group(name)) => Some(name),
            _ => None,
        }
    }

    pub fn is_drag(&self) -> bool {
        matches!(self.active, Some(SelectionMethod::Drag))
    }

    /// Panning is available exactly while drag selection is not
    pub fn allows_pan(&self) -> bool {
        !self.is_drag()
    }

    /// Select by `group`, or switch off if it is already the active group
    pub fn toggle_group(&mut self, group: &str) {
        if self.active_group() == Some(group) {
            self.active = None;
        } else {
            self.active = Some(SelectionMethod::Group(group.to_string()));
        }
    }

    pub fn toggle_drag(&mut self) {
        if self.is_drag() {
            self.active = None;
        } else {
            self.active = Some(SelectionMethod::Drag);
        }
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}
