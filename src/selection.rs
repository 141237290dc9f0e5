use std::fmt;

use log::debug;

/// Called synchronously with the new selection every time it changes.
pub type SelectionCallback = Box<dyn FnMut(Option<&str>)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionPhase {
    Unselected,
    Selected,
    Filtered,
}

/// Single source of truth for what is selected and whether the view is
/// narrowed to a neighborhood.
///
/// `is_filtered` is derived from `focus`, so a filtered state without a focus
/// node cannot be represented.
#[derive(Default)]
pub struct SelectionController {
    selected: Option<String>,
    focus: Option<String>,
    on_change: Option<SelectionCallback>,
}

impl fmt::Debug for SelectionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionController")
            .field("selected", &self.selected)
            .field("focus", &self.focus)
            .finish_non_exhaustive()
    }
}

impl SelectionController {
    pub fn new(on_change: Option<SelectionCallback>) -> Self {
        Self {
            selected: None,
            focus: None,
            on_change,
        }
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn focus(&self) -> Option<&str> {
        self.focus.as_deref()
    }

    pub fn is_filtered(&self) -> bool {
        self.focus.is_some()
    }

    pub fn phase(&self) -> SelectionPhase {
        if self.focus.is_some() {
            SelectionPhase::Filtered
        } else if self.selected.is_some() {
            SelectionPhase::Selected
        } else {
            SelectionPhase::Unselected
        }
    }

    /// Sets the selection; notifies only when it actually changed.
    pub fn select(&mut self, id: Option<&str>) -> bool {
        if self.selected.as_deref() == id {
            return false;
        }

        debug!("selection {:?} -> {:?}", self.selected, id);
        self.selected = id.map(str::to_owned);
        if let Some(on_change) = self.on_change.as_mut() {
            on_change(id);
        }
        true
    }

    /// Enters the filtered phase around `focus` and selects it.
    pub fn enter_filter(&mut self, focus: &str) -> bool {
        debug!("filter focus {:?} -> {focus}", self.focus);
        self.focus = Some(focus.to_owned());
        self.select(Some(focus))
    }

    /// Leaves the filtered phase and clears the selection.
    pub fn leave_filter(&mut self) -> bool {
        debug!("filter cleared (was {:?})", self.focus);
        self.focus = None;
        self.select(None)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use super::*;

    fn recording() -> (SelectionController, Rc<RefCell<Vec<Option<String>>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let controller = SelectionController::new(Some(Box::new(move |id| {
            sink.borrow_mut().push(id.map(str::to_owned));
        })));
        (controller, log)
    }

    #[test]
    fn select_and_deselect_walk_the_phases() {
        let (mut controller, log) = recording();
        assert_eq!(controller.phase(), SelectionPhase::Unselected);

        assert!(controller.select(Some("a")));
        assert_eq!(controller.phase(), SelectionPhase::Selected);

        assert!(controller.select(None));
        assert_eq!(controller.phase(), SelectionPhase::Unselected);
        assert_eq!(*log.borrow(), vec![Some("a".to_owned()), None]);
    }

    #[test]
    fn repeated_selection_does_not_notify() {
        let (mut controller, log) = recording();
        controller.select(Some("a"));
        assert!(!controller.select(Some("a")));
        assert!(!controller.select(Some("a")));
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn filter_auto_selects_focus_and_reset_clears_everything() {
        let (mut controller, log) = recording();
        controller.select(Some("b"));

        controller.enter_filter("a");
        assert_eq!(controller.phase(), SelectionPhase::Filtered);
        assert_eq!(controller.focus(), Some("a"));
        assert_eq!(controller.selected(), Some("a"));

        controller.select(Some("c"));
        assert_eq!(controller.phase(), SelectionPhase::Filtered);

        controller.leave_filter();
        assert_eq!(controller.phase(), SelectionPhase::Unselected);
        assert!(!controller.is_filtered());
        assert_eq!(
            *log.borrow(),
            vec![
                Some("b".to_owned()),
                Some("a".to_owned()),
                Some("c".to_owned()),
                None
            ]
        );
    }

    #[test]
    fn filtering_on_the_selected_node_does_not_renotify() {
        let (mut controller, log) = recording();
        controller.select(Some("a"));
        assert!(!controller.enter_filter("a"));
        assert!(controller.is_filtered());
        assert_eq!(log.borrow().len(), 1);
    }
}
