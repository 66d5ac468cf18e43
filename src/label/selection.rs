//! Press/release tracking over text offsets.
//!
//! The host maps pointer coordinates to a text offset (or `None` when the
//! pointer is outside the text) and feeds touch phases in. An element is
//! activated when the touch ends while it is selected.

use serde::{Deserialize, Serialize};

use crate::scanner::RangedElement;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    Began,
    Moved,
    Ended,
    Cancelled,
}

/// Result of feeding one touch event
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct TouchOutcome {
    /// The label handled the event; the host should not forward it
    pub consumed: bool,
    /// Element to dispatch (only on `Ended`)
    pub activated: Option<RangedElement>,
}

/// Currently pressed element, if any
#[derive(Clone, Debug, Default)]
pub struct Selection {
    selected: Option<RangedElement>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&RangedElement> {
        self.selected.as_ref()
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// `hit` is the element under the pointer for this event
    pub fn on_touch(&mut self, phase: TouchPhase, hit: Option<&RangedElement>) -> TouchOutcome {
        match phase {
            TouchPhase::Began | TouchPhase::Moved => match hit {
                Some(element) => {
                    let same = self
                        .selected
                        .as_ref()
                        .is_some_and(|current| current.range == element.range);
                    if !same {
                        self.selected = Some(element.clone());
                    }
                    TouchOutcome { consumed: true, activated: None }
                }
                None => {
                    self.selected = None;
                    TouchOutcome::default()
                }
            },
            TouchPhase::Ended => match self.selected.take() {
                Some(element) => TouchOutcome { consumed: true, activated: Some(element) },
                None => TouchOutcome::default(),
            },
            TouchPhase::Cancelled => TouchOutcome {
                consumed: self.selected.take().is_some(),
                activated: None,
            },
        }
    }
}
