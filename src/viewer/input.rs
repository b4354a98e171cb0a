//! Translation of host input events into navigation intents.
//!
//! The host wires real event listeners (pointer, wheel, touch, keyboard,
//! resize) and forwards them here; the mapping itself is pure. Pointer and
//! tap positions are interpreted relative to the viewing region's midpoint:
//! left half pages backward, right half pages forward.

/// A host input event, already reduced to the fields navigation cares
/// about.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer click at `x` within a region `width` wide.
    Pointer { x: f64, width: f64 },
    /// Wheel scroll; positive `delta_y` scrolls down.
    Wheel { delta_y: f64 },
    /// Touch tap at `x` within a region `width` wide.
    Tap { x: f64, width: f64 },
    /// Arrow key press. Ignored while another interactive control holds
    /// input focus.
    Key {
        key: NavKey,
        control_focused: bool,
    },
    /// The viewing region changed size.
    Resize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowLeft,
    ArrowRight,
}

/// What the session should do in response to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavIntent {
    PreviousPage,
    NextPage,
    /// Re-fit the current bitmap at the new viewport; no re-decode.
    Refit,
}

/// Map an input event to a navigation intent, if it has one.
pub fn intent(event: InputEvent) -> Option<NavIntent> {
    match event {
        InputEvent::Pointer { x, width } | InputEvent::Tap { x, width } => {
            if x < width / 2.0 {
                Some(NavIntent::PreviousPage)
            } else {
                Some(NavIntent::NextPage)
            }
        }
        InputEvent::Wheel { delta_y } => {
            if delta_y > 0.0 {
                Some(NavIntent::NextPage)
            } else if delta_y < 0.0 {
                Some(NavIntent::PreviousPage)
            } else {
                None
            }
        }
        InputEvent::Key {
            control_focused: true,
            ..
        } => None,
        InputEvent::Key {
            key: NavKey::ArrowLeft,
            ..
        } => Some(NavIntent::PreviousPage),
        InputEvent::Key {
            key: NavKey::ArrowRight,
            ..
        } => Some(NavIntent::NextPage),
        InputEvent::Resize => Some(NavIntent::Refit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_sides_of_the_midpoint() {
        let left = InputEvent::Pointer { x: 10.0, width: 100.0 };
        let right = InputEvent::Pointer { x: 90.0, width: 100.0 };
        assert_eq!(intent(left), Some(NavIntent::PreviousPage));
        assert_eq!(intent(right), Some(NavIntent::NextPage));
    }

    #[test]
    fn tap_follows_the_same_rule() {
        let tap = InputEvent::Tap { x: 60.0, width: 100.0 };
        assert_eq!(intent(tap), Some(NavIntent::NextPage));
    }

    #[test]
    fn wheel_direction() {
        assert_eq!(
            intent(InputEvent::Wheel { delta_y: 3.0 }),
            Some(NavIntent::NextPage)
        );
        assert_eq!(
            intent(InputEvent::Wheel { delta_y: -3.0 }),
            Some(NavIntent::PreviousPage)
        );
        assert_eq!(intent(InputEvent::Wheel { delta_y: 0.0 }), None);
    }

    #[test]
    fn keys_respect_control_focus() {
        let free = InputEvent::Key {
            key: NavKey::ArrowRight,
            control_focused: false,
        };
        let captured = InputEvent::Key {
            key: NavKey::ArrowRight,
            control_focused: true,
        };
        assert_eq!(intent(free), Some(NavIntent::NextPage));
        assert_eq!(intent(captured), None);
    }

    #[test]
    fn resize_requests_a_refit() {
        assert_eq!(intent(InputEvent::Resize), Some(NavIntent::Refit));
    }
}
