//! Marker hover state.
//!
//! Entering a marker makes it active, highlights its state, moves the tooltip
//! and starts a one-shot pulse. When the pulse finishes it may start again,
//! but only if the same marker is still active *and* nothing has happened to
//! it since: every enter and leave bumps a per-marker generation, and a
//! [`PulseToken`] carries the generation it was issued under. A pulse that
//! completes after its marker was left (even if the marker was re-entered in
//! between) is stale and stops.

use std::collections::HashMap;

use crate::content::Location;

/// Tooltip shown next to the active marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub content: String,
    /// Pixel position, offset from the marker.
    pub position: [f64; 2],
}

/// Identifies one pulse animation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PulseToken {
    pub marker: String,
    pub generation: u64,
}

/// Hover state for the map's markers.
#[derive(Debug, Clone, Default)]
pub struct HoverController {
    active: Option<String>,
    highlighted_state: Option<String>,
    tooltip: Option<Tooltip>,
    pulse: Option<PulseToken>,
    generations: HashMap<String, u64>,
}

impl HoverController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer entered the marker for `location`, drawn at `position`.
    pub fn enter(&mut self, location: &Location, position: [f64; 2]) -> PulseToken {
        let generation = self.bump(location.id);
        self.active = Some(location.id.to_owned());
        self.highlighted_state = Some(location.state.to_owned());
        self.tooltip = Some(Tooltip {
            content: format!(
                "{}, {}: {} units available",
                location.name, location.state, location.equipment_count
            ),
            position: [position[0] + 15.0, position[1] - 10.0],
        });
        let token = PulseToken {
            marker: location.id.to_owned(),
            generation,
        };
        self.pulse = Some(token.clone());
        token
    }

    /// Pointer left the marker `id`. Leaving a marker that is not active only
    /// invalidates its pending pulses.
    pub fn leave(&mut self, id: &str) {
        self.bump(id);
        if self.active.as_deref() == Some(id) {
            self.active = None;
            self.highlighted_state = None;
            self.tooltip = None;
            self.pulse = None;
        }
    }

    /// A pulse run finished. Returns the token for the next run, or `None`
    /// when the pulse must stop.
    pub fn pulse_finished(&self, token: &PulseToken) -> Option<PulseToken> {
        let still_active = self.active.as_deref() == Some(token.marker.as_str());
        let current = self.generations.get(&token.marker).copied().unwrap_or(0);
        (still_active && current == token.generation).then(|| token.clone())
    }

    #[must_use]
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Abbreviation of the highlighted state.
    #[must_use]
    pub fn highlighted_state(&self) -> Option<&str> {
        self.highlighted_state.as_deref()
    }

    /// Token of the pulse started by the last enter, while its marker is
    /// active.
    #[must_use]
    pub fn pulse(&self) -> Option<&PulseToken> {
        self.pulse.as_ref()
    }

    #[must_use]
    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    fn bump(&mut self, id: &str) -> u64 {
        let generation = self.generations.entry(id.to_owned()).or_insert(0);
        *generation += 1;
        *generation
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::content::LOCATIONS;

    fn denver() -> &'static Location {
        LOCATIONS.iter().find(|l| l.id == "denver").unwrap()
    }

    fn miami() -> &'static Location {
        LOCATIONS.iter().find(|l| l.id == "miami").unwrap()
    }

    #[test]
    fn enter_sets_highlight_and_tooltip() {
        let mut hover = HoverController::new();
        hover.enter(denver(), [100.0, 200.0]);

        assert_eq!(hover.active(), Some("denver"));
        assert_eq!(hover.highlighted_state(), Some("CO"));
        let tooltip = hover.tooltip().unwrap();
        assert_eq!(tooltip.content, "Denver, CO: 126 units available");
        assert_eq!(tooltip.position, [115.0, 190.0]);
    }

    #[test]
    fn pulse_repeats_while_marker_stays_active() {
        let mut hover = HoverController::new();
        let token = hover.enter(denver(), [0.0, 0.0]);
        assert_eq!(hover.pulse(), Some(&token));
        let next = hover.pulse_finished(&token).unwrap();
        assert!(hover.pulse_finished(&next).is_some());
    }

    #[test]
    fn pulse_stops_after_leave() {
        let mut hover = HoverController::new();
        let token = hover.enter(denver(), [0.0, 0.0]);
        hover.leave("denver");
        assert!(hover.pulse_finished(&token).is_none());
        assert!(hover.pulse().is_none());
        assert!(hover.tooltip().is_none());
        assert!(hover.highlighted_state().is_none());
    }

    #[test]
    fn stale_pulse_does_not_resurrect_after_reenter() {
        let mut hover = HoverController::new();
        let stale = hover.enter(denver(), [0.0, 0.0]);
        hover.leave("denver");
        let fresh = hover.enter(denver(), [0.0, 0.0]);

        assert!(hover.pulse_finished(&stale).is_none());
        assert!(hover.pulse_finished(&fresh).is_some());
    }

    #[test]
    fn moving_to_another_marker_stops_the_first_pulse() {
        let mut hover = HoverController::new();
        let first = hover.enter(denver(), [0.0, 0.0]);
        let second = hover.enter(miami(), [0.0, 0.0]);

        assert!(hover.pulse_finished(&first).is_none());
        assert!(hover.pulse_finished(&second).is_some());

        // A late leave for the old marker must not clear the new one.
        hover.leave("denver");
        assert_eq!(hover.active(), Some("miami"));
        assert_eq!(hover.highlighted_state(), Some("FL"));
    }
}
