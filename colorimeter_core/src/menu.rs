//! Menu contents, cursor and scrolling window.

use crate::calibrations::Calibrations;
use crate::measurement::DEFAULT_MEASUREMENTS;

/// Informational entry appended after the measurements.
pub const ABOUT: &str = "About";

/// Name width kept when a label carries both led and channel.
const SHORT_NAME_CHARS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    items: Vec<String>,
    items_per_screen: usize,
    view_pos: usize,
    item_pos: usize,
}

impl Menu {
    /// Built-in measurements, then accepted profiles in name order, then
    /// [`ABOUT`].
    pub fn new(calibrations: &Calibrations, items_per_screen: usize) -> Self {
        let items = DEFAULT_MEASUREMENTS
            .iter()
            .copied()
            .chain(calibrations.names())
            .chain(std::iter::once(ABOUT))
            .map(str::to_string)
            .collect();
        Self {
            items,
            items_per_screen: items_per_screen.max(1),
            view_pos: 0,
            item_pos: 0,
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Selectable measurement names (everything except [`ABOUT`]).
    pub fn contains_measurement(&self, name: &str) -> bool {
        name != ABOUT && self.items.iter().any(|i| i == name)
    }

    /// View at the top, selection on the first item.
    pub fn reset(&mut self) {
        self.view_pos = 0;
        self.item_pos = 0;
    }

    pub fn up(&mut self) {
        if self.item_pos == 0 {
            return;
        }
        self.item_pos -= 1;
        if self.item_pos < self.view_pos {
            self.view_pos = self.item_pos;
        }
    }

    pub fn down(&mut self) {
        if self.item_pos + 1 >= self.items.len() {
            return;
        }
        self.item_pos += 1;
        if self.item_pos >= self.view_pos + self.items_per_screen {
            self.view_pos = self.item_pos + 1 - self.items_per_screen;
        }
    }

    pub fn selected(&self) -> &str {
        self.items.get(self.item_pos).map_or(ABOUT, String::as_str)
    }

    pub fn item_pos(&self) -> usize {
        self.item_pos
    }

    pub fn view_pos(&self) -> usize {
        self.view_pos
    }

    /// Labels of the visible window and the highlighted row within it.
    pub fn view(&self, calibrations: &Calibrations) -> (Vec<String>, usize) {
        let labels = self
            .items
            .iter()
            .enumerate()
            .skip(self.view_pos)
            .take(self.items_per_screen)
            .map(|(n, item)| label(n, item, calibrations))
            .collect();
        (labels, self.item_pos - self.view_pos)
    }
}

fn label(n: usize, item: &str, calibrations: &Calibrations) -> String {
    let led = calibrations.led(item);
    let channel = calibrations.channel(item);
    match (led, channel) {
        (None, None) => format!("{n} {item}"),
        (Some(led), None) => format!("{n} {item} ({led})"),
        (None, Some(ch)) => format!("{n} {item} ({ch})"),
        (Some(led), Some(ch)) => {
            let short: String = item.chars().take(SHORT_NAME_CHARS).collect();
            format!("{n} {short} ({led},{ch})")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn calibrations() -> Calibrations {
        let raw = json!({
            "Nitrate": {"fit_type": "linear", "fit_coef": [1], "led": "red"},
            "Phosphorus": {"fit_type": "linear", "fit_coef": [1], "led": "uv", "channel": 0},
            "Silica": {"fit_type": "linear", "fit_coef": [1], "channel": 9}
        });
        Calibrations::from_raw(raw.as_object().unwrap())
    }

    #[test]
    fn items_and_labels() {
        let c = calibrations();
        let m = Menu::new(&c, 10);
        let (labels, current) = m.view(&c);
        assert_eq!(current, 0);
        assert_eq!(
            labels,
            vec![
                "0 Absorbance",
                "1 Transmittance",
                "2 Raw Sensor",
                "3 Nitrate (red)",
                "4 Phosphor (uv,415nm)",
                "5 Silica (Clear)",
                "6 About",
            ]
        );
    }

    #[test]
    fn cursor_clamps_and_window_scrolls() {
        let c = calibrations();
        let mut m = Menu::new(&c, 3);
        m.up();
        assert_eq!(m.item_pos(), 0);
        for _ in 0..4 {
            m.down();
        }
        assert_eq!((m.item_pos(), m.view_pos()), (4, 2));
        for _ in 0..10 {
            m.down();
        }
        assert_eq!(m.selected(), ABOUT);
        assert_eq!(m.view(&c).1, 2);
        for _ in 0..5 {
            m.up();
        }
        assert_eq!((m.item_pos(), m.view_pos()), (1, 1));
        m.reset();
        assert_eq!((m.item_pos(), m.view_pos()), (0, 0));
    }
}
