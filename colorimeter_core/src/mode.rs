//! Mode state machine.
//!
//! [`transition`] is pure: it looks at the current mode, the accepted
//! button mask and a snapshot of engine facts, and says which mode comes
//! next and what the engine must do. Side effects live in the engine.
//!
//! | current | press | result |
//! |---|---|---|
//! | Measure | menu | enter Menu |
//! | Measure | blank (not raw sensor) | blank |
//! | Measure | gain (raw sensor only) | cycle gain |
//! | Menu | menu | enter Measure |
//! | Menu | up / down | move cursor |
//! | Menu | right on About | enter Message, show about |
//! | Menu | right on a measurement | select it, enter Measure |
//! | Message | any, messages queued | enter Message, show next |
//! | Message | menu | enter Menu |
//! | Message | any other | enter Measure |
//! | Abort | any | nothing |

use colorimeter_traits::Buttons;

use crate::menu::ABOUT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Measure,
    Menu,
    Message,
    /// Terminal. Only a reset leaves it.
    Abort,
}

impl core::fmt::Display for Mode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Mode::Measure => "measure",
            Mode::Menu => "menu",
            Mode::Message => "message",
            Mode::Abort => "abort",
        };
        f.write_str(s)
    }
}

/// Engine facts a transition depends on.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    /// Current measurement is the raw sensor view.
    pub raw_sensor: bool,
    /// Startup notices or rejected profiles still waiting to be shown.
    pub messages_pending: bool,
    /// Menu item under the cursor.
    pub selected: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Blank,
    CycleGain,
    MenuUp,
    MenuDown,
    SelectMeasurement(String),
    ShowAbout,
    ShowNextMessage,
}

/// Outcome of an accepted press.
///
/// `enter` is the mode to (re)enter; entering always rebuilds the mode's
/// screen, even when it equals the current mode. Directives run after that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub enter: Option<Mode>,
    pub directives: Vec<Directive>,
}

impl Transition {
    fn enter(mode: Mode) -> Self {
        Self {
            enter: Some(mode),
            directives: Vec::new(),
        }
    }

    fn stay(directive: Directive) -> Self {
        Self {
            enter: None,
            directives: vec![directive],
        }
    }

    fn then(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }
}

/// Next step for `pressed` in `mode`, or `None` when the press means
/// nothing there. Within a mode the first matching row of the table wins.
pub fn transition(mode: Mode, pressed: Buttons, ctx: &Context<'_>) -> Option<Transition> {
    if pressed.is_empty() {
        return None;
    }
    match mode {
        Mode::Measure => {
            if pressed.contains(Buttons::BLANK) && !ctx.raw_sensor {
                Some(Transition::stay(Directive::Blank))
            } else if pressed.contains(Buttons::MENU) {
                Some(Transition::enter(Mode::Menu))
            } else if pressed.contains(Buttons::GAIN) && ctx.raw_sensor {
                Some(Transition::stay(Directive::CycleGain))
            } else {
                None
            }
        }
        Mode::Menu => {
            if pressed.contains(Buttons::MENU) {
                Some(Transition::enter(Mode::Measure))
            } else if pressed.contains(Buttons::UP) {
                Some(Transition::stay(Directive::MenuUp))
            } else if pressed.contains(Buttons::DOWN) {
                Some(Transition::stay(Directive::MenuDown))
            } else if pressed.contains(Buttons::RIGHT) {
                if ctx.selected == ABOUT {
                    Some(Transition::enter(Mode::Message).then(Directive::ShowAbout))
                } else {
                    Some(
                        Transition::enter(Mode::Measure)
                            .then(Directive::SelectMeasurement(ctx.selected.to_string())),
                    )
                }
            } else {
                None
            }
        }
        Mode::Message => {
            if ctx.messages_pending {
                Some(Transition::enter(Mode::Message).then(Directive::ShowNextMessage))
            } else if pressed.contains(Buttons::MENU) {
                Some(Transition::enter(Mode::Menu))
            } else {
                Some(Transition::enter(Mode::Measure))
            }
        }
        Mode::Abort => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CTX: Context<'static> = Context {
        raw_sensor: false,
        messages_pending: false,
        selected: "Absorbance",
    };

    #[test]
    fn nothing_pressed_is_no_transition() {
        assert_eq!(transition(Mode::Measure, Buttons::NONE, &CTX), None);
    }

    #[test]
    fn abort_ignores_everything() {
        assert_eq!(transition(Mode::Abort, Buttons::MENU, &CTX), None);
    }

    #[test]
    fn blank_wins_over_menu_when_both_pressed() {
        let t = transition(Mode::Measure, Buttons::BLANK | Buttons::MENU, &CTX).unwrap();
        assert_eq!(t, Transition::stay(Directive::Blank));
    }
}
