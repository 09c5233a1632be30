#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Display layer: screen state plus renderers.
pub mod render;
pub mod screens;

pub use render::{RecordingRenderer, Renderer, TextRenderer, View, format_reading, render_text};
pub use screens::{MeasureScreen, MenuScreen, MessageKind, MessageScreen, Reading, ValueLine};

#[cfg(test)]
mod tests {
    use super::*;
    use colorimeter_traits::Gain;
    use rstest::rstest;

    #[rstest]
    #[case(Reading::Number(0.30103), 3, "0.301")]
    #[case(Reading::Number(2.0), 0, "2")]
    #[case(Reading::Percent(-4.5), 2, "-4.5%")]
    #[case(Reading::Percent(12.0), 2, "12%")]
    #[case(Reading::Missing, 2, "---")]
    #[case(Reading::Text("N/A".into()), 2, "N/A")]
    fn readings_format(#[case] r: Reading, #[case] precision: usize, #[case] expect: &str) {
        assert_eq!(format_reading(&r, precision), expect);
    }

    #[test]
    fn measure_frame_shows_values_and_status() {
        let mut s = MeasureScreen::new();
        s.set_measurement(
            "Absorbance",
            None,
            vec![ValueLine::new("415nm", Reading::Number(0.5))],
            2,
        );
        s.set_blanked();
        s.set_gain(Gain::X64);
        s.set_battery(3.91);
        let text = render_text(View::Measure(&s));
        assert!(text.starts_with("Absorbance\n"));
        assert!(text.contains("415nm   0.50"));
        assert!(text.contains("[blanked] gain 64x bat 3.9V"));
    }

    #[test]
    fn overflow_replaces_values() {
        let mut s = MeasureScreen::new();
        s.set_measurement(
            "Raw Sensor",
            None,
            vec![ValueLine::new("415nm", Reading::Number(1.0))],
            0,
        );
        s.set_overflow("Raw Sensor");
        let text = render_text(View::Measure(&s));
        assert!(text.contains("overflow"));
        assert!(!text.contains("415nm"));
    }

    #[test]
    fn menu_marks_current_row() {
        let mut m = MenuScreen::new(3);
        m.set_menu_items(vec!["0 Absorbance".into(), "1 Transmittance".into()]);
        m.set_curr_item(1);
        let text = render_text(View::Menu(&m));
        assert!(text.contains("  0 Absorbance"));
        assert!(text.contains("> 1 Transmittance"));
    }

    #[test]
    fn abort_message_has_no_continue_hint() {
        let mut m = MessageScreen::new();
        m.set_message("missing sensor? not detected", false);
        m.set_to_abort();
        let text = render_text(View::Message(&m));
        assert!(text.starts_with("ABORT: missing sensor?"));
        assert!(!text.contains("press any button"));
    }

    #[test]
    fn text_renderer_can_skip_repeats() {
        let m = MessageScreen::new();
        let mut r = TextRenderer::new(Vec::new()).only_changes();
        r.render(View::Message(&m));
        r.render(View::Message(&m));
        let out = String::from_utf8(r.into_inner()).unwrap();
        assert_eq!(out.matches("ERROR").count(), 1);
    }

    #[test]
    fn recording_renderer_keeps_every_frame() {
        let mut r = RecordingRenderer::new();
        let mut m = MessageScreen::new();
        r.render(View::Message(&m));
        m.set_to_about();
        m.set_message("firmware version 1.0", true);
        r.render(View::Message(&m));
        assert_eq!(r.frames.len(), 2);
        assert_eq!(r.last(), Some("ABOUT: firmware version 1.0\npress any button\n"));
    }
}
