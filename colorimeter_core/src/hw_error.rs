//! Maps `Box<dyn Error>` from trait boundaries to typed `SensorError`.
//!
//! The traits in `colorimeter_traits` use `Box<dyn Error + Send + Sync>`;
//! this module converts those to our typed error enum, with an optional
//! feature-gated path for `colorimeter_hardware::HwError` downcasting.

use crate::error::SensorError;

/// Map a trait-boundary error to a typed `SensorError`.
///
/// Attempts to downcast known hardware error types first, then falls back
/// to string-based heuristics.
pub fn map_hw_error(e: &(dyn std::error::Error + 'static)) -> SensorError {
    #[cfg(feature = "hardware-errors")]
    {
        use colorimeter_hardware::error::HwError;
        if let Some(hw) = e.downcast_ref::<HwError>() {
            return match hw {
                HwError::Overflow { channel } => SensorError::Overflow {
                    channel: Some(*channel),
                },
                other => SensorError::Io(other.to_string()),
            };
        }
    }

    let s = e.to_string();
    let lower = s.to_lowercase();
    if lower.contains("overflow") || lower.contains("saturat") {
        SensorError::Overflow { channel: None }
    } else {
        SensorError::Io(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_fallback_detects_overflow() {
        let e: Box<dyn std::error::Error + Send + Sync> = "ADC overflow".into();
        assert_eq!(
            map_hw_error(&*e),
            SensorError::Overflow { channel: None }
        );
    }

    #[test]
    fn other_strings_are_io() {
        let e: Box<dyn std::error::Error + Send + Sync> = "i2c nack".into();
        assert_eq!(map_hw_error(&*e), SensorError::Io("i2c nack".into()));
    }

    #[cfg(feature = "hardware-errors")]
    #[test]
    fn typed_overflow_keeps_channel() {
        let e: Box<dyn std::error::Error + Send + Sync> =
            Box::new(colorimeter_hardware::error::HwError::Overflow { channel: 3 });
        assert_eq!(
            map_hw_error(&*e),
            SensorError::Overflow { channel: Some(3) }
        );
    }
}
