use anyhow::{Context, Result};

use crate::input::focus::{FocusGroup, FocusMask};

/// Tick rate assumed when converting tap times to ticks
pub const DEFAULT_TICKS_PER_SECOND: u32 = 60;

/// Engine settings that can be loaded from a `key = value` file
#[derive(Debug, Clone, PartialEq)]
pub struct InputConfig {
    /// Ticks per second of the caller's update loop
    pub ticks_per_second: u32,
    /// Focus groups active at startup
    pub focused: FocusMask,
    /// Double-tap time applied to every new command, in seconds
    pub tap_time: Option<f32>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            focused: FocusMask::ALL,
            tap_time: None,
        }
    }
}

impl InputConfig {
    /// Parse settings text.
    ///
    /// Blank lines and `#` comments are skipped; unknown keys are an error.
    pub fn parse(text: &str) -> Result<Self> {
        let mut config = Self::default();

        for (number, raw) in text.lines().enumerate() {
            let line = raw.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }

            let (key, value) = line
                .split_once('=')
                .with_context(|| format!("Line {}: expected key = value", number + 1))?;
            let value = value.trim();

            match key.trim() {
                "ticks_per_second" => {
                    let ticks: u32 = value
                        .parse()
                        .with_context(|| format!("Line {}: invalid tick rate", number + 1))?;
                    if ticks == 0 {
                        anyhow::bail!("Line {}: tick rate must be positive", number + 1);
                    }
                    config.ticks_per_second = ticks;
                }
                "focused" => {
                    config.focused = parse_focus_groups(value)
                        .with_context(|| format!("Line {}: invalid focus groups", number + 1))?;
                }
                "tap_time" => {
                    config.tap_time = if value.eq_ignore_ascii_case("off") {
                        None
                    } else {
                        Some(
                            parse_tap_time(value)
                                .with_context(|| format!("Line {}: invalid tap time", number + 1))?,
                        )
                    };
                }
                other => anyhow::bail!("Line {}: unknown setting '{}'", number + 1, other),
            }
        }

        Ok(config)
    }

    /// Double-tap window as a tick exponent, if tap detection is configured
    pub fn tap_ticks(&self) -> Option<u32> {
        self.tap_time
            .map(|seconds| (seconds * self.ticks_per_second as f32) as u32)
    }
}

/// Parse a focus group list: "all", "none", or comma-separated numbers 0-7
pub fn parse_focus_groups(s: &str) -> Result<FocusMask> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("all") {
        return Ok(FocusMask::ALL);
    }
    if s.eq_ignore_ascii_case("none") {
        return Ok(FocusMask::NONE);
    }

    s.split(',')
        .map(|part| {
            let index: u8 = part.trim().parse().context("Invalid focus group number")?;
            FocusGroup::new(index)
                .with_context(|| format!("Focus group {} out of range (0 to 7)", index))
        })
        .collect()
}

/// Parse a tap time: "250ms", "0.25s", or bare seconds
pub fn parse_tap_time(s: &str) -> Result<f32> {
    let s = s.trim();
    let seconds = if let Some(ms) = s.strip_suffix("ms") {
        let ms: f32 = ms.trim().parse().context("Invalid millisecond value")?;
        ms / 1000.0
    } else {
        let secs = s.strip_suffix('s').unwrap_or(s);
        secs.trim().parse().context("Invalid seconds value")?
    };

    if !seconds.is_finite() || seconds < 0.0 {
        anyhow::bail!("Tap time must be a non-negative number");
    }

    Ok(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = InputConfig::default();
        assert_eq!(config.ticks_per_second, 60);
        assert_eq!(config.focused, FocusMask::ALL);
        assert!(config.tap_time.is_none());
        assert!(config.tap_ticks().is_none());
    }

    #[test]
    fn test_parse_config() {
        let text = "\
# input settings
ticks_per_second = 30

focused = 0, 2   # menus and gameplay
tap_time = 100ms
";
        let config = InputConfig::parse(text).unwrap();
        assert_eq!(config.ticks_per_second, 30);
        assert_eq!(config.focused.bits(), 0b101);
        assert_eq!(config.tap_time, Some(0.1));
        assert_eq!(config.tap_ticks(), Some(3));
    }

    #[test]
    fn test_parse_config_tap_off() {
        let config = InputConfig::parse("tap_time = 1s\ntap_time = off").unwrap();
        assert!(config.tap_time.is_none());
    }

    #[test]
    fn test_parse_config_errors() {
        assert!(InputConfig::parse("ticks_per_second").is_err());
        assert!(InputConfig::parse("ticks_per_second = 0").is_err());
        assert!(InputConfig::parse("ticks_per_second = fast").is_err());
        assert!(InputConfig::parse("volume = 3").is_err());
        assert!(InputConfig::parse("focused = 9").is_err());

        let err = InputConfig::parse("\n\nbogus = 1").unwrap_err();
        assert!(err.to_string().contains("Line 3"));
    }

    #[test]
    fn test_parse_focus_groups() {
        assert_eq!(parse_focus_groups("all").unwrap(), FocusMask::ALL);
        assert_eq!(parse_focus_groups("NONE").unwrap(), FocusMask::NONE);
        assert_eq!(parse_focus_groups("7").unwrap().bits(), 0b1000_0000);
        assert_eq!(parse_focus_groups("1, 3,5").unwrap().bits(), 0b0010_1010);
        assert!(parse_focus_groups("8").is_err());
        assert!(parse_focus_groups("one").is_err());
        assert!(parse_focus_groups("").is_err());
    }

    #[test]
    fn test_parse_tap_time() {
        assert_eq!(parse_tap_time("250ms").unwrap(), 0.25);
        assert_eq!(parse_tap_time("0.5s").unwrap(), 0.5);
        assert_eq!(parse_tap_time("2").unwrap(), 2.0);
        assert!(parse_tap_time("-1").is_err());
        assert!(parse_tap_time("soon").is_err());
        assert!(parse_tap_time("inf").is_err());
    }
}
