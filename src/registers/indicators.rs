//! LED bank and RGB LED indicator rendering
//!
//! Writes to the LED and RGB control registers are "displayed" by handing an
//! [`Indicator`] to the module's [`IndicatorSink`].

use std::fmt;

use tracing::info;

/// Bit 31 of the RGB control register: outputs enabled
pub const RGB_ENABLE_BIT: u32 = 1 << 31;

/// Snapshot of the LED register together with the number of fitted LEDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedBank {
    /// Raw LED register value, bit 0 = rightmost LED
    pub value: u32,
    /// Number of LEDs fitted (0..=32)
    pub count: u32,
}

impl LedBank {
    /// Whether LED `index` is lit
    pub fn is_lit(&self, index: u32) -> bool {
        index < self.count && self.value & (1 << index) != 0
    }
}

/// Leftmost LED first, `o` lit and `_` dark, in groups of four each led by two spaces.
impl fmt::Display for LedBank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, index) in (0..self.count).rev().enumerate() {
            if position % 4 == 0 {
                f.write_str("  ")?;
            }
            f.write_str(if self.is_lit(index) { "o" } else { "_" })?;
        }
        Ok(())
    }
}

/// Decoded RGB LED control register.
///
/// ```text
/// bit 31      enable
/// bits 30:24  reserved
/// bits 23:16  red duty cycle
/// bits 15:8   green duty cycle
/// bits 7:0    blue duty cycle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbControl(pub u32);

impl RgbControl {
    /// Outputs enabled
    pub fn enabled(&self) -> bool {
        self.0 & RGB_ENABLE_BIT != 0
    }

    /// Red duty cycle (0..=255)
    pub fn red(&self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Green duty cycle (0..=255)
    pub fn green(&self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Blue duty cycle (0..=255)
    pub fn blue(&self) -> u8 {
        self.0 as u8
    }

    /// Integer percentage of a duty cycle, truncated
    pub fn percent(duty: u8) -> u32 {
        duty as u32 * 100 / 255
    }
}

impl fmt::Display for RgbControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (red, green, blue) = (self.red(), self.green(), self.blue());
        write!(
            f,
            "RedDC={:2}% ({:3}), GrnDC={:2}% ({:3}), BluDC={:2}% ({:3})\tEnable={}",
            Self::percent(red),
            red,
            Self::percent(green),
            green,
            Self::percent(blue),
            blue,
            if self.enabled() { "ON" } else { "OFF" }
        )
    }
}

/// Visible side effect of an output register write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    /// LED register written
    Leds(LedBank),
    /// RGB LED control register written
    Rgb(RgbControl),
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Indicator::Leds(bank) => bank.fmt(f),
            Indicator::Rgb(control) => control.fmt(f),
        }
    }
}

/// Receiver of indicator updates.
pub trait IndicatorSink: Send {
    /// Called after every LED or RGB register write
    fn show(&mut self, indicator: Indicator);
}

impl<F> IndicatorSink for F
where
    F: FnMut(Indicator) + Send,
{
    fn show(&mut self, indicator: Indicator) {
        self(indicator)
    }
}

/// Emits indicator updates as `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl IndicatorSink for TracingSink {
    fn show(&mut self, indicator: Indicator) {
        info!(target: "sensortree::indicators", "{indicator}");
    }
}

/// Prints indicator updates to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl IndicatorSink for ConsoleSink {
    fn show(&mut self, indicator: Indicator) {
        println!("{indicator}");
    }
}
