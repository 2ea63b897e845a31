//! Emulated memory-mapped I/O module
//!
//! Eight 32-bit registers, byte addressed:
//!
//! | Offset | Register    | Access                          |
//! |--------|-------------|---------------------------------|
//! | 0x00   | switches    | read-only input                 |
//! | 0x04   | leds        | read/write, displayed on write  |
//! | 0x08   | rgb_led     | read/write, displayed on write  |
//! | 0x0C   | temperature | read-only input (AHT20 format)  |
//! | 0x10   | humidity    | read-only input (AHT20 format)  |
//! | 0x14   | reserved_1  | read/write scratch              |
//! | 0x18   | reserved_2  | read/write scratch              |
//! | 0x1C   | reserved_3  | read/write scratch              |
//!
//! Each [`IoModule`] owns its register bank. Accesses go through the
//! [`IoBase`] handle returned by [`IoModule::base`]; a handle from a different
//! module is rejected the way a wrong base pointer would be.

mod indicators;
mod sensor;

pub use indicators::{
    ConsoleSink, Indicator, IndicatorSink, LedBank, RgbControl, TracingSink, RGB_ENABLE_BIT,
};
pub use sensor::{
    decode_humidity, decode_temperature, encode_humidity, encode_temperature, random_in_range,
    sampleable_bounds, SensorRangeError, SENSOR_FULL_SCALE,
};

use std::fmt;
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tracing::{debug, trace};

/// Switch register offset
pub const SWITCHES_REG: u32 = 0x00;
/// LED register offset
pub const LEDS_REG: u32 = 0x04;
/// RGB LED control register offset
pub const RGB_LED_REG: u32 = 0x08;
/// Temperature register offset
pub const TEMP_REG: u32 = 0x0C;
/// Humidity register offset
pub const HUMID_REG: u32 = 0x10;
/// First scratch register offset
pub const RSVD1_REG: u32 = 0x14;
/// Second scratch register offset
pub const RSVD2_REG: u32 = 0x18;
/// Third scratch register offset
pub const RSVD3_REG: u32 = 0x1C;

/// Number of registers in the I/O map
pub const NUM_IO_REGS: usize = 8;
/// Register width in bytes
pub const REG_WIDTH: u32 = 4;
/// Highest valid byte offset
pub const MAX_OFFSET: u32 = (NUM_IO_REGS as u32 - 1) * REG_WIDTH;
/// Maximum number of switches or LEDs
pub const MAX_LINES: u32 = 32;

/// Power-on sensor temperature (degrees C)
pub const RESET_TEMPERATURE: f32 = 23.5;
/// Power-on sensor humidity (%RH)
pub const RESET_HUMIDITY: f32 = 75.0;

static NEXT_MODULE_ID: AtomicU64 = AtomicU64::new(1);

/// Registers of the I/O map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    /// Switch inputs, one bit per switch
    Switches,
    /// LED outputs, one bit per LED
    Leds,
    /// RGB LED enable and duty cycles
    RgbLed,
    /// Raw AHT20 temperature
    Temperature,
    /// Raw AHT20 humidity
    Humidity,
    /// Scratch register 1
    Reserved1,
    /// Scratch register 2
    Reserved2,
    /// Scratch register 3
    Reserved3,
}

impl Register {
    /// All registers in address order
    pub const ALL: [Register; NUM_IO_REGS] = [
        Register::Switches,
        Register::Leds,
        Register::RgbLed,
        Register::Temperature,
        Register::Humidity,
        Register::Reserved1,
        Register::Reserved2,
        Register::Reserved3,
    ];

    /// Byte offset of this register
    pub fn offset(self) -> u32 {
        match self {
            Register::Switches => SWITCHES_REG,
            Register::Leds => LEDS_REG,
            Register::RgbLed => RGB_LED_REG,
            Register::Temperature => TEMP_REG,
            Register::Humidity => HUMID_REG,
            Register::Reserved1 => RSVD1_REG,
            Register::Reserved2 => RSVD2_REG,
            Register::Reserved3 => RSVD3_REG,
        }
    }

    /// Register mapped at a byte offset
    pub fn from_offset(offset: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|reg| reg.offset() == offset)
    }

    /// Inputs driven by the emulated hardware; writes are ignored.
    pub fn is_read_only(self) -> bool {
        matches!(
            self,
            Register::Switches | Register::Temperature | Register::Humidity
        )
    }

    fn index(self) -> usize {
        (self.offset() / REG_WIDTH) as usize
    }
}

/// Handle identifying the register bank of one [`IoModule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IoBase(u64);

/// Register access and setup failures.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RegisterError {
    /// Handle does not belong to the module being accessed
    #[error("base handle does not belong to this I/O module")]
    WrongBase,

    /// Offset past the last register
    #[error("offset {offset:#04x} is outside the register map (max {:#04x})", MAX_OFFSET)]
    OutOfRange {
        /// Requested byte offset
        offset: u32,
    },

    /// Offset not on a 4-byte register boundary
    #[error("offset {offset:#04x} is not on a register boundary")]
    Misaligned {
        /// Requested byte offset
        offset: u32,
    },

    /// No register mapped at the offset
    #[error("no register mapped at offset {offset:#04x}")]
    UnknownRegister {
        /// Requested byte offset
        offset: u32,
    },

    /// Switch or LED count outside 0..=32
    #[error("{what} count {count} exceeds {}", MAX_LINES)]
    InvalidSetup {
        /// "switch" or "LED"
        what: &'static str,
        /// Requested count
        count: u32,
    },
}

impl RegisterError {
    /// Numeric return code reported by the peripheral (0 is success)
    pub fn code(&self) -> i32 {
        match self {
            RegisterError::WrongBase => 1,
            RegisterError::OutOfRange { .. } => 2,
            RegisterError::Misaligned { .. } => 3,
            RegisterError::UnknownRegister { .. } => 4,
            RegisterError::InvalidSetup { .. } => 5,
        }
    }
}

/// Setup parameters for an [`IoModule`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IoConfig {
    /// Number of switches (0..=32)
    pub num_switches: u32,

    /// Number of LEDs (0..=32)
    pub num_leds: u32,

    /// Seed for synthetic sensor values; `None` seeds from OS entropy
    pub seed: Option<u64>,
}

impl IoConfig {
    /// Configuration with the given switch and LED counts
    pub fn new(num_switches: u32, num_leds: u32) -> Self {
        Self {
            num_switches,
            num_leds,
            seed: None,
        }
    }

    /// Use a fixed seed for reproducible sensor values
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn validate(&self) -> Result<(), RegisterError> {
        if self.num_switches > MAX_LINES {
            return Err(RegisterError::InvalidSetup {
                what: "switch",
                count: self.num_switches,
            });
        }
        if self.num_leds > MAX_LINES {
            return Err(RegisterError::InvalidSetup {
                what: "LED",
                count: self.num_leds,
            });
        }
        Ok(())
    }
}

/// Emulated I/O module with its own register bank.
pub struct IoModule {
    regs: [u32; NUM_IO_REGS],
    base: IoBase,
    num_switches: u32,
    num_leds: u32,
    rng: StdRng,
    sink: Box<dyn IndicatorSink>,
}

impl IoModule {
    /// Validate the configuration and bring the register bank to its reset state.
    pub fn initialize(config: IoConfig) -> Result<Self, RegisterError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut module = Self {
            regs: [0; NUM_IO_REGS],
            base: IoBase(NEXT_MODULE_ID.fetch_add(1, Ordering::Relaxed)),
            num_switches: config.num_switches,
            num_leds: config.num_leds,
            rng,
            sink: Box::new(TracingSink),
        };

        module.store(Register::Reserved1, 0x1111_1111);
        module.store(Register::Reserved2, 0x2222_2222);
        module.store(Register::Reserved3, 0x3333_3333);
        module.set_sensor(RESET_TEMPERATURE, RESET_HUMIDITY);

        debug!(
            switches = config.num_switches,
            leds = config.num_leds,
            seeded = config.seed.is_some(),
            "initialized I/O module"
        );
        Ok(module)
    }

    /// Replace the receiver of LED/RGB updates.
    pub fn with_sink<S>(mut self, sink: S) -> Self
    where
        S: IndicatorSink + 'static,
    {
        self.sink = Box::new(sink);
        self
    }

    /// Handle to this module's register bank
    pub fn base(&self) -> IoBase {
        self.base
    }

    /// Configured number of switches
    pub fn num_switches(&self) -> u32 {
        self.num_switches
    }

    /// Configured number of LEDs
    pub fn num_leds(&self) -> u32 {
        self.num_leds
    }

    /// Read the register at `base + offset`.
    pub fn read_reg(&self, base: IoBase, offset: u32) -> Result<u32, RegisterError> {
        let reg = self.resolve(base, offset)?;
        Ok(self.read(reg))
    }

    /// Write the register at `base + offset`, returning the value written.
    ///
    /// Writes to read-only inputs succeed without changing them.
    pub fn write_reg(&mut self, base: IoBase, offset: u32, value: u32) -> Result<u32, RegisterError> {
        let reg = self.resolve(base, offset)?;
        trace!(?reg, value = %format_args!("{value:#010x}"), "register write");

        match reg {
            _ if reg.is_read_only() => {
                debug!(?reg, "ignoring write to read-only register");
            }
            Register::Leds => {
                self.store(reg, value);
                self.sink.show(Indicator::Leds(LedBank {
                    value,
                    count: self.num_leds,
                }));
            }
            Register::RgbLed => {
                self.store(reg, value);
                self.sink.show(Indicator::Rgb(RgbControl(value)));
            }
            _ => self.store(reg, value),
        }

        Ok(value)
    }

    /// Current value of a register
    pub fn read(&self, reg: Register) -> u32 {
        self.regs[reg.index()]
    }

    /// Drive the switch inputs
    pub fn set_switches(&mut self, value: u32) {
        self.store(Register::Switches, value);
    }

    /// Drive the sensor with a temperature (C) and relative humidity (%).
    pub fn set_sensor(&mut self, temp_c: f32, humid_pct: f32) {
        let temp_raw = encode_temperature(temp_c);
        let humid_raw = encode_humidity(humid_pct);
        trace!(temp_c, humid_pct, temp_raw, humid_raw, "sensor update");

        self.store(Register::Temperature, temp_raw);
        self.store(Register::Humidity, humid_raw);
    }

    /// Drive the sensor with uniformly random values from the given ranges.
    ///
    /// Nothing is stored when either range cannot be sampled.
    pub fn set_sensor_random(
        &mut self,
        temp_c: RangeInclusive<f32>,
        humid_pct: RangeInclusive<f32>,
    ) -> Result<(), SensorRangeError> {
        let temp = random_in_range(&mut self.rng, "temperature", *temp_c.start(), *temp_c.end())?;
        let humid = random_in_range(&mut self.rng, "humidity", *humid_pct.start(), *humid_pct.end())?;
        self.set_sensor(temp, humid);
        Ok(())
    }

    fn resolve(&self, base: IoBase, offset: u32) -> Result<Register, RegisterError> {
        if base != self.base {
            return Err(RegisterError::WrongBase);
        }
        if offset > MAX_OFFSET {
            return Err(RegisterError::OutOfRange { offset });
        }
        if offset % REG_WIDTH != 0 {
            return Err(RegisterError::Misaligned { offset });
        }
        Register::from_offset(offset).ok_or(RegisterError::UnknownRegister { offset })
    }

    fn store(&mut self, reg: Register, value: u32) {
        self.regs[reg.index()] = value;
    }
}

impl fmt::Debug for IoModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IoModule")
            .field("base", &self.base)
            .field("regs", &self.regs)
            .field("num_switches", &self.num_switches)
            .field("num_leds", &self.num_leds)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module() -> IoModule {
        IoModule::initialize(IoConfig::new(16, 16).with_seed(1)).unwrap()
    }

    #[test]
    fn test_reset_state() {
        let io = module();
        assert_eq!(io.read(Register::Switches), 0);
        assert_eq!(io.read(Register::Leds), 0);
        assert_eq!(io.read(Register::RgbLed), 0);
        assert_eq!(io.read(Register::Reserved1), 0x1111_1111);
        assert_eq!(io.read(Register::Reserved2), 0x2222_2222);
        assert_eq!(io.read(Register::Reserved3), 0x3333_3333);

        let temp = decode_temperature(io.read(Register::Temperature));
        let humid = decode_humidity(io.read(Register::Humidity));
        assert!((temp - RESET_TEMPERATURE).abs() < 0.01);
        assert!((humid - RESET_HUMIDITY).abs() < 0.01);
    }

    #[test]
    fn test_offsets_map_to_registers() {
        for (index, reg) in Register::ALL.into_iter().enumerate() {
            assert_eq!(reg.offset(), index as u32 * REG_WIDTH);
            assert_eq!(Register::from_offset(reg.offset()), Some(reg));
        }
        assert_eq!(Register::from_offset(2), None);
        assert_eq!(Register::from_offset(MAX_OFFSET + REG_WIDTH), None);
    }

    #[test]
    fn test_scratch_register_round_trip() {
        let mut io = module();
        let base = io.base();
        assert_eq!(io.write_reg(base, RSVD2_REG, 0xCAFE_F00D), Ok(0xCAFE_F00D));
        assert_eq!(io.read_reg(base, RSVD2_REG), Ok(0xCAFE_F00D));
    }

    #[test]
    fn test_read_only_writes_ignored() {
        let mut io = module();
        let base = io.base();
        io.set_switches(0x0000_00A5);
        let humid_before = io.read(Register::Humidity);

        assert_eq!(io.write_reg(base, SWITCHES_REG, 0xFFFF_FFFF), Ok(0xFFFF_FFFF));
        assert_eq!(io.write_reg(base, HUMID_REG, 0), Ok(0));
        assert_eq!(io.read_reg(base, SWITCHES_REG), Ok(0xA5));
        assert_eq!(io.read_reg(base, HUMID_REG), Ok(humid_before));
    }

    #[test]
    fn test_bases_are_per_module() {
        let io_a = module();
        let io_b = module();
        assert_ne!(io_a.base(), io_b.base());
        assert_eq!(io_a.read_reg(io_b.base(), LEDS_REG), Err(RegisterError::WrongBase));
    }

    #[test]
    fn test_setup_rejects_too_many_lines() {
        let err = IoModule::initialize(IoConfig::new(33, 0)).unwrap_err();
        assert_eq!(err.code(), 5);
        assert!(IoModule::initialize(IoConfig::new(32, 33)).is_err());
        assert!(IoModule::initialize(IoConfig::new(32, 32)).is_ok());
    }

    #[test]
    fn test_seeded_modules_agree() {
        let mut io_a = module();
        let mut io_b = module();
        for _ in 0..10 {
            io_a.set_sensor_random(42.0..=52.0, 72.6..=87.3).unwrap();
            io_b.set_sensor_random(42.0..=52.0, 72.6..=87.3).unwrap();
            assert_eq!(io_a.read(Register::Temperature), io_b.read(Register::Temperature));
            assert_eq!(io_a.read(Register::Humidity), io_b.read(Register::Humidity));
        }
    }

    #[test]
    fn test_bad_random_range_leaves_sensor_untouched() {
        let mut io = IoModule::initialize(IoConfig::default().with_seed(4)).unwrap();
        let before = (io.read(Register::Temperature), io.read(Register::Humidity));

        let err = io.set_sensor_random(42.0..=52.0, f32::NAN..=80.0).unwrap_err();
        assert_eq!(err.what, "humidity");
        let err = io.set_sensor_random(-3.0e38..=3.0e38, 0.0..=100.0).unwrap_err();
        assert_eq!(err.what, "temperature");

        assert_eq!((io.read(Register::Temperature), io.read(Register::Humidity)), before);
    }
}
