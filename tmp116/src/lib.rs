//! Driver for the TI TMP116 I2C temperature sensor.
//!
//! Covers the temperature result, the high/low alarm limits and the device ID.
//! Every call is a single bus transaction through the `embedded-hal` [`I2c`]
//! handed to the driver; bus errors come back exactly as the bus reported them.
#![cfg_attr(not(test), no_std)]

mod reg_map;

use embedded_hal::{delay::DelayNs, i2c::{I2c, SevenBitAddress}};

/// Celsius per LSB of a temperature-bearing register
pub const LSB_CELSIUS: f64 = 0.0078125;

#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// I2C bus error
    I2c(E),
    /// Device ID does not belong to a TMP116
    InvalidDeviceId(u16),
}

/// ADD0 strap options
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Address {
    #[default]
    Gnd,
    Vplus,
    Sda,
    Scl,
}

impl From<Address> for u8 {
    fn from(pin: Address) -> Self {
        match pin {
            Address::Gnd => reg_map::DEFAULT_ADDR,
            Address::Vplus => 0x49,
            Address::Sda => 0x4A,
            Address::Scl => 0x4B,
        }
    }
}

/// Sign-extends a register word and scales it to Celsius.
pub fn raw_to_celsius(raw: u16) -> f64 {
    raw as i16 as f64 * LSB_CELSIUS
}

/// Scales Celsius to a register word, truncating toward zero.
///
/// Values outside the `i16` range saturate and NaN maps to `0`.
pub fn celsius_to_raw(celsius: f64) -> u16 {
    (celsius / LSB_CELSIUS) as i16 as u16
}

#[derive(Debug)]
pub struct Tmp116<I, D> {
    i2c: I,
    delay: D,
    i2c_addr: u8,
}

impl<I, D, E> Tmp116<I, D>
where
    I: I2c<SevenBitAddress, Error = E>,
    D: DelayNs,
{
    pub fn new(i2c: I, delay: D) -> Self {
        Self::with_address(i2c, delay, reg_map::DEFAULT_ADDR)
    }

    pub fn with_address(i2c: I, delay: D, i2c_addr: u8) -> Self {
        Self { i2c, delay, i2c_addr }
    }

    /// Used from the next bus operation on. Not range checked.
    pub fn set_address(&mut self, i2c_addr: u8) {
        self.i2c_addr = i2c_addr;
    }

    pub fn address(&self) -> u8 {
        self.i2c_addr
    }

    /// Gives back the bus and the delay provider
    pub fn release(self) -> (I, D) {
        (self.i2c, self.delay)
    }

    pub fn read_temperature(&mut self) -> Result<f64, E> {
        self.read_word(reg_map::TEMP, reg_map::READ_SETTLE_MS).map(raw_to_celsius)
    }

    /// Short name for [`Self::read_temperature`]
    pub fn read_t(&mut self) -> Result<f64, E> {
        self.read_temperature()
    }

    pub fn read_high_limit(&mut self) -> Result<f64, E> {
        self.read_word(reg_map::HIGH_LIMIT, reg_map::READ_SETTLE_MS).map(raw_to_celsius)
    }

    pub fn read_low_limit(&mut self) -> Result<f64, E> {
        self.read_word(reg_map::LOW_LIMIT, reg_map::READ_SETTLE_MS).map(raw_to_celsius)
    }

    /// Writes the high alarm limit. See [`celsius_to_raw`] for the conversion.
    pub fn write_high_limit(&mut self, limit: f64) -> Result<(), E> {
        self.write_word(reg_map::HIGH_LIMIT, celsius_to_raw(limit))
    }

    /// Writes the low alarm limit. See [`celsius_to_raw`] for the conversion.
    pub fn write_low_limit(&mut self, limit: f64) -> Result<(), E> {
        self.write_word(reg_map::LOW_LIMIT, celsius_to_raw(limit))
    }

    pub fn read_device_id(&mut self) -> Result<u16, E> {
        self.read_word(reg_map::DEVICE_ID, 0)
    }

    /// Reads the device ID and checks that a TMP116 answered.
    ///
    /// Returns the full ID, revision bits included.
    pub fn probe(&mut self) -> Result<u16, Error<E>> {
        let id = self.read_device_id().map_err(Error::I2c)?;

        if id & reg_map::DEVICE_ID_MASK != reg_map::DEVICE_ID_VALUE {
            Err(Error::InvalidDeviceId(id))
        }
        else {
            Ok(id)
        }
    }

    /// Points at the register, waits `settle_ms`, then reads the big-endian word
    fn read_word(&mut self, reg: u8, settle_ms: u32) -> Result<u16, E> {
        self.i2c.write(self.i2c_addr, &[reg])?;
        if settle_ms > 0 {
            self.delay.delay_ms(settle_ms);
        }

        let mut bytes = [0; 2];
        self.i2c.read(self.i2c_addr, &mut bytes)?;
        let word = u16::from_be_bytes(bytes);

        #[cfg(feature = "defmt")]
        defmt::trace!("tmp116 {=u8:#x}: read reg {=u8:#x} -> {=u16:#x}", self.i2c_addr, reg, word);

        Ok(word)
    }

    /// Writes the word to the register, MSB first
    fn write_word(&mut self, reg: u8, word: u16) -> Result<(), E> {
        let [msb, lsb] = word.to_be_bytes();

        #[cfg(feature = "defmt")]
        defmt::trace!("tmp116 {=u8:#x}: write reg {=u8:#x} <- {=u16:#x}", self.i2c_addr, reg, word);

        self.i2c.write(self.i2c_addr, &[reg, msb, lsb])
    }
}
