pub(crate) const DEFAULT_ADDR: u8 = 0x48;

pub(crate) const TEMP: u8 = 0x00;
pub(crate) const HIGH_LIMIT: u8 = 0x02;
pub(crate) const LOW_LIMIT: u8 = 0x03;
pub(crate) const DEVICE_ID: u8 = 0x0F;

// bits 11:0 of DEVICE_ID, bits 15:12 are the revision
pub(crate) const DEVICE_ID_MASK: u16 = 0x0FFF;
pub(crate) const DEVICE_ID_VALUE: u16 = 0x0116;

/// Time the sensor needs between a pointer write and a result read
pub(crate) const READ_SETTLE_MS: u32 = 10;
