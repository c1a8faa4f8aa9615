use thiserror::Error;

use sampler_config::GpioPin;
use sampler_core::BagId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HardwareError {
    #[error("bag {0} is not mapped to a valve pin")]
    UnknownBag(BagId),

    #[error("GPIO write failed on pin {pin}: {message}")]
    Driver { pin: GpioPin, message: String },
}

pub type HardwareResult<T> = Result<T, HardwareError>;
