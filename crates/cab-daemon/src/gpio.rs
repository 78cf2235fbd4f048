//! Spin button on a Raspberry Pi GPIO line
//!
//! Active-low: the button pulls the pin to ground when pressed.

use cab_core::InputLine;

use crate::config::InputConfig;
use crate::error::GpioError;

#[cfg(target_os = "linux")]
pub use rpi::GpioButtonLine;

/// Claim the configured button line
pub fn open_button_line(config: &InputConfig) -> Result<Box<dyn InputLine>, GpioError> {
    #[cfg(target_os = "linux")]
    {
        let line = GpioButtonLine::open(config.pin, config.pull_up)?;
        Ok(Box::new(line))
    }

    #[cfg(not(target_os = "linux"))]
    {
        Err(GpioError::Unavailable {
            pin: config.pin,
            reason: "GPIO access requires Linux".to_string(),
        })
    }
}

#[cfg(target_os = "linux")]
mod rpi {
    use cab_core::{HardwareReadError, InputLine};
    use rppal::gpio::{Gpio, InputPin, Level};

    use crate::error::GpioError;

    /// BCM input pin, released back to its prior mode on drop
    pub struct GpioButtonLine {
        number: u8,
        pin: Option<InputPin>,
    }

    impl GpioButtonLine {
        pub fn open(number: u8, pull_up: bool) -> Result<Self, GpioError> {
            let unavailable = |e: rppal::gpio::Error| GpioError::Unavailable {
                pin: number,
                reason: e.to_string(),
            };

            let pin = Gpio::new().map_err(unavailable)?.get(number).map_err(unavailable)?;
            let pin = if pull_up {
                pin.into_input_pullup()
            } else {
                pin.into_input()
            };

            log::info!(
                "[Input] GPIO {} claimed as input{}",
                number,
                if pull_up { " (pull-up)" } else { "" }
            );
            Ok(Self {
                number,
                pin: Some(pin),
            })
        }
    }

    impl InputLine for GpioButtonLine {
        fn pin(&self) -> u8 {
            self.number
        }

        fn read_pressed(&mut self) -> Result<bool, HardwareReadError> {
            match &self.pin {
                Some(pin) => Ok(pin.read() == Level::Low),
                None => Err(HardwareReadError::new(self.number, "line already released")),
            }
        }

        fn release(&mut self) {
            if self.pin.take().is_some() {
                log::info!("[Input] GPIO {} released", self.number);
            }
        }
    }
}
