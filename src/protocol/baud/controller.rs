//! Owner of the transceiver and of the running configuration.
//!
//! A speed change is a synchronous stop-then-start. The requested speed is
//! recorded before the restart and kept even if the peripheral refuses to
//! start at it: the configuration reflects what the operator asked for, the
//! enabled flag reflects what the hardware did.
use crate::error::{SettingError, StartError};
use crate::infra::traits::transceiver::Transceiver;
use crate::protocol::baud::BaudRate;
use crate::protocol::settings::CanbusSettings;

/// Result of a speed change: the recorded rate and how the restart went.
#[derive(Debug)]
pub struct BaudChange<E: core::fmt::Debug> {
    pub rate: BaudRate,
    pub started: Result<(), StartError<E>>,
}

pub struct BaudController<D: Transceiver> {
    driver: D,
    settings: CanbusSettings,
    enabled: bool,
}

impl<D: Transceiver> BaudController<D> {
    /// Wrap `driver`. Nothing is started yet.
    pub fn new(driver: D, settings: CanbusSettings) -> Self {
        Self {
            driver,
            settings,
            enabled: false,
        }
    }

    /// Whether the last start attempt succeeded.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn baud_rate(&self) -> BaudRate {
        self.settings.baud_rate
    }

    #[inline]
    pub fn settings(&self) -> &CanbusSettings {
        &self.settings
    }

    /// Replace the running configuration without touching the peripheral.
    pub fn replace_settings(&mut self, settings: CanbusSettings) {
        self.settings = settings;
    }

    #[inline]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    #[inline]
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Start the peripheral at the configured rate and update the enabled flag.
    pub fn start(&mut self) -> Result<(), StartError<D::Error>> {
        let rate = self.settings.baud_rate;
        match self.driver.start(rate) {
            Ok(()) => {
                #[cfg(feature = "defmt")]
                defmt::info!("can peripheral started at {} baud", rate.bps());
                self.enabled = true;
                Ok(())
            }
            Err(err) => {
                #[cfg(feature = "defmt")]
                defmt::error!("ERROR starting can peripheral at {} baud!", rate.bps());
                self.enabled = false;
                Err(StartError::Driver(err))
            }
        }
    }

    pub fn stop(&mut self) {
        self.driver.stop();
    }

    /// Apply the choice `index` and restart the peripheral.
    ///
    /// Only an out-of-range index is an error; a failed restart is reported in
    /// [`BaudChange::started`] with the new rate already recorded.
    pub fn set_index(&mut self, index: u16) -> Result<BaudChange<D::Error>, SettingError> {
        let rate = u8::try_from(index)
            .ok()
            .and_then(BaudRate::from_index)
            .ok_or(SettingError::InvalidValue { value: index })?;
        Ok(self.set(rate))
    }

    /// Record `rate` and restart the peripheral.
    pub fn set(&mut self, rate: BaudRate) -> BaudChange<D::Error> {
        #[cfg(feature = "defmt")]
        defmt::info!("set baud rate {}, restarting CAN peripheral...", rate.bps());

        self.settings.baud_rate = rate;
        self.stop();
        let started = self.start();
        BaudChange { rate, started }
    }
}
