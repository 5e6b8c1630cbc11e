//! CAN bus plugin: the context object tying the relay, the baud controller and
//! the settings store together, plus its registration with the host.
//!
//! Initialisation either yields a running [`Canbus`] or leaves the feature
//! disabled with a one-shot warning queued on the host's deferred-command
//! queue. No global state: firmware owns the context (usually inside its hook
//! chain, see [`hooks`]) and the queues it drains.
pub mod hooks;

use core::fmt;
use core::future::Future;

use embassy_time::Instant;
use futures_util::future::{select, Either};
use futures_util::pin_mut;

use crate::core::{CANBUS_BUFFER_LEN, POLL_INTERVAL_MS};
use crate::error::{InitError, SettingError, StartError, StorageError};
use crate::infra::traits::host::{
    DeferredQueue, HostMessage, MessageKind, SettingsRegistry,
};
use crate::infra::traits::relay_timer::RelayTimer;
use crate::infra::traits::settings_store::SettingsStore;
use crate::infra::traits::transceiver::Transceiver;
use crate::protocol::baud::{BaudChange, BaudController, BaudIndex, BaudRate};
use crate::protocol::queue::Drains;
use crate::protocol::relay::{LogRxHandler, PollOutcome, Relay, RxChain, RxHandler};
use crate::protocol::settings::{
    self, validate, CanbusSettings, LoadOutcome, CANBUS_BAUD_RATE_SETTING,
    CANBUS_SETTING_DETAILS, SETTINGS_BLOB_LEN,
};
use hooks::HostHooks;

macro_rules! plugin_version {
    () => {
        "0.01"
    };
}

pub const PLUGIN_VERSION: &str = plugin_version!();

/// Identification line appended to the option report.
pub const PLUGIN_ID: &str = concat!("[PLUGIN:CANBUS v", plugin_version!(), "]");

/// Line terminator of the host report stream.
pub const REPORT_EOL: &str = "\r\n";

/// Text of the warning queued when initialisation fails.
pub const INIT_FAILED_MESSAGE: &str = "CAN bus plugin failed to initialise!";

/// Deferred command queued when the plugin cannot initialise.
pub fn init_failed_warning() -> HostMessage {
    HostMessage {
        kind: MessageKind::Warning,
        text: INIT_FAILED_MESSAGE,
    }
}

/// What [`Canbus::settings_load`] did: where the settings came from and how
/// the transceiver restart went.
#[derive(Debug)]
pub struct Reload<E: fmt::Debug> {
    pub outcome: LoadOutcome,
    pub started: Result<(), StartError<E>>,
}

/// Running CAN bus plugin.
pub struct Canbus<
    'a,
    D: Transceiver,
    S: SettingsStore,
    H = LogRxHandler,
    const N: usize = CANBUS_BUFFER_LEN,
> {
    link: BaudController<D>,
    store: S,
    relay: Relay<'a, H, N>,
}

impl<'a, D, S, H, const N: usize> Canbus<'a, D, S, H, N>
where
    D: Transceiver,
    S: SettingsStore,
    H: RxHandler,
{
    /// Reserve settings storage, register the settings descriptor, load the
    /// settings and start the transceiver.
    ///
    /// If storage cannot be reserved, [`init_failed_warning`] is queued on
    /// `deferred`, nothing is registered and the plugin stays disabled.
    pub fn init<R, Q>(
        driver: D,
        mut store: S,
        drains: Drains<'a, N>,
        rx_handler: H,
        registry: &mut R,
        deferred: &Q,
    ) -> Result<Self, InitError>
    where
        R: SettingsRegistry + ?Sized,
        Q: DeferredQueue + ?Sized,
    {
        #[cfg(feature = "defmt")]
        defmt::info!("canbus init");

        if store.reserve(SETTINGS_BLOB_LEN).is_err() {
            if !deferred.enqueue(init_failed_warning) {
                #[cfg(feature = "defmt")]
                defmt::error!("deferred queue full, init warning lost");
            }
            return Err(InitError::StorageUnavailable);
        }

        registry.register(&CANBUS_SETTING_DETAILS);

        let mut canbus = Self {
            link: BaudController::new(driver, CanbusSettings::default()),
            store,
            relay: Relay::new(drains, rx_handler),
        };
        if canbus.settings_load().started.is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("canbus installed with the transceiver stopped");
        }
        Ok(canbus)
    }

    //==================================================================================State
    /// Whether the transceiver is running.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.link.is_enabled()
    }

    #[inline]
    pub fn baud_rate(&self) -> BaudRate {
        self.link.baud_rate()
    }

    #[inline]
    pub fn settings(&self) -> &CanbusSettings {
        self.link.settings()
    }

    pub fn driver(&self) -> &D {
        self.link.driver()
    }

    pub fn driver_mut(&mut self) -> &mut D {
        self.link.driver_mut()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn relay(&self) -> &Relay<'a, H, N> {
        &self.relay
    }

    pub fn rx_handler_mut(&mut self) -> &mut H {
        self.relay.rx_handler_mut()
    }

    /// Put `handler` in front of the inbound handler chain.
    pub fn chain_rx_handler<G: RxHandler>(self, handler: G) -> Canbus<'a, D, S, RxChain<G, H>, N> {
        Canbus {
            link: self.link,
            store: self.store,
            relay: self.relay.chain_rx_handler(handler),
        }
    }

    //==================================================================================Polling
    /// Run one drain/dispatch pass.
    pub fn poll(&mut self, now: Instant) -> PollOutcome {
        self.relay.poll(self.link.driver_mut(), now)
    }

    /// Poll forever, once per [`POLL_INTERVAL_MS`], for firmware that runs the
    /// relay as an executor task rather than from a host tick hook.
    pub async fn drive<T: RelayTimer>(&mut self, timer: &mut T) {
        loop {
            let now = timer.now();
            self.poll(now);
            timer.delay_ms(POLL_INTERVAL_MS).await;
        }
    }

    /// Like [`drive`](Self::drive), but returns as soon as `stop` completes,
    /// e.g. when firmware tears the bus down for reconfiguration.
    pub async fn drive_until<T: RelayTimer, F: Future>(&mut self, timer: &mut T, stop: F) -> F::Output {
        pin_mut!(stop);
        loop {
            let now = timer.now();
            self.poll(now);

            let delay = timer.delay_ms(POLL_INTERVAL_MS);
            pin_mut!(delay);
            match select(delay, stop.as_mut()).await {
                Either::Left(((), _)) => {}
                Either::Right((output, pending_delay)) => {
                    drop(pending_delay);
                    #[cfg(feature = "defmt")]
                    defmt::info!("canbus relay task stopped");
                    return output;
                }
            }
        }
    }

    //==================================================================================Report
    /// Append the plugin identification to the full option report.
    pub fn report_options(&self, newopt: bool, out: &mut dyn fmt::Write) -> fmt::Result {
        if !newopt {
            out.write_str(PLUGIN_ID)?;
            out.write_str(REPORT_EOL)?;
        }
        Ok(())
    }

    //==================================================================================Settings
    /// Load the persisted settings (restoring defaults if needed) and start the
    /// transceiver at the loaded rate.
    pub fn settings_load(&mut self) -> Reload<D::Error> {
        let (loaded, outcome) = settings::load(&mut self.store);
        self.link.replace_settings(loaded);
        let started = self.link.start();
        Reload { outcome, started }
    }

    /// Persist the running settings.
    pub fn settings_save(&mut self) -> Result<(), StorageError> {
        settings::save(&mut self.store, self.link.settings())
    }

    /// Reset the running settings to the defaults and persist them. The
    /// transceiver keeps its current rate until the next restart.
    pub fn settings_restore(&mut self) -> Result<(), StorageError> {
        let (defaults, written) = settings::restore(&mut self.store);
        self.link.replace_settings(defaults);
        written
    }

    /// Current choice index of setting `id`.
    pub fn setting_get(&self, id: u16) -> Result<BaudIndex, SettingError> {
        if id != CANBUS_BAUD_RATE_SETTING {
            return Err(SettingError::UnknownSetting { id });
        }
        Ok(BaudRate::lookup(self.link.baud_rate().bps()))
    }

    /// Apply choice `value` to setting `id`, restarting the transceiver.
    pub fn setting_set(&mut self, id: u16, value: u16) -> Result<BaudChange<D::Error>, SettingError> {
        let rate = validate(id, value)?;
        Ok(self.link.set(rate))
    }

    /// Check choice `value` for setting `id` without applying it.
    pub fn setting_validate(&self, id: u16, value: u16) -> Result<(), SettingError> {
        validate(id, value).map(|_| ())
    }
}

impl<'a, D, S, H, const N: usize> HostHooks for Canbus<'a, D, S, H, N>
where
    D: Transceiver,
    S: SettingsStore,
    H: RxHandler,
{
    fn on_execute_realtime(&mut self, now: Instant) {
        self.poll(now);
    }

    fn on_report_options(&mut self, newopt: bool, out: &mut dyn fmt::Write) -> fmt::Result {
        self.report_options(newopt, out)
    }
}
