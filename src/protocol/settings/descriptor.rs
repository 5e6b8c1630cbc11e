//! Settings descriptor registered with the host: one group and one
//! radio-button setting for the bus speed.
use crate::error::SettingError;
use crate::protocol::baud::{BaudRate, BAUD_CHOICES};

/// Setting number reserved by the host for the CAN bus speed.
pub const CANBUS_BAUD_RATE_SETTING: u16 = 680;

/// Settings group identifiers known to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GroupId {
    Root,
    CanBus,
}

/// How the host renders and parses a setting value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingFormat {
    /// Value is a zero-based index into the comma-separated `choices`.
    RadioButtons,
}

#[derive(Debug)]
pub struct SettingGroup {
    pub parent: GroupId,
    pub id: GroupId,
    pub name: &'static str,
}

#[derive(Debug)]
pub struct SettingDetail {
    pub id: u16,
    pub group: GroupId,
    pub name: &'static str,
    pub format: SettingFormat,
    pub choices: &'static str,
}

/// Everything the plugin registers with the host settings table.
#[derive(Debug)]
pub struct SettingDetails {
    pub groups: &'static [SettingGroup],
    pub settings: &'static [SettingDetail],
}

impl SettingDetails {
    pub fn find(&self, id: u16) -> Option<&SettingDetail> {
        self.settings.iter().find(|detail| detail.id == id)
    }
}

pub static CANBUS_SETTING_DETAILS: SettingDetails = SettingDetails {
    groups: &[SettingGroup {
        parent: GroupId::Root,
        id: GroupId::CanBus,
        name: "CAN bus",
    }],
    settings: &[SettingDetail {
        id: CANBUS_BAUD_RATE_SETTING,
        group: GroupId::CanBus,
        name: "CAN bus baud rate",
        format: SettingFormat::RadioButtons,
        choices: BAUD_CHOICES,
    }],
};

/// Check a value for setting `id` without applying it.
pub fn validate(id: u16, value: u16) -> Result<BaudRate, SettingError> {
    if id != CANBUS_BAUD_RATE_SETTING {
        return Err(SettingError::UnknownSetting { id });
    }
    u8::try_from(value)
        .ok()
        .and_then(BaudRate::from_index)
        .ok_or(SettingError::InvalidValue { value })
}
