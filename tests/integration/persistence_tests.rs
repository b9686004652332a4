//! Integration tests: settings saved through the service survive a restart
//! on the same EEPROM image, and damaged images fall back to defaults.

use crate::mock_hw::{MockHardware, RecordingSink};

use espresso_core::adapters::display::HeadlessDisplay;
use espresso_core::adapters::eeprom::EepromImage;
use espresso_core::app::commands::AppCommand;
use espresso_core::app::events::AppEvent;
use espresso_core::app::ports::{DisplayPort, Page};
use espresso_core::app::service::MachineService;
use espresso_core::config::{ConfigSource, MachineConfig, PreinfusionConfig};
use espresso_core::error::{ConfigError, StorageError};
use espresso_core::persistence::ConfigStore;
use espresso_core::persistence::record::{self, RECORD_LEN, RECORD_OFFSET};

fn boot(store: &ConfigStore<EepromImage>) -> (MachineService, HeadlessDisplay, RecordingSink) {
    let mut service = MachineService::with_default_controllers();
    let mut hw = MockHardware::new(25.0);
    let mut display = HeadlessDisplay::new();
    let mut sink = RecordingSink::new();
    service.start(store, &mut hw, &mut display, &mut sink);
    (service, display, sink)
}

fn custom() -> MachineConfig {
    MachineConfig {
        target_brew_temp_c: 96,
        target_steam_temp_c: 145,
        preinfusion: PreinfusionConfig {
            duration_secs: 7,
            soak_secs: 4,
            preinfusion_bar: 2.5,
            brewing_bar: 8.5,
        },
        ..MachineConfig::default()
    }
}

fn apply_and_cycle(
    service: &mut MachineService,
    display: &mut HeadlessDisplay,
    store: &mut ConfigStore<EepromImage>,
    sink: &mut RecordingSink,
    settings: &MachineConfig,
) {
    let mut hw = MockHardware::new(25.0);
    display.edit_settings(settings);
    display.request(AppCommand::ApplySettings);
    assert!(service.poll(101, &mut hw, display, store, sink));
}

#[test]
fn saved_settings_survive_restart() {
    let mut store = ConfigStore::new(EepromImage::new(512));
    let (mut service, mut display, mut sink) = boot(&store);
    assert!(service.config_source().is_defaults());

    apply_and_cycle(&mut service, &mut display, &mut store, &mut sink, &custom());
    assert!(sink.events.contains(&AppEvent::SettingsSaved));
    assert_eq!(store.medium().write_count(), 1);

    // Power cycle: new service, same image.
    let (rebooted, display, _) = boot(&store);
    assert_eq!(rebooted.config_source(), ConfigSource::Stored);
    assert_eq!(*rebooted.config(), custom().with_fixed_sample_time());
    assert_eq!(display.preinfusion_params(), custom().preinfusion);
    assert_eq!(display.target_steam_temperature(), 145);
}

#[test]
fn corrupted_record_falls_back_to_defaults() {
    let mut store = ConfigStore::new(EepromImage::new(512));
    let (mut service, mut display, mut sink) = boot(&store);
    apply_and_cycle(&mut service, &mut display, &mut store, &mut sink, &custom());

    store.medium_mut().corrupt(RECORD_OFFSET + 6, 0x10);

    let (rebooted, display, sink) = boot(&store);
    assert_eq!(*rebooted.config(), MachineConfig::default());
    assert!(matches!(
        rebooted.config_source(),
        ConfigSource::Defaults {
            reason: ConfigError::Corrupted { .. }
        }
    ));
    assert_eq!(display.target_temperature(), 93);
    assert!(matches!(
        sink.events.first(),
        Some(AppEvent::Started {
            config_source: ConfigSource::Defaults { .. }
        })
    ));
}

#[test]
fn image_too_small_for_record_is_a_storage_error() {
    let store = ConfigStore::new(EepromImage::new(16));
    let (service, _, _) = boot(&store);
    assert!(matches!(
        service.config_source(),
        ConfigSource::Defaults {
            reason: ConfigError::Storage(StorageError::OutOfBounds { .. })
        }
    ));
}

#[test]
fn write_protected_medium_keeps_previous_record() {
    let mut store = ConfigStore::new(EepromImage::new(512));
    let (mut service, mut display, mut sink) = boot(&store);
    apply_and_cycle(&mut service, &mut display, &mut store, &mut sink, &custom());
    let before = store.medium().as_bytes().to_vec();

    store.medium_mut().set_write_protect(true);
    let warmer = MachineConfig {
        target_brew_temp_c: 98,
        ..custom()
    };
    sink.clear();
    let mut hw = MockHardware::new(25.0);
    display.edit_settings(&warmer);
    display.request(AppCommand::ApplySettings);
    assert!(service.poll(202, &mut hw, &mut display, &mut store, &mut sink));

    assert_eq!(service.config().target_brew_temp_c, 98);
    assert!(
        sink.events
            .iter()
            .any(|e| matches!(e, AppEvent::SaveFailed(ConfigError::Storage(_))))
    );
    assert_eq!(store.medium().as_bytes(), before.as_slice());

    let (rebooted, _, _) = boot(&store);
    assert_eq!(rebooted.config().target_brew_temp_c, 96);
}

#[test]
fn checksummed_record_with_out_of_range_values_is_not_used() {
    let hostile = MachineConfig {
        target_brew_temp_c: 4_000_000_000,
        preinfusion: PreinfusionConfig {
            preinfusion_bar: f32::NAN,
            ..PreinfusionConfig::default()
        },
        ..MachineConfig::default()
    };
    let mut cells = vec![0xFF; 512];
    cells[RECORD_OFFSET..RECORD_OFFSET + RECORD_LEN]
        .copy_from_slice(&record::encode(&hostile));
    let mut store = ConfigStore::new(EepromImage::from_bytes(cells));

    let (mut service, mut display, mut sink) = boot(&store);
    assert!(matches!(
        service.config_source(),
        ConfigSource::Defaults {
            reason: ConfigError::ValidationFailed(_)
        }
    ));
    assert_eq!(*service.config(), MachineConfig::default());
    assert_eq!(display.target_temperature(), 93);

    // One automatic shot cycle runs on the factory profile.
    let mut hw = MockHardware::new(25.0);
    hw.brew.on = true;
    display.set_page(Page::BrewingAuto);
    assert!(service.poll(101, &mut hw, &mut display, &mut store, &mut sink));
    assert_eq!(hw.last_pump_bar(), Some(2.0));
    assert_eq!(service.runtime_state().target_temp_c, 93.0);
    assert_eq!(store.medium().write_count(), 0);
}
