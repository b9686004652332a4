//! Configuration persistence.
//!
//! [`ConfigStore`] implements [`ConfigPort`] on top of any byte-addressed
//! [`PersistencePort`] medium using the fixed [`record`] layout. The store
//! only guarantees integrity; range checks on user input happen before a
//! configuration is applied (see [`MachineConfig::validate`]).

pub mod crc;
pub mod record;

use log::{debug, warn};

use crate::app::ports::{ConfigPort, PersistencePort};
use crate::config::MachineConfig;
use crate::error::ConfigError;
use record::{RECORD_LEN, RECORD_OFFSET};

/// Integrity-checked configuration record on a persistence medium.
pub struct ConfigStore<M> {
    medium: M,
}

impl<M: PersistencePort> ConfigStore<M> {
    pub fn new(medium: M) -> Self {
        Self { medium }
    }

    pub fn medium(&self) -> &M {
        &self.medium
    }

    pub fn medium_mut(&mut self) -> &mut M {
        &mut self.medium
    }

    pub fn into_inner(self) -> M {
        self.medium
    }
}

impl<M: PersistencePort> ConfigPort for ConfigStore<M> {
    fn load(&self) -> Result<MachineConfig, ConfigError> {
        let mut buf = [0u8; RECORD_LEN];
        self.medium.read(RECORD_OFFSET, &mut buf)?;
        match record::decode(&buf) {
            Ok(cfg) => {
                debug!("ConfigStore: record verified ({} bytes)", RECORD_LEN);
                Ok(cfg)
            }
            Err(e) => {
                warn!("ConfigStore: stored record rejected: {e}");
                Err(e)
            }
        }
    }

    fn save(&mut self, config: &MachineConfig) -> Result<(), ConfigError> {
        let bytes = record::encode(config);
        // Single write: checksum and payload land together.
        self.medium.write(RECORD_OFFSET, &bytes)?;
        debug!("ConfigStore: record written ({} bytes)", RECORD_LEN);
        Ok(())
    }
}
