//! Inbound commands — requests the user interface sends to the control core.

/// Commands accepted by [`MachineService::handle_command`](super::service::MachineService::handle_command).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Copy the settings currently held by the display into the running
    /// configuration and persist them.
    ApplySettings,
}
