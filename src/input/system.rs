//! Input system state and operations
//!
//! Owns the device table, every command, the live list ticked by
//! [`InputSystem::update`] and the focus mask.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use super::binding::{flags, Binding};
use super::command::{Command, CommandHandler};
use super::device::InputDevice;
use super::focus::FocusMask;
use super::registry::{DeviceHandle, DeviceRegistry, MAX_DEVICES};
use crate::config::InputConfig;

/// Identifies a command created by [`InputSystem::command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(usize);

impl CommandId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "command {}", self.0)
    }
}

/// Error type for input system operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("device registry is full ({} slots)", MAX_DEVICES)]
    RegistryFull,

    #[error("unknown {0}")]
    UnknownCommand(CommandId),

    #[error("binding slots of '{name}' are not contiguous (occupancy {occupancy:03b})")]
    MalformedBinding { name: String, occupancy: u8 },

    #[error("tap interval {0} out of range (0 to 63)")]
    InvalidTapInterval(u32),
}

/// Result type for input system operations
pub type Result<T> = std::result::Result<T, InputError>;

/// Polling engine context.
#[derive(Debug, Default)]
pub struct InputSystem {
    devices: DeviceRegistry,
    commands: Vec<Command>,
    live: Vec<CommandId>,
    focus: FocusMask,
    config: InputConfig,
}

impl InputSystem {
    /// Create a system with default settings
    pub fn new() -> Self {
        Self::with_config(InputConfig::default())
    }

    pub fn with_config(config: InputConfig) -> Self {
        Self {
            devices: DeviceRegistry::new(),
            commands: Vec::new(),
            live: Vec::new(),
            focus: config.focused,
            config,
        }
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    // === Devices ===

    pub fn devices(&self) -> &DeviceRegistry {
        &self.devices
    }

    /// Register a device, or return its existing handle
    pub fn register<D: InputDevice + 'static>(&mut self, device: &Arc<D>) -> Option<DeviceHandle> {
        let device: Arc<dyn InputDevice> = Arc::clone(device) as Arc<dyn InputDevice>;
        self.register_dyn(&device)
    }

    /// Register an already type-erased device
    pub fn register_dyn(&mut self, device: &Arc<dyn InputDevice>) -> Option<DeviceHandle> {
        if let Some(handle) = self.devices.handle_of(device) {
            return Some(handle);
        }
        match self.devices.register(device) {
            Some(handle) => {
                log::debug!("Registered {} as device {}", device.name(), handle);
                Some(handle)
            }
            None => {
                log::warn!("Cannot register {}: all {} device slots in use", device.name(), MAX_DEVICES);
                None
            }
        }
    }

    /// Free a device slot and release every binding that points at it
    pub fn deregister(&mut self, handle: DeviceHandle) -> bool {
        let Some(device) = self.devices.deregister(handle) else {
            return false;
        };

        let mut released = 0;
        for cmd in &mut self.commands {
            if cmd.keys_mut().release_device(handle) {
                released += 1;
            }
        }
        log::debug!(
            "Deregistered {} from device {} ({} commands unbound)",
            device.name(),
            handle,
            released
        );
        true
    }

    /// Deregister by instance
    pub fn deregister_device<D: InputDevice + 'static>(&mut self, device: &Arc<D>) -> bool {
        let device: Arc<dyn InputDevice> = Arc::clone(device) as Arc<dyn InputDevice>;
        match self.devices.handle_of(&device) {
            Some(handle) => self.deregister(handle),
            None => false,
        }
    }

    pub fn device(&self, handle: DeviceHandle) -> Option<&Arc<dyn InputDevice>> {
        self.devices.get(handle)
    }

    // === Commands ===

    /// Create a command. It is not ticked until its first binding.
    pub fn command(
        &mut self,
        name: impl Into<String>,
        handler: impl CommandHandler + 'static,
    ) -> CommandId {
        let mut cmd = Command::new(name, handler);
        if let Some(ticks) = self.config.tap_ticks() {
            if !cmd.set_tap_interval(ticks) {
                log::warn!("{}: configured tap time exceeds the history window", cmd.name());
            }
        }
        let id = CommandId(self.commands.len());
        self.commands.push(cmd);
        id
    }

    pub fn command_ref(&self, id: CommandId) -> Option<&Command> {
        self.commands.get(id.0)
    }

    pub fn command_mut(&mut self, id: CommandId) -> Option<&mut Command> {
        self.commands.get_mut(id.0)
    }

    /// First command named `name`
    pub fn find(&self, name: &str) -> Option<CommandId> {
        self.commands
            .iter()
            .position(|cmd| cmd.name() == name)
            .map(CommandId)
    }

    /// Commands ticked by `update`, in the order they were first bound
    pub fn live_commands(&self) -> &[CommandId] {
        &self.live
    }

    /// Bind with the default flags
    pub fn bind<D: InputDevice + 'static>(&mut self, id: CommandId, device: &Arc<D>, key: u16) -> bool {
        self.try_bind(id, device, key, flags::DEFAULT).is_ok()
    }

    pub fn bind_with_flags<D: InputDevice + 'static>(
        &mut self,
        id: CommandId,
        device: &Arc<D>,
        key: u16,
        flags: u64,
    ) -> bool {
        self.try_bind(id, device, key, flags).is_ok()
    }

    /// Bind `key` on `device` to a command.
    ///
    /// Registers the device if needed. When all three slots are taken the
    /// oldest binding is evicted. `flags` are OR-ed into the binding word.
    pub fn try_bind<D: InputDevice + 'static>(
        &mut self,
        id: CommandId,
        device: &Arc<D>,
        key: u16,
        flags: u64,
    ) -> Result<DeviceHandle> {
        if id.0 >= self.commands.len() {
            return Err(InputError::UnknownCommand(id));
        }
        let handle = self.register(device).ok_or(InputError::RegistryFull)?;

        let cmd = &mut self.commands[id.0];
        if !cmd.keys_mut().push(Binding::new(handle, key)) {
            let occupancy = cmd.keys().occupancy();
            log::warn!("{}: malformed binding slots {:03b}", cmd.name(), occupancy);
            return Err(InputError::MalformedBinding {
                name: cmd.name().to_string(),
                occupancy,
            });
        }
        cmd.keys_mut().insert_flags(flags);

        if !cmd.is_listed() {
            cmd.set_listed(true);
            self.live.push(id);
        }
        log::debug!("Bound {} to {}:{}", cmd.name(), handle, key);
        Ok(handle)
    }

    /// Set a command's double-tap window exponent
    pub fn set_tap_interval(&mut self, id: CommandId, ticks: u32) -> Result<()> {
        let cmd = self
            .commands
            .get_mut(id.0)
            .ok_or(InputError::UnknownCommand(id))?;
        if cmd.set_tap_interval(ticks) {
            Ok(())
        } else {
            Err(InputError::InvalidTapInterval(ticks))
        }
    }

    /// Reset a command's history and bindings; it stays live
    pub fn clear(&mut self, id: CommandId) -> bool {
        match self.commands.get_mut(id.0) {
            Some(cmd) => {
                cmd.clear();
                log::debug!("Cleared {}", cmd.name());
                true
            }
            None => false,
        }
    }

    /// Stop ticking a command. Bindings are kept; a later bind relists it.
    pub fn remove(&mut self, id: CommandId) -> bool {
        let Some(cmd) = self.commands.get_mut(id.0) else {
            return false;
        };
        if !cmd.is_listed() {
            return false;
        }
        cmd.set_listed(false);
        self.live.retain(|live| *live != id);
        log::debug!("Removed {}", cmd.name());
        true
    }

    /// Advance every live command by one tick
    pub fn update(&mut self, delta: f32) {
        for id in &self.live {
            if let Some(cmd) = self.commands.get_mut(id.0) {
                cmd.execute(&self.devices, self.focus, delta);
            }
        }
    }

    // === Focus ===

    /// Deactivate the focus groups set in `mask`
    pub fn suspend(&mut self, mask: u8) {
        self.focus.suspend(mask);
    }

    /// Reactivate the focus groups set in `mask`
    pub fn resume(&mut self, mask: u8) {
        self.focus.resume(mask);
    }

    pub fn set_focused(&mut self, mask: u8) {
        self.focus.set(mask);
    }

    pub fn focused(&self) -> FocusMask {
        self.focus
    }
}
