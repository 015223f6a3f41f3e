pub mod configure;
pub mod halt;

use crate::commands::halt::HaltSignal;
use log::error;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandSurface {
    Slash,
    ContextMenu,
    Message,
}

impl std::fmt::Display for CommandSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Slash => write!(f, "slash command"),
            Self::ContextMenu => write!(f, "context menu command"),
            Self::Message => write!(f, "message command"),
        }
    }
}

/// One link in a command's halt chain. Returns true when the signal was
/// handled; later handlers are then skipped.
#[async_trait::async_trait]
pub trait HaltHandler: Send + Sync {
    async fn handle(&self, signal: &HaltSignal) -> bool;
}

pub struct CommandSpec {
    pub name: String,
    pub surface: CommandSurface,
    pub description: String,
    pub cooldown: Option<Duration>,
    pub dm_permission: bool,
    pub required_member_permissions: Vec<String>,
    halt_handlers: Vec<Arc<dyn HaltHandler>>,
}

impl CommandSpec {
    pub fn new(name: impl Into<String>, surface: CommandSurface, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            surface,
            description: description.into(),
            cooldown: None,
            dm_permission: false,
            required_member_permissions: Vec::new(),
            halt_handlers: Vec::new(),
        }
    }

    pub fn cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = Some(cooldown);
        self
    }

    pub fn dm_permission(mut self, allowed: bool) -> Self {
        self.dm_permission = allowed;
        self
    }

    pub fn require_member_permission(mut self, permission: impl Into<String>) -> Self {
        self.required_member_permissions.push(permission.into());
        self
    }

    /// Command-defined handlers registered here run before the shared
    /// fallback; first to report handled wins.
    pub fn halt_handler(mut self, handler: Arc<dyn HaltHandler>) -> Self {
        self.halt_handlers.push(handler);
        self
    }
}

/// Closed table of commands, built once at startup. No runtime discovery.
pub struct CommandRegistry {
    commands: HashMap<String, CommandSpec>,
    fallback_installed: bool,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
            fallback_installed: false,
        }
    }

    pub fn register(&mut self, spec: CommandSpec) {
        self.commands.insert(spec.name.clone(), spec);
    }

    pub fn get(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.get(name)
    }

    pub fn commands(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.values()
    }

    /// Appends the shared fallback to every command's halt chain, after any
    /// command-defined handlers. Idempotent: reinstalling (e.g. after a
    /// module reload) never chains duplicate fallbacks.
    pub fn install_halt_fallback(&mut self, fallback: Arc<dyn HaltHandler>) {
        if self.fallback_installed {
            return;
        }
        for spec in self.commands.values_mut() {
            spec.halt_handlers.push(Arc::clone(&fallback));
        }
        self.fallback_installed = true;
    }

    /// Walks the halted command's handler chain, first-handled-wins. A signal
    /// that no handler claims is logged; there is no user-visible message to
    /// send at that point.
    pub async fn dispatch_halt(&self, signal: &HaltSignal) {
        let Some(spec) = self.commands.get(&signal.command) else {
            error!(
                "[CRITICAL HALT FAILURE] halt signal for unregistered command {}",
                signal.command
            );
            return;
        };

        for handler in &spec.halt_handlers {
            if handler.handle(signal).await {
                return;
            }
        }

        error!(
            "[CRITICAL HALT FAILURE] no handler claimed {:?} halt for {} {}",
            signal.reason, spec.surface, spec.name
        );
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
