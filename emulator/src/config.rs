/// How the disk command port reacts to a command left in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiskTrigger {
    /// A written command runs once, on the next cycle.
    #[default]
    Edge,
    /// A written command runs every cycle until another one (or `Reset`)
    /// replaces it.
    Level,
}

/// Whether `LOD` may read from the ROM region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RomLoadPolicy {
    #[default]
    Allow,
    Deny,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineConfig {
    pub disk_trigger: DiskTrigger,
    pub rom_loads: RomLoadPolicy,
    /// The disk `Reset` command also zeroes RAM.
    pub reset_clears_memory: bool,
}

impl Default for MachineConfig {
    fn default() -> Self {
        MachineConfig {
            disk_trigger: DiskTrigger::default(),
            rom_loads: RomLoadPolicy::default(),
            reset_clears_memory: true,
        }
    }
}
