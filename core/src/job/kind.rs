use std::fmt;
use std::path::PathBuf;

use crate::config::PlaybooksConfig;

/// Job subtypes the agent knows a playbook for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobSubType {
    MacPatch,
    LinuxPatch,
    WindowsPatch,
    InstallLinuxEdr,
    InstallMacEdr,
    WinEdrInstall,
}

impl JobSubType {
    pub const ALL: [JobSubType; 6] = [
        Self::MacPatch,
        Self::LinuxPatch,
        Self::WindowsPatch,
        Self::InstallLinuxEdr,
        Self::InstallMacEdr,
        Self::WinEdrInstall,
    ];

    /// Case-insensitive match against the portal's subtype names.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MAC_PATCH" => Some(Self::MacPatch),
            "LINUX_PATCH" => Some(Self::LinuxPatch),
            "WINDOWS_PATCH" => Some(Self::WindowsPatch),
            "INSTALL_LINUX_EDR" => Some(Self::InstallLinuxEdr),
            "INSTALL_MAC_EDR" => Some(Self::InstallMacEdr),
            "WIN_EDR_INSTALL" => Some(Self::WinEdrInstall),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MacPatch => "MAC_PATCH",
            Self::LinuxPatch => "LINUX_PATCH",
            Self::WindowsPatch => "WINDOWS_PATCH",
            Self::InstallLinuxEdr => "INSTALL_LINUX_EDR",
            Self::InstallMacEdr => "INSTALL_MAC_EDR",
            Self::WinEdrInstall => "WIN_EDR_INSTALL",
        }
    }

    fn playbook_entry(self, cfg: &PlaybooksConfig) -> &str {
        match self {
            Self::MacPatch => &cfg.mac_updates,
            Self::LinuxPatch => &cfg.linux_updates,
            Self::WindowsPatch => &cfg.windows_updates,
            Self::InstallLinuxEdr => &cfg.linux_edr_install,
            Self::InstallMacEdr => &cfg.mac_edr_install,
            Self::WinEdrInstall => &cfg.win_edr_install,
        }
    }
}

impl fmt::Display for JobSubType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Playbook path for a job, or `None` when the subtype is unknown or has no
/// configured playbook.
///
/// The job type is accepted for logging symmetry; the lookup table is keyed on
/// the subtype alone.
pub fn resolve_playbook(cfg: &PlaybooksConfig, job_type: &str, job_sub_type: &str) -> Option<PathBuf> {
    let Some(sub) = JobSubType::parse(job_sub_type) else {
        tracing::warn!(
            target: "fleetrun.job",
            job_type = %job_type,
            job_sub_type = %job_sub_type,
            "unknown job subtype"
        );
        return None;
    };
    let entry = sub.playbook_entry(cfg).trim();
    if entry.is_empty() {
        tracing::warn!(target: "fleetrun.job", job_sub_type = %sub, "no playbook configured");
        return None;
    }
    Some(PathBuf::from(&cfg.dir).join(entry))
}
