// ─── Native Entry Rules ───
// Which archive entries land in the natives directory for a given arch.

use crate::core::platform::Arch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryDecision {
    Skip,
    Extract,
}

/// One row of an architecture's table: entries whose name contains
/// `marker` get `decision`.
#[derive(Debug, Clone, Copy)]
pub struct MarkerRule {
    pub marker: &'static str,
    pub decision: EntryDecision,
}

const fn rule(marker: &'static str, decision: EntryDecision) -> MarkerRule {
    MarkerRule { marker, decision }
}

const X64_RULES: &[MarkerRule] = &[
    rule("32", EntryDecision::Skip),
    rule("x86", EntryDecision::Skip),
];

// 32-bit markers win before the 64-bit exclusion is consulted.
const X86_RULES: &[MarkerRule] = &[
    rule("32", EntryDecision::Extract),
    rule("x86", EntryDecision::Extract),
    rule("64", EntryDecision::Skip),
];

const ARM64_RULES: &[MarkerRule] = &[];

/// Ordered marker table for one architecture. First matching row wins;
/// entries matching no row are extracted.
#[derive(Debug, Clone, Copy)]
pub struct NativeRules {
    arch: Arch,
    rules: &'static [MarkerRule],
}

impl NativeRules {
    pub fn for_arch(arch: Arch) -> Self {
        let rules = match arch {
            Arch::X64 => X64_RULES,
            Arch::X86 => X86_RULES,
            Arch::Arm64 => ARM64_RULES,
        };
        Self { arch, rules }
    }

    pub fn arch(&self) -> Arch {
        self.arch
    }

    pub fn rules(&self) -> &'static [MarkerRule] {
        self.rules
    }

    /// Decide what happens to the archive entry called `name`.
    pub fn decide(&self, name: &str) -> EntryDecision {
        if name.is_empty() || name.ends_with('/') || is_metadata(name) {
            return EntryDecision::Skip;
        }
        self.rules
            .iter()
            .find(|r| name.contains(r.marker))
            .map(|r| r.decision)
            .unwrap_or(EntryDecision::Extract)
    }
}

/// Jar manifests, signatures and checksum sidecars.
pub fn is_metadata(name: &str) -> bool {
    name.starts_with("META-INF/") || name.ends_with(".git") || name.ends_with(".sha1")
}

/// Basename of an archive entry; internal directories are discarded.
pub fn flattened_name(name: &str) -> Option<&str> {
    name.rsplit(['/', '\\']).find(|part| !part.is_empty())
}
