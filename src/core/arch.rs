//! CPU architecture to FTL binary mapping.
//!
//! The table is evaluated top to bottom and the raw `uname -m` value is the
//! primary key; the linker identity only confirms the ABI of a row. A pair
//! that matches no row resolves to [`BinaryVariant::Unknown`].

use crate::profile::BinaryVariant;

struct ArchRule {
    raw_arch: &'static str,
    linker_contains: Option<&'static str>,
    variant: BinaryVariant,
    artifact: &'static str,
    message: &'static str,
}

const ARCH_TABLE: &[ArchRule] = &[
    ArchRule {
        raw_arch: "aarch64",
        linker_contains: Some("aarch64"),
        variant: BinaryVariant::Aarch64,
        artifact: "pihole-FTL-aarch64-linux-gnu",
        message: "Detected ARM-aarch64 architecture",
    },
    ArchRule {
        raw_arch: "armv6l",
        linker_contains: Some("armhf"),
        variant: BinaryVariant::ArmHfLow,
        artifact: "pihole-FTL-arm-linux-gnueabi",
        message: "Detected ARM-hf architecture (armv6 or lower)",
    },
    ArchRule {
        raw_arch: "armv7l",
        linker_contains: Some("armhf"),
        variant: BinaryVariant::ArmHfV7Plus,
        artifact: "pihole-FTL-arm-linux-gnueabihf",
        message: "Detected ARM-hf architecture (armv7+)",
    },
    ArchRule {
        raw_arch: "x86_64",
        linker_contains: None,
        variant: BinaryVariant::X86_64,
        artifact: "pihole-FTL-linux-x86_64",
        message: "Detected x86_64 architecture",
    },
];

pub fn resolve_variant(raw_arch: &str, linker_identity: &str) -> BinaryVariant {
    ARCH_TABLE
        .iter()
        .find(|rule| {
            rule.raw_arch == raw_arch
                && rule
                    .linker_contains
                    .is_none_or(|needle| linker_identity.contains(needle))
        })
        .map(|rule| rule.variant)
        .unwrap_or(BinaryVariant::Unknown)
}

pub fn artifact_name(variant: BinaryVariant) -> Option<&'static str> {
    ARCH_TABLE
        .iter()
        .find(|rule| rule.variant == variant)
        .map(|rule| rule.artifact)
}

/// Operator message for a resolved variant; unknown ones echo the raw value
pub fn detection_message(variant: BinaryVariant, raw_arch: &str) -> String {
    ARCH_TABLE
        .iter()
        .find(|rule| rule.variant == variant)
        .map(|rule| rule.message.to_string())
        .unwrap_or_else(|| format!("Not able to detect architecture (unknown: {raw_arch})"))
}

/// Pull the dynamic loader path out of `ldd /bin/ls` output.
///
/// Falls back to the trimmed input when no `/lib` line is present, so a bare
/// loader path passes through unchanged.
pub fn parse_linker_identity(ldd_output: &str) -> String {
    ldd_output
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with("/lib"))
        .and_then(|line| line.split_whitespace().next())
        .map(str::to_string)
        .unwrap_or_else(|| ldd_output.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_table_rows() {
        assert_eq!(
            resolve_variant("aarch64", "/lib/ld-linux-aarch64.so.1"),
            BinaryVariant::Aarch64
        );
        assert_eq!(
            resolve_variant("armv6l", "/lib/ld-linux-armhf.so.3"),
            BinaryVariant::ArmHfLow
        );
        assert_eq!(
            resolve_variant("armv7l", "/lib/ld-linux-armhf.so.3"),
            BinaryVariant::ArmHfV7Plus
        );
        assert_eq!(
            resolve_variant("x86_64", "/lib64/ld-linux-x86-64.so.2"),
            BinaryVariant::X86_64
        );
        assert_eq!(resolve_variant("x86_64", ""), BinaryVariant::X86_64);
    }

    #[test]
    fn test_linker_must_confirm_arm_rows() {
        assert_eq!(
            resolve_variant("armv7l", "/lib/ld-linux.so.3"),
            BinaryVariant::Unknown
        );
        assert_eq!(
            resolve_variant("aarch64", "/lib/ld-linux-armhf.so.3"),
            BinaryVariant::Unknown
        );
    }

    #[test]
    fn test_unknown_architecture() {
        assert_eq!(resolve_variant("mips", ""), BinaryVariant::Unknown);
        assert_eq!(artifact_name(BinaryVariant::Unknown), None);
        assert_eq!(
            detection_message(BinaryVariant::Unknown, "mips"),
            "Not able to detect architecture (unknown: mips)"
        );
    }

    #[test]
    fn test_artifact_names() {
        assert_eq!(
            artifact_name(BinaryVariant::Aarch64),
            Some("pihole-FTL-aarch64-linux-gnu")
        );
        assert_eq!(
            artifact_name(BinaryVariant::ArmHfLow),
            Some("pihole-FTL-arm-linux-gnueabi")
        );
        assert_eq!(
            artifact_name(BinaryVariant::ArmHfV7Plus),
            Some("pihole-FTL-arm-linux-gnueabihf")
        );
        assert_eq!(
            artifact_name(BinaryVariant::X86_64),
            Some("pihole-FTL-linux-x86_64")
        );
    }

    #[test]
    fn test_parse_linker_identity() {
        assert_eq!(
            parse_linker_identity("/lib/ld-linux-aarch64.so.1"),
            "/lib/ld-linux-aarch64.so.1"
        );

        let ldd = "\tlinux-vdso.so.1 (0x00007ffd)\n\tlibc.so.6 => /lib/x86_64-linux-gnu/libc.so.6 (0x00007f)\n\t/lib64/ld-linux-x86-64.so.2 (0x00007f2)\n";
        assert_eq!(parse_linker_identity(ldd), "/lib64/ld-linux-x86-64.so.2");
    }
}
