//! Property-based tests for architecture resolution

#[cfg(test)]
mod tests {
    use crate::core::arch::*;
    use crate::profile::BinaryVariant;
    use proptest::prelude::*;

    const KNOWN: [&str; 4] = ["aarch64", "armv6l", "armv7l", "x86_64"];

    proptest! {
        #[test]
        fn test_resolution_is_total(raw in ".*", linker in ".*") {
            let variant = resolve_variant(&raw, &linker);
            let message = detection_message(variant, &raw);
            if variant == BinaryVariant::Unknown {
                prop_assert!(artifact_name(variant).is_none());
                prop_assert!(message.starts_with("Not able to detect architecture"));
            } else {
                prop_assert!(artifact_name(variant).is_some());
                prop_assert!(message.starts_with("Detected"));
            }
        }

        #[test]
        fn test_unlisted_arch_is_unknown(raw in "[a-z0-9_]{1,12}", linker in ".*") {
            prop_assume!(!KNOWN.contains(&raw.as_str()));
            prop_assert_eq!(resolve_variant(&raw, &linker), BinaryVariant::Unknown);
        }

        #[test]
        fn test_x86_64_ignores_linker(linker in ".*") {
            prop_assert_eq!(resolve_variant("x86_64", &linker), BinaryVariant::X86_64);
        }

        #[test]
        fn test_arm_needs_hard_float_loader(linker in "[a-z0-9/._-]{0,40}") {
            let expected = if linker.contains("armhf") {
                BinaryVariant::ArmHfV7Plus
            } else {
                BinaryVariant::Unknown
            };
            prop_assert_eq!(resolve_variant("armv7l", &linker), expected);
        }
    }
}
