//! Property-based tests for the IPv4 validator

#[cfg(test)]
mod tests {
    use crate::core::validation::*;
    use proptest::prelude::*;

    // Octets as an installer user might type them, leading zeros included
    prop_compose! {
        fn padded_octet()(value in 0u16..=255, width in 1usize..=3) -> String {
            let digits = value.to_string();
            if digits.len() >= width {
                digits
            } else {
                format!("{digits:0>width$}")
            }
        }
    }

    proptest! {
        #[test]
        fn test_every_dotted_quad_is_valid(a in 0u8..=255, b in 0u8..=255, c in 0u8..=255, d in 0u8..=255) {
            let address = format!("{a}.{b}.{c}.{d}");
            prop_assert!(is_valid_ipv4(&address));
            prop_assert!(address.parse::<std::net::Ipv4Addr>().is_ok());
        }

        #[test]
        fn test_leading_zeros_accepted(octets in prop::collection::vec(padded_octet(), 4)) {
            prop_assert!(is_valid_ipv4(&octets.join(".")));
        }

        #[test]
        fn test_octet_above_255_rejected(big in 256u32..=999, position in 0usize..4) {
            let mut octets = vec!["1".to_string(); 4];
            octets[position] = big.to_string();
            prop_assert!(!is_valid_ipv4(&octets.join(".")));
        }

        #[test]
        fn test_wrong_group_count_rejected(groups in prop::collection::vec(0u8..=255, 0..8)) {
            prop_assume!(groups.len() != 4);
            let address = groups
                .iter()
                .map(|g| g.to_string())
                .collect::<Vec<_>>()
                .join(".");
            prop_assert!(!is_valid_ipv4(&address));
        }

        #[test]
        fn test_never_panics(input in ".*") {
            let _ = is_valid_ipv4(&input);
        }

        #[test]
        fn test_non_digit_characters_rejected(prefix in "[0-9]{0,2}", bad in "[^0-9.]", suffix in "[0-9]{0,2}") {
            let octet = format!("{prefix}{bad}{suffix}");
            let address = format!("10.{octet}.0.1");
            prop_assert!(!is_valid_ipv4(&address));
        }
    }
}
