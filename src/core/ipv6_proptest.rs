//! Property-based tests for IPv6 selection

#[cfg(test)]
mod tests {
    use crate::core::ipv6::*;
    use crate::status::RecordingSink;
    use proptest::prelude::*;
    use std::net::Ipv6Addr;

    fn address_in(prefix: u16) -> impl Strategy<Value = Ipv6Addr> {
        (any::<[u16; 7]>()).prop_map(move |rest| {
            Ipv6Addr::new(
                prefix, rest[0], rest[1], rest[2], rest[3], rest[4], rest[5], rest[6],
            )
        })
    }

    fn link_local() -> impl Strategy<Value = Ipv6Addr> {
        address_in(0xfe80)
    }

    fn ula() -> impl Strategy<Value = Ipv6Addr> {
        (0xfc00u16..=0xfdff).prop_flat_map(address_in)
    }

    fn gua() -> impl Strategy<Value = Ipv6Addr> {
        (0x2000u16..=0x3fff).prop_flat_map(address_in)
    }

    fn select(addresses: &[Ipv6Addr]) -> Ipv6Selection {
        let text: Vec<String> = addresses.iter().map(|a| a.to_string()).collect();
        let mut sink = RecordingSink::new();
        select_ipv6_blocking(&candidates_from(&text), &mut sink)
    }

    proptest! {
        #[test]
        fn test_ula_preferred_in_any_order(
            ula in ula(),
            gua in gua(),
            local in link_local(),
            order in Just(vec![0usize, 1, 2]).prop_shuffle(),
        ) {
            let pool = [ula, gua, local];
            let shuffled: Vec<Ipv6Addr> = order.iter().map(|&i| pool[i]).collect();
            prop_assert_eq!(select(&shuffled), Ipv6Selection::Use(ula));
        }

        #[test]
        fn test_gua_used_without_ula(gua in gua(), locals in prop::collection::vec(link_local(), 0..4)) {
            let mut addresses = locals;
            addresses.push(gua);
            prop_assert_eq!(select(&addresses), Ipv6Selection::Use(gua));
        }

        #[test]
        fn test_link_local_never_selected(locals in prop::collection::vec(link_local(), 0..6)) {
            prop_assert_eq!(select(&locals), Ipv6Selection::Disabled);
        }

        #[test]
        fn test_classify_matches_prefix(ula in ula(), gua in gua(), local in link_local()) {
            prop_assert_eq!(classify(&ula), Some(Ipv6Scope::Ula));
            prop_assert_eq!(classify(&gua), Some(Ipv6Scope::Gua));
            prop_assert_eq!(classify(&local), Some(Ipv6Scope::LinkLocal));
        }
    }
}
