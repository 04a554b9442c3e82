//! Canned host output for tests
//!
//! Captured from real machines so parsers see what the tools actually print.

/// `/etc/redhat-release` on CentOS 6
pub const CENTOS6_RELEASE: &str = "CentOS release 6.10 (Final)\n";

pub const DEBIAN_OS_RELEASE: &str = r#"PRETTY_NAME="Debian GNU/Linux 9 (stretch)"
NAME="Debian GNU/Linux"
VERSION_ID="9"
VERSION="9 (stretch)"
ID=debian
HOME_URL="https://www.debian.org/"
"#;

/// `ldd /bin/ls` on a Raspberry Pi 3 running Raspbian
pub const ARMHF_LDD: &str = "\tlinux-vdso.so.1 (0x7ef9a000)
\t/usr/lib/arm-linux-gnueabihf/libarmmem.so (0x76f2d000)
\tlibselinux.so.1 => /lib/arm-linux-gnueabihf/libselinux.so.1 (0x76eed000)
\tlibc.so.6 => /lib/arm-linux-gnueabihf/libc.so.6 (0x76dae000)
\t/lib/ld-linux-armhf.so.3 (0x76f43000)
";

pub const AARCH64_LDD: &str = "\tlinux-vdso.so.1 (0x0000ffff8e5f2000)
\tlibc.so.6 => /lib/aarch64-linux-gnu/libc.so.6 (0x0000ffff8e440000)
\t/lib/ld-linux-aarch64.so.1 (0x0000ffff8e5c4000)
";

pub const X86_64_LDD: &str = "\tlinux-vdso.so.1 (0x00007ffd3e5f2000)
\tlibc.so.6 => /lib64/libc.so.6 (0x00007f0c1a200000)
\t/lib64/ld-linux-x86-64.so.2 (0x00007f0c1a5f0000)
";

/// `ip -6 address` with one address of every scope
pub const IP6_ADDRESS_LISTING: &str = "1: lo: <LOOPBACK,UP,LOWER_UP> mtu 65536 state UNKNOWN qlen 1000
    inet6 ::1/128 scope host
       valid_lft forever preferred_lft forever
2: eth0: <BROADCAST,MULTICAST,UP,LOWER_UP> mtu 1500 state UP qlen 1000
    inet6 2001:db8:0:1::10/64 scope global dynamic mngtmpaddr
       valid_lft 86394sec preferred_lft 14394sec
    inet6 fd00:abcd::10/64 scope global
       valid_lft forever preferred_lft forever
    inet6 fe80::ba27:ebff:fe12:3456/64 scope link
       valid_lft forever preferred_lft forever
";

pub const LINK_LOCAL: &str = "fe80::ba27:ebff:fe12:3456";
pub const ULA: &str = "fd00:abcd::10";
pub const GUA: &str = "2001:db8:0:1::10";

/// A setupVars.conf as left behind by a previous install
pub const SETUP_VARS: &str = "PIHOLE_INTERFACE=eth0
IPV4_ADDRESS=192.168.1.10/24
IPV6_ADDRESS=fd00:abcd::10
PIHOLE_DNS_1=8.8.8.8
PIHOLE_DNS_2=8.8.4.4
QUERY_LOGGING=true
INSTALL_WEB_SERVER=true
";
