use crate::api::models::IpConfig;

/// Narrow command/status interface to the platform network stack.
///
/// Implementations wrap the chip driver (or a simulator). Every method must
/// return promptly; waiting is the connection manager's job.
pub trait LinkStatusSource: Send + Sync {
    /// Current raw link status code.
    ///
    /// Must not block. Well-behaved sources only return the seven codes of
    /// [`LinkState`](crate::LinkState).
    fn status(&self) -> i32;

    /// Hardware address of the interface, formatted `aa:bb:cc:dd:ee:ff`.
    fn hardware_address(&self) -> String;

    /// Addressing assigned by the stack; only meaningful while the link is up.
    fn ifconfig(&self) -> IpConfig;

    /// Starts joining the given network. Progress is observed through
    /// [`status`](Self::status).
    fn connect(&self, ssid: &str, password: &str);

    /// Starts leaving the current network.
    fn disconnect(&self);

    /// Activates the interface with a country code and power management policy.
    fn configure(&self, country: &str, power_management: u32);
}

/// Formats raw MAC bytes the way the status report expects them.
pub fn format_mac(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(":")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_mac() {
        assert_eq!(
            format_mac(&[0x28, 0xcd, 0xc1, 0x0a, 0x0b, 0xff]),
            "28:cd:c1:0a:0b:ff"
        );
        assert_eq!(format_mac(&[]), "");
    }
}
