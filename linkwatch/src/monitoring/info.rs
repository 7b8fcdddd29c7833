//! Current connection information.
//!
//! Pure reads: nothing here commands the chip or waits on an in-flight
//! connect.

use crate::Result;
use crate::api::models::{LinkState, StatusReport, describe_code};
use crate::core::session::Session;
use crate::driver::LinkStatusSource;

/// Returns the raw status code without interpreting it.
pub(crate) fn status_code<S>(source: &S) -> i32
where
    S: LinkStatusSource + ?Sized,
{
    source.status()
}

/// Returns the current link state.
pub(crate) fn current_state<S>(source: &S) -> Result<LinkState>
where
    S: LinkStatusSource + ?Sized,
{
    LinkState::try_from(source.status())
}

/// Returns the description of the current status.
pub(crate) fn status_description<S>(source: &S) -> String
where
    S: LinkStatusSource + ?Sized,
{
    describe_code(source.status())
}

/// Assembles the monitoring record from a single status sample.
pub(crate) fn status_report<S>(source: &S, mac: &str, session: &Session) -> StatusReport
where
    S: LinkStatusSource + ?Sized,
{
    StatusReport::new(mac, source.status(), session.ip_config())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{ConnectOutcome, IpConfig};
    use crate::sim::ScriptedLink;
    use std::time::Duration;

    #[test]
    fn report_before_connect_is_unknown() {
        let link = ScriptedLink::new(0);
        let report = status_report(&link, "aa:bb:cc:dd:ee:ff", &Session::default());

        assert_eq!(report.mac, "aa:bb:cc:dd:ee:ff");
        assert_eq!(report.status_code, 0);
        assert_eq!(report.status_description, "Link is down");
        assert_eq!(report.ip, "Unknown");
        assert_eq!(report.dns, "Unknown");
    }

    #[test]
    fn report_after_connect_carries_addressing() {
        let link = ScriptedLink::new(3);
        let session = Session::default();
        session.record_success(&ConnectOutcome {
            elapsed: Duration::from_secs(2),
            ip_config: IpConfig::new("192.168.1.50", "255.255.255.0", "192.168.1.1", "8.8.8.8"),
        });

        let report = status_report(&link, "aa:bb:cc:dd:ee:ff", &session);

        assert_eq!(report.status_code, 3);
        assert_eq!(report.ip, "192.168.1.50");
        assert_eq!(report.subnet, "255.255.255.0");
        assert_eq!(report.gateway, "192.168.1.1");
        assert_eq!(report.dns, "8.8.8.8");
    }

    #[test]
    fn unknown_code_is_described_not_rejected() {
        let link = ScriptedLink::new(8);

        assert_eq!(status_code(&link), 8);
        assert!(current_state(&link).is_err());
        assert_eq!(status_description(&link), "Unknown link status (8)");
    }
}
