//! Maps `Box<dyn Error>` from the transport seam to typed `SnifferError`.
//!
//! With the `hardware-errors` feature, `sniffer_hardware::HwError` is
//! downcast for a precise mapping; otherwise the message text decides.

use crate::error::SnifferError;

#[cfg(feature = "hardware-errors")]
fn is_disconnect(kind: std::io::ErrorKind) -> bool {
    use std::io::ErrorKind as K;
    matches!(
        kind,
        K::ConnectionReset
            | K::ConnectionAborted
            | K::BrokenPipe
            | K::NotConnected
            | K::UnexpectedEof
    )
}

/// Map a transport read failure to a typed `SnifferError`.
pub fn map_transport_error(e: &(dyn std::error::Error + 'static)) -> SnifferError {
    #[cfg(feature = "hardware-errors")]
    {
        use sniffer_hardware::error::HwError;
        if let Some(hw) = e.downcast_ref::<HwError>() {
            return match hw {
                HwError::Closed => SnifferError::Disconnected,
                HwError::Io(io) if is_disconnect(io.kind()) => SnifferError::Disconnected,
                other => SnifferError::Transport(other.to_string()),
            };
        }
    }

    let s = e.to_string();
    let lower = s.to_lowercase();
    if lower.contains("closed") || lower.contains("disconnect") || lower.contains("reset") {
        SnifferError::Disconnected
    } else {
        SnifferError::Transport(s)
    }
}
