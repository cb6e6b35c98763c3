pub mod clock;
pub mod report;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use report::{CollisionState, ColorHint, Setting, StatusReport};

/// Byte-stream source of range payloads (serial link, socket, simulator).
pub trait Transport {
    /// Read the next chunk into `buf`. `Ok(0)` signals end of stream.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Box<dyn std::error::Error + Send + Sync>>;

    /// Hook that unblocks a pending `read` from another thread, typically by
    /// closing the underlying connection. `None` when the transport cannot be
    /// interrupted.
    fn closer(&self) -> Option<Box<dyn Fn() + Send + Sync>> {
        None
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Box<dyn std::error::Error + Send + Sync>> {
        (**self).read(buf)
    }

    fn closer(&self) -> Option<Box<dyn Fn() + Send + Sync>> {
        (**self).closer()
    }
}

pub trait ToneEmitter {
    fn emit_tone(
        &mut self,
        duration: std::time::Duration,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

pub trait StatusDisplay {
    fn show(&mut self, report: &StatusReport)
    -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Return the display to its idle state (session stopped).
    fn clear(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }
}

/// Live, user-editable settings. Values are raw text exactly as entered;
/// parsing and defaulting happen in the core on every tick.
pub trait SettingsSource {
    fn raw(&self, setting: Setting) -> Option<String>;
}
