//! Concrete collaborators for the collision-warning engine: range transports
//! (TCP, character device, simulation, CSV replay) and alarm tone emitters.
pub mod error;
pub mod payload;
pub mod sim;
pub mod stream;
pub mod tone;

pub use payload::format_payload;
pub use sim::{ReplayTransport, SimScenario, SimulatedTransport};
pub use stream::{DeviceTransport, TcpTransport};
pub use tone::{SilentTone, TerminalBell};
