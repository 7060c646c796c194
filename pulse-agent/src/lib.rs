//! Pulse Agent - wall-clock-aligned scheduling engine and delivery transports.

pub mod align;
pub mod batch;
pub mod error;
pub mod runner;
pub mod stream;
pub mod supervisor;

pub use align::{delay_to_boundary, label_timestamp, CadenceClass};
pub use batch::BatchTransport;
pub use error::DeliveryError;
pub use runner::ClientRunner;
pub use stream::{StreamSession, StreamTransport};
pub use supervisor::{AgentHandle, AgentSupervisor};
