//! Entry points that sequence message source, channel, and reporting.
//!
//! - [`PollingInvoker`]: a forever loop gated by the daily delivery window
//! - [`TriggeredInvoker`]: one invocation per external trigger, answered
//!   with an [`InvocationResponse`]

mod clock;
mod polling;
mod response;
mod triggered;
mod window;

pub use clock::{Clock, Sleeper, SystemClock, TokioSleeper};
pub use polling::{CycleOutcome, PollCycle, PollingInvoker};
pub use response::{InvocationResponse, ResponseBody};
pub use triggered::TriggeredInvoker;
pub use window::DeliveryWindow;
