pub mod sampler;
pub mod shared;
pub mod snapshot;

pub use sampler::InputSampler;
pub use shared::SharedInput;
pub use snapshot::{InputDevice, InputSnapshot, InputSource, NoInput};
