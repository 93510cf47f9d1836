pub mod helpers;
pub mod mock_sender;

pub use helpers::*;
pub use mock_sender::MockSender;
