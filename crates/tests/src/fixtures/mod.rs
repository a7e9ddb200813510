pub mod mock_messenger;
pub mod seed;
