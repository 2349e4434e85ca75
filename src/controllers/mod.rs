pub mod explorer;
pub mod verify;
