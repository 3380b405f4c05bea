pub mod add;
pub mod delete;
pub mod exchange;
pub mod gestures;
pub mod list;
pub mod suggest;
pub mod toggle;
