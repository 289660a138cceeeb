pub mod camp;
pub mod clinic;
pub mod staff;
pub mod test_entry;
pub mod user;
