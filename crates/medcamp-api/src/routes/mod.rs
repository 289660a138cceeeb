pub mod camps;
pub mod clinics;
pub mod dashboard;
pub mod health;
pub mod session;
pub mod staff;
pub mod tests;
