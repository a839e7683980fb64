pub mod account;
pub mod day_of_week;
pub mod department;
pub mod leave_application;
pub mod role;
pub mod schedule;
