pub mod blog;
pub mod bookings;
pub mod lenient;
pub mod review;
pub mod trek;
pub mod user;
