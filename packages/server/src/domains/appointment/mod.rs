// Appointment domain - citizen bookings worked through the status lifecycle

pub mod models;

pub use models::{Appointment, AppointmentStatus, CreateAppointment};
