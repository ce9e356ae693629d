pub mod availability;
pub mod doctor;
pub mod time_slot;

pub use availability::AvailabilityService;
pub use doctor::DoctorService;
pub use time_slot::TimeSlotService;
