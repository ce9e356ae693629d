pub mod booking;
pub mod package;

pub use booking::PackageBookingService;
pub use package::HealthPackageService;
