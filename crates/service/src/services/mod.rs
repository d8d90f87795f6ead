//! Application services orchestrating the domain over the storage ports.

pub mod booking_service;
pub mod registry_service;
pub mod schedule_service;

pub use booking_service::BookingService;
pub use registry_service::RegistryService;
pub use schedule_service::ScheduleService;
