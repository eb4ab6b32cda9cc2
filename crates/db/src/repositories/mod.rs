pub mod device_status_repo;

pub use device_status_repo::DeviceStatusRepo;
