pub mod device_status;
